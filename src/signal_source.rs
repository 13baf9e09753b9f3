use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use rand::{rngs::StdRng, Rng, SeedableRng};

use periodogram_display::{DisplayConfig, DisplayHandle};

/// One power spectrum in dB, bins ordered low to high frequency
#[derive(Debug, Clone)]
pub struct SpectrumFrame {
    pub channel: usize,
    pub bins_db: Vec<f32>,
}

/// What the synthetic source produces
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub sample_rate: f64,
    pub center_frequency: f64,
    pub num_bins: usize,
    pub channels: usize,
    /// Delay between channels coming online
    pub channel_stagger: Duration,
    pub frame_interval: Duration,
    pub freq_label_id: String,
}

impl SourceSettings {
    pub fn from_config(config: &DisplayConfig, channels: usize) -> Self {
        Self {
            sample_rate: config.axis.sample_rate,
            center_frequency: config.axis.center_frequency,
            num_bins: config.num_fft_bins.max(16),
            channels,
            channel_stagger: Duration::from_millis(1500),
            frame_interval: Duration::from_millis(50),
            freq_label_id: config.freq_label_id.clone(),
        }
    }
}

// ========================================================================
// SYNTHETIC SPECTRUM THREAD
// ========================================================================
//    Stands in for the processing pipeline: noise floor plus a few drifting
//    tones per channel. Channels come online one by one so traces attach late.

pub fn start(
    settings: SourceSettings,
    display: DisplayHandle,
    retune_rx: Receiver<f64>,
    shutdown: Arc<AtomicBool>,
) -> Receiver<SpectrumFrame> {
    let (tx, rx) = bounded(16);

    thread::spawn(move || {
        tracing::info!(
            "[Source] Starting: {} channel(s), {} bins, {} Hz wide at {} Hz",
            settings.channels,
            settings.num_bins,
            settings.sample_rate,
            settings.center_frequency
        );

        let started = Instant::now();
        let mut noise = StdRng::from_entropy();
        let mut frame_count = 0u64;

        while !shutdown.load(Ordering::Relaxed) {
            match retune_rx.recv_timeout(settings.frame_interval) {
                Ok(hz) => {
                    // retune so the picked frequency lands in the middle
                    tracing::info!("[Source] Retuned to {:.0} Hz", hz);
                    display.post_stream_label(settings.freq_label_id.clone(), hz);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("[Source] Retune channel closed");
                    break;
                }
            }

            let elapsed = started.elapsed();
            let online = online_channels(&settings, elapsed);
            let t = elapsed.as_secs_f32();

            for channel in 0..online {
                let bins_db = synthesize(&settings, channel, t, &mut noise);
                if tx.try_send(SpectrumFrame { channel, bins_db }).is_err() {
                    // GUI can't keep up, drop frame
                }
            }
            frame_count += 1;
        }

        tracing::info!("[Source] Shutdown ({} frames)", frame_count);
    });

    rx
}

fn online_channels(settings: &SourceSettings, elapsed: Duration) -> usize {
    if settings.channel_stagger.is_zero() {
        return settings.channels;
    }
    let steps = (elapsed.as_millis() / settings.channel_stagger.as_millis()) as usize;
    (steps + 1).min(settings.channels)
}

fn synthesize(settings: &SourceSettings, channel: usize, t: f32, noise: &mut StdRng) -> Vec<f32> {
    let n = settings.num_bins;
    let floor_db = -85.0 - 3.0 * channel as f32;

    // tone position as a fraction of the span, drifting slowly
    let base = 0.2 + 0.15 * channel as f32;
    let tone = (base + 0.05 * (t * 0.3 + channel as f32).sin()).rem_euclid(1.0);
    let tone_bin = tone * n as f32;
    let tone_db = -20.0 - 6.0 * channel as f32 + 3.0 * (t * TAU * 0.1).sin();

    (0..n)
        .map(|i| {
            let dist = (i as f32 - tone_bin) / 2.5;
            let peak = tone_db - floor_db;
            let shape = peak * (-dist * dist).exp();
            floor_db + shape + noise_db(noise, 6.0)
        })
        .collect()
}

/// Uniform in [-spread/2, spread/2]
fn noise_db(rng: &mut StdRng, spread: f32) -> f32 {
    let half = spread / 2.0;
    rng.gen_range(-half..=half)
}

// === Tests ====
#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SourceSettings {
        SourceSettings {
            sample_rate: 2e6,
            center_frequency: 100e6,
            num_bins: 256,
            channels: 3,
            channel_stagger: Duration::from_secs(1),
            frame_interval: Duration::from_millis(10),
            freq_label_id: "rxFreq".to_string(),
        }
    }

    #[test]
    fn test_channels_come_online_one_by_one() {
        let s = settings();
        assert_eq!(online_channels(&s, Duration::from_millis(0)), 1);
        assert_eq!(online_channels(&s, Duration::from_millis(1200)), 2);
        assert_eq!(online_channels(&s, Duration::from_secs(60)), 3);
    }

    #[test]
    fn test_frame_has_tone_above_floor() {
        let s = settings();
        let mut noise = StdRng::seed_from_u64(7);
        let frame = synthesize(&s, 0, 0.0, &mut noise);
        assert_eq!(frame.len(), 256);

        let max = frame.iter().cloned().fold(f32::MIN, f32::max);
        let min = frame.iter().cloned().fold(f32::MAX, f32::min);
        assert!(max > -30.0, "tone missing: {}", max);
        assert!(min > -95.0 && min < -80.0, "floor off: {}", min);
    }

    #[test]
    fn test_noise_stays_in_spread() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = noise_db(&mut rng, 6.0);
            assert!((-3.0..=3.0).contains(&v));
        }
    }
}
