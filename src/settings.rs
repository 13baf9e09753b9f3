use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use periodogram_display::{AxisConfig, DisplayConfig};

/// Where the demo keeps its files
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub settings_file: PathBuf,
    pub view_state_file: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    /// Per-user project directories; `None` when the platform has no home dir
    pub fn discover() -> Option<Self> {
        let dirs = ProjectDirs::from("org", "periodogram", "periodogram")?;
        Some(Self::in_dirs(dirs.config_dir(), dirs.data_dir()))
    }

    pub fn in_dirs(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            settings_file: config_dir.join("settings.json"),
            view_state_file: data_dir.join("view_state.json"),
            log_dir: data_dir.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<()> {
        for file in [&self.settings_file, &self.view_state_file] {
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("creating {}", self.log_dir.display()))?;
        Ok(())
    }
}

/// Settings used on the very first run: a 2 MHz wide complex stream at 100 MHz
pub fn first_run_config() -> DisplayConfig {
    DisplayConfig {
        title: "Periodogram".to_string(),
        y_axis_title: "dB".to_string(),
        axis: AxisConfig {
            sample_rate: 2e6,
            center_frequency: 100e6,
            reference_level: 0.0,
            dynamic_range: 100.0,
            ..AxisConfig::default()
        },
        ..DisplayConfig::default()
    }
}

/// Load `settings.json`, writing the first-run settings if it does not exist
pub fn load_or_create(path: &Path) -> Result<DisplayConfig> {
    if !path.exists() {
        let config = first_run_config();
        save_config(path, &config)?;
        tracing::info!("[Settings] Wrote defaults to {}", path.display());
        return Ok(config);
    }

    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!("[Settings] Loaded {}", path.display());
    Ok(config)
}

pub fn save_config(path: &Path, config: &DisplayConfig) -> Result<()> {
    let text = serde_json::to_string_pretty(config)?;
    write_atomic(path, text.as_bytes())
}

/// Last persisted view-state blob, if any
pub fn load_view_state(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("[Settings] Can't read {}: {}", path.display(), e);
            None
        }
    }
}

pub fn save_view_state(path: &Path, blob: &[u8]) -> Result<()> {
    write_atomic(path, blob)
}

/// Write to a sibling temp file, then rename over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

// === Tests ====
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let paths = AppPaths::in_dirs(dir, dir);

        let config = load_or_create(&paths.settings_file).unwrap();
        assert_eq!(config, first_run_config());
        assert!(paths.settings_file.exists());

        // second run reads it back
        assert_eq!(load_or_create(&paths.settings_file).unwrap(), config);
    }

    #[test]
    fn test_view_state_file_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let paths = AppPaths::in_dirs(dir, dir);

        assert_eq!(load_view_state(&paths.view_state_file), None);
        save_view_state(&paths.view_state_file, b"{\"index\":0}").unwrap();
        assert_eq!(
            load_view_state(&paths.view_state_file).as_deref(),
            Some(&b"{\"index\":0}"[..])
        );
    }

    #[test]
    fn test_broken_settings_report_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let file = dir.join("settings.json");
        fs::write(&file, "{ nope").unwrap();

        let err = load_or_create(&file).unwrap_err();
        assert!(format!("{:#}", err).contains("settings.json"));
    }
}
