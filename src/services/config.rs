use crate::error::{CaptchaError, Result};
use crate::models::config::SolverConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager for solver settings
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager for the platform config directory
    /// (`<config dir>/amazon-captcha/config.json`)
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CaptchaError::config("Failed to determine config directory"))?
            .join("amazon-captcha");

        Ok(Self::with_path(config_dir.join("config.json")))
    }

    /// Create a ConfigManager for an explicit config file
    pub fn with_path<P: Into<PathBuf>>(config_path: P) -> Self {
        let config_path = config_path.into();
        let config_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            config_dir,
            config_path,
        }
    }

    /// Save configuration to disk
    pub fn save(&self, config: &SolverConfig) -> Result<()> {
        if !self.config_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.config_dir)?;
        }

        // Pretty print for human readability
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, json)?;

        Ok(())
    }

    /// Load configuration from disk
    ///
    /// If config file doesn't exist, returns default configuration
    pub fn load(&self) -> Result<SolverConfig> {
        if !self.config_exists() {
            return Ok(SolverConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let config: SolverConfig = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Get the config file path
    pub fn config_file_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Check if config file exists
    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Config manager rooted in a fresh temporary directory
    fn create_test_manager() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().unwrap();
        // Nested so save() has to create the directory
        let manager = ConfigManager::with_path(temp_dir.path().join("amazon-captcha").join("config.json"));
        (temp_dir, manager)
    }

    #[test]
    fn test_config_manager_new() {
        let manager = ConfigManager::new().expect("ConfigManager::new() should succeed");
        assert!(manager.config_file_path().ends_with("amazon-captcha/config.json"));
    }

    #[test]
    fn test_config_load_default_when_not_exists() {
        let (_dir, manager) = create_test_manager();
        assert!(!manager.config_exists());

        let config = manager.load().expect("load() should return default");
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn test_config_save_and_load() {
        let (_dir, manager) = create_test_manager();

        let mut config = SolverConfig::default();
        config.devmode = true;
        config.keep_logs = true;
        config.segmentation.min_letter_width = 12;

        manager.save(&config).expect("save should succeed");
        assert!(manager.config_exists());

        let loaded = manager.load().expect("load should succeed");
        assert_eq!(loaded, config);
        assert_eq!(loaded.segmentation.min_letter_width, 12);
    }

    #[test]
    fn test_config_overwrite() {
        let (_dir, manager) = create_test_manager();

        let mut first = SolverConfig::default();
        first.fetch_timeout_secs = 10;
        manager.save(&first).unwrap();

        let mut second = SolverConfig::default();
        second.fetch_timeout_secs = 30;
        manager.save(&second).unwrap();

        assert_eq!(manager.load().unwrap().fetch_timeout_secs, 30);
    }

    #[test]
    fn test_config_load_invalid_json() {
        let (_dir, manager) = create_test_manager();
        fs::create_dir_all(manager.config_file_path().parent().unwrap()).unwrap();
        fs::write(manager.config_file_path(), "{ not json").unwrap();

        assert!(matches!(manager.load(), Err(CaptchaError::Json(_))));
    }
}
