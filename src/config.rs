//! Configuration management for pmasetup
//!
//! Handles loading, saving, and default configuration values.
//! Config file location: ~/.config/pmasetup/config.toml

use crate::host::support::REFERENCE_ARCH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeName,
    /// Architectures other than this one need operator confirmation
    pub reference_arch: String,
    pub panel: PanelOptions,
    pub phpmyadmin: PhpMyAdminOptions,
    pub nginx: NginxOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::Gruvbox,
            reference_arch: REFERENCE_ARCH.to_string(),
            panel: PanelOptions::default(),
            phpmyadmin: PhpMyAdminOptions::default(),
            nginx: NginxOptions::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("pmasetup");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            let config = Config::default();
            config.save_to(&path)?;
            return Ok(config);
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }
}

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Gruvbox,
    Nord,
    Plain,
}

/// The base panel installation phpMyAdmin is added to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOptions {
    /// Must exist before anything is installed
    pub path: PathBuf,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/www/pterodactyl"),
        }
    }
}

/// Where and how phpMyAdmin is served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpMyAdminOptions {
    pub install_dir: PathBuf,
    /// Local release tarball to unpack into `install_dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<PathBuf>,
    pub server_name: String,
    pub port: u16,
    /// Overrides the family default PHP-FPM socket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php_socket: Option<String>,
}

impl Default for PhpMyAdminOptions {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("/var/www/phpmyadmin"),
            archive: None,
            server_name: "_".to_string(),
            port: 8081,
            php_socket: None,
        }
    }
}

/// nginx configuration directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NginxOptions {
    pub sites_available: PathBuf,
    pub sites_enabled: PathBuf,
    pub conf_d: PathBuf,
}

impl Default for NginxOptions {
    fn default() -> Self {
        Self {
            sites_available: PathBuf::from("/etc/nginx/sites-available"),
            sites_enabled: PathBuf::from("/etc/nginx/sites-enabled"),
            conf_d: PathBuf::from("/etc/nginx/conf.d"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, ThemeName::Gruvbox);
        assert_eq!(config.reference_arch, "x86_64");
        assert_eq!(config.panel.path, PathBuf::from("/var/www/pterodactyl"));
        assert_eq!(config.phpmyadmin.port, 8081);
        assert!(config.phpmyadmin.archive.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
theme = "nord"

[phpmyadmin]
port = 9000
php_socket = "/run/php/php7.4-fpm.sock"
"#,
        )
        .unwrap();
        assert_eq!(config.theme, ThemeName::Nord);
        assert_eq!(config.phpmyadmin.port, 9000);
        assert_eq!(config.phpmyadmin.install_dir, PathBuf::from("/var/www/phpmyadmin"));
        assert_eq!(config.phpmyadmin.php_socket.as_deref(), Some("/run/php/php7.4-fpm.sock"));
        assert_eq!(config.nginx, NginxOptions::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.panel.path = PathBuf::from("/srv/panel");
        config.phpmyadmin.archive = Some(PathBuf::from("/root/phpMyAdmin-5.1.1-all-languages.tar.gz"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }
}
