//! Configuration stage
//!
//! Unpacks phpMyAdmin (when an archive is configured), writes its
//! `config.inc.php`, installs the nginx server block and restarts nginx.
//! File operations are skipped in dry-run mode.

use crate::config::Config;
use crate::error::InstallError;
use crate::host::Family;
use crate::install::commands::{CommandRunner, PlannedCommand};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

const SITE_FILE: &str = "phpmyadmin.conf";

/// Resolved paths and values for one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebLayout {
    pub install_dir: PathBuf,
    pub archive: Option<PathBuf>,
    pub site_config: PathBuf,
    /// Debian-style sites-enabled link, if the family uses one
    pub enabled_link: Option<PathBuf>,
    pub web_user: String,
    pub php_socket: String,
    pub server_name: String,
    pub port: u16,
}

impl WebLayout {
    pub fn resolve(config: &Config, family: Family) -> Self {
        let pma = &config.phpmyadmin;
        let (site_config, enabled_link) = match family {
            Family::Debian => (
                config.nginx.sites_available.join(SITE_FILE),
                Some(config.nginx.sites_enabled.join(SITE_FILE)),
            ),
            Family::RedHat => (config.nginx.conf_d.join(SITE_FILE), None),
        };

        Self {
            install_dir: pma.install_dir.clone(),
            archive: pma.archive.clone(),
            site_config,
            enabled_link,
            web_user: family.web_user().to_string(),
            php_socket: pma
                .php_socket
                .clone()
                .unwrap_or_else(|| family.php_socket().to_string()),
            server_name: pma.server_name.clone(),
            port: pma.port,
        }
    }

    fn config_inc(&self) -> PathBuf {
        self.install_dir.join("config.inc.php")
    }

    fn temp_dir(&self) -> PathBuf {
        self.install_dir.join("tmp")
    }
}

/// 32 random hex characters, the length phpMyAdmin expects
pub fn generate_blowfish_secret() -> String {
    Uuid::new_v4().simple().to_string()
}

fn generated_header(comment: &str) -> String {
    format!(
        "{} Generated by pmasetup on {}",
        comment,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// phpMyAdmin `config.inc.php`
pub fn render_config_inc(layout: &WebLayout, secret: &str) -> String {
    format!(
        r#"<?php
{header}
$cfg['blowfish_secret'] = '{secret}';

$i = 0;
$i++;
$cfg['Servers'][$i]['auth_type'] = 'cookie';
$cfg['Servers'][$i]['host'] = 'localhost';
$cfg['Servers'][$i]['compress'] = false;
$cfg['Servers'][$i]['AllowNoPassword'] = false;

$cfg['UploadDir'] = '';
$cfg['SaveDir'] = '';
$cfg['TempDir'] = '{temp_dir}';
"#,
        header = generated_header("//"),
        secret = secret,
        temp_dir = layout.temp_dir().display(),
    )
}

/// nginx server block serving phpMyAdmin through PHP-FPM
pub fn render_site_config(layout: &WebLayout) -> String {
    format!(
        r#"{header}
server {{
    listen {port};
    server_name {server_name};

    root {root};
    index index.php index.html;

    client_max_body_size 100m;

    location / {{
        try_files $uri $uri/ /index.php?$query_string;
    }}

    location ~ \.php$ {{
        fastcgi_split_path_info ^(.+\.php)(/.+)$;
        fastcgi_pass unix:{socket};
        fastcgi_index index.php;
        include fastcgi_params;
        fastcgi_param SCRIPT_FILENAME $document_root$fastcgi_script_name;
    }}

    location ~ /\.ht {{
        deny all;
    }}
}}
"#,
        header = generated_header("#"),
        port = layout.port,
        server_name = layout.server_name,
        root = layout.install_dir.display(),
        socket = layout.php_socket,
    )
}

/// phpMyAdmin comes from the configured archive or must already be in place
///
/// Without an archive the install directory has to hold an `index.php`. A dry
/// run only warns, since an archive-less dry run never has the files yet.
pub fn ensure_sources(layout: &WebLayout, dry_run: bool) -> Result<(), InstallError> {
    if layout.archive.is_some() || layout.install_dir.join("index.php").is_file() {
        return Ok(());
    }
    if dry_run {
        warn!(
            "No phpMyAdmin files in {} and no archive configured; a real run would stop here",
            layout.install_dir.display()
        );
        return Ok(());
    }
    Err(InstallError::MissingPhpMyAdmin {
        path: layout.install_dir.clone(),
    })
}

/// Run the configuration stage
///
/// Nothing is written and nginx is left alone when the phpMyAdmin files are
/// missing.
pub fn configure(
    layout: &WebLayout,
    runner: &mut dyn CommandRunner,
    dry_run: bool,
) -> Result<(), InstallError> {
    ensure_sources(layout, dry_run)?;
    let install_dir = layout.install_dir.to_string_lossy().into_owned();

    if let Some(archive) = &layout.archive {
        create_dir(&layout.install_dir, dry_run)?;
        runner.run(
            &PlannedCommand::new("tar", &["-xzf"], "unpack phpMyAdmin")
                .arg(archive.to_string_lossy())
                .arg("-C")
                .arg(install_dir.as_str())
                .arg("--strip-components=1"),
        )?;
    }

    let config_inc = layout.config_inc();
    if config_inc.exists() {
        info!("Keeping existing {}", config_inc.display());
    } else {
        let secret = generate_blowfish_secret();
        write_file(&config_inc, &render_config_inc(layout, &secret), dry_run)?;
    }

    create_dir(&layout.temp_dir(), dry_run)?;

    let owner = format!("{0}:{0}", layout.web_user);
    runner.run(
        &PlannedCommand::new("chown", &["-R", owner.as_str(), install_dir.as_str()], "hand phpMyAdmin to the web server user"),
    )?;

    backup_existing(&layout.site_config, dry_run)?;
    write_file(&layout.site_config, &render_site_config(layout), dry_run)?;
    if let Some(link) = &layout.enabled_link {
        enable_site(&layout.site_config, link, dry_run)?;
    }

    runner.run(&PlannedCommand::new("nginx", &["-t"], "validate the nginx configuration"))?;
    runner.run(&PlannedCommand::new("systemctl", &["restart", "nginx"], "restart nginx"))?;
    Ok(())
}

fn create_dir(path: &Path, dry_run: bool) -> Result<(), InstallError> {
    if dry_run {
        info!("Dry run: would create {}", path.display());
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| InstallError::io("create", path, e))
}

fn write_file(path: &Path, content: &str, dry_run: bool) -> Result<(), InstallError> {
    if dry_run {
        info!("Dry run: would write {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::io("create", parent, e))?;
    }
    fs::write(path, content).map_err(|e| InstallError::io("write", path, e))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Move an existing file aside with a timestamp suffix
fn backup_existing(path: &Path, dry_run: bool) -> Result<Option<PathBuf>, InstallError> {
    if !path.exists() {
        return Ok(None);
    }
    let mut backup = path.as_os_str().to_owned();
    backup.push(format!(".bak-{}", Local::now().format("%Y%m%d%H%M%S")));
    let backup = PathBuf::from(backup);

    if dry_run {
        info!("Dry run: would back up {} to {}", path.display(), backup.display());
        return Ok(Some(backup));
    }
    fs::rename(path, &backup).map_err(|e| InstallError::io("back up", path, e))?;
    info!("Backed up {} to {}", path.display(), backup.display());
    Ok(Some(backup))
}

fn enable_site(target: &Path, link: &Path, dry_run: bool) -> Result<(), InstallError> {
    if link.symlink_metadata().is_ok() {
        info!("{} already enabled", link.display());
        return Ok(());
    }
    if dry_run {
        info!("Dry run: would link {} -> {}", link.display(), target.display());
        return Ok(());
    }
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::io("create", parent, e))?;
    }
    std::os::unix::fs::symlink(target, link).map_err(|e| InstallError::io("link", link, e))
}
