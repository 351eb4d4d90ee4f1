//! pmasetup - phpMyAdmin installer for panel hosts
//!
//! Installs phpMyAdmin next to an existing panel installation.
//!
//! Features:
//! - Detects the distribution (os-release, lsb_release, legacy markers, uname)
//! - Refuses unsupported distributions before touching anything
//! - Installs PHP dependencies with apt, yum or dnf
//! - Writes config.inc.php and an nginx server block
//!
//! Usage: pmasetup [--dry-run] [--print-env] [--config PATH]

mod app;
mod config;
mod error;
mod host;
mod install;
mod types;
mod ui;

use anyhow::{Context, Result};
use app::Installer;
use clap::Parser;
use config::{Config, ThemeName};
use error::InstallError;
use host::SystemHost;
use install::SystemRunner;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ui::{Printer, TerminalConfirm, Theme};

/// Install and configure phpMyAdmin on top of an existing panel installation
#[derive(Debug, Parser)]
#[command(name = "pmasetup", version, about)]
struct Cli {
    /// Show what would be done without executing
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print the detected host environment as JSON and exit
    #[arg(long)]
    print_env: bool,

    /// Configuration file (default: ~/.config/pmasetup/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // default palette until the config has loaded
    let mut theme = ThemeName::default();
    if let Err(e) = run(&cli, &mut theme) {
        Printer::new(Theme::from_name(theme)).error(&format!("{:#}", e));
        std::process::exit(error::exit_code_for(&e));
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "pmasetup=debug" } else { "pmasetup=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, theme: &mut ThemeName) -> Result<()> {
    let host = SystemHost::new();

    if cli.print_env {
        let env = host::detect(&host);
        let json = serde_json::to_string_pretty(&env)
            .context("Failed to serialize host environment")?;
        println!("{}", json);
        return Ok(());
    }

    if !nix::unistd::Uid::effective().is_root() {
        return Err(InstallError::PrivilegeError.into());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    *theme = config.theme;

    let printer = Printer::new(Theme::from_name(config.theme));
    if cli.dry_run {
        printer.warning("Running in dry-run mode (no changes will be made)");
    }

    let mut confirm = TerminalConfirm::new(&printer);
    let mut runner = SystemRunner::new(cli.dry_run);
    Installer::new(&config, &printer, cli.dry_run).run(&host, &mut confirm, &mut runner)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_means_install() {
        let cli = Cli::try_parse_from(["pmasetup"]).unwrap();
        assert!(!cli.dry_run);
        assert!(!cli.print_env);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["pmasetup", "-n", "--config", "/etc/pmasetup.toml", "-v"]).unwrap();
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/pmasetup.toml")));
    }
}
