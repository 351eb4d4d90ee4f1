//! Host distribution detection
//!
//! Probes, in order, stopping at the first one that yields an identity:
//! - /etc/os-release (`ID`, `VERSION_ID`)
//! - the `lsb_release` command
//! - /etc/lsb-release (`DISTRIB_ID`, `DISTRIB_RELEASE`)
//! - /etc/debian_version, /etc/SuSe-release, /etc/redhat-release markers
//! - uname as the last resort

use crate::types::{DetectionSource, HostEnvironment, UNKNOWN_VERSION};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

const OS_RELEASE: &str = "/etc/os-release";
const LSB_RELEASE: &str = "/etc/lsb-release";
const DEBIAN_VERSION: &str = "/etc/debian_version";
const SUSE_RELEASE: &str = "/etc/SuSe-release";
const REDHAT_RELEASE: &str = "/etc/redhat-release";

/// Output of the release-information command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub distributor: String,
    pub release: String,
}

/// Kernel identification, as reported by uname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uname {
    pub sysname: String,
    pub release: String,
    pub machine: String,
}

/// Read access to the host state detection depends on
pub trait HostSource {
    /// Contents of a file, `None` if it is missing or unreadable
    fn read_file(&self, path: &Path) -> Option<String>;

    fn file_exists(&self, path: &Path) -> bool;

    /// Distributor and release from the release command, `None` if the
    /// command is not on PATH or printed nothing useful
    fn release_command(&self) -> Option<ReleaseInfo>;

    fn uname(&self) -> Uname;
}

/// The real host
///
/// File probes are resolved below `root`, which is `/` outside of tests.
#[derive(Debug, Clone)]
pub struct SystemHost {
    root: PathBuf,
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemHost {
    pub fn new() -> Self {
        Self::with_root("/")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path.strip_prefix("/").unwrap_or(path))
    }
}

impl HostSource for SystemHost {
    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(self.resolve(path)).ok()
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn release_command(&self) -> Option<ReleaseInfo> {
        let program = which::which("lsb_release").ok()?;
        let query = |flag: &str| -> Option<String> {
            let output = Command::new(&program).arg(flag).output().ok()?;
            if !output.status.success() {
                return None;
            }
            let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!value.is_empty()).then_some(value)
        };

        Some(ReleaseInfo {
            distributor: query("-si")?,
            release: query("-sr")?,
        })
    }

    fn uname(&self) -> Uname {
        match nix::sys::utsname::uname() {
            Ok(uts) => Uname {
                sysname: uts.sysname().to_string_lossy().into_owned(),
                release: uts.release().to_string_lossy().into_owned(),
                machine: uts.machine().to_string_lossy().into_owned(),
            },
            Err(e) => {
                warn!("uname failed ({}), using build target information", e);
                Uname {
                    sysname: std::env::consts::OS.to_string(),
                    release: UNKNOWN_VERSION.to_string(),
                    machine: std::env::consts::ARCH.to_string(),
                }
            }
        }
    }
}

/// Detect the host environment
///
/// Never fails: when no structured source is available the uname fallback
/// still produces an environment.
pub fn detect(host: &dyn HostSource) -> HostEnvironment {
    let uname = host.uname();
    let (distro, version, source) = probe_identity(host, &uname);

    let env = HostEnvironment::new(&distro, &version, &uname.machine, source);
    debug!(
        distro = %env.distro_id(),
        version = %env.version_string(),
        major = %env.version_major(),
        arch = %env.cpu_architecture(),
        source = env.source().as_str(),
        "Detected host environment"
    );
    env
}

fn probe_identity(host: &dyn HostSource, uname: &Uname) -> (String, String, DetectionSource) {
    if let Some(content) = host.read_file(Path::new(OS_RELEASE)) {
        if let Some((id, version)) = identity_from(&content, "ID", "VERSION_ID") {
            return (id, version, DetectionSource::OsRelease);
        }
        debug!("{} has no ID field, trying next source", OS_RELEASE);
    }

    if let Some(info) = host.release_command() {
        return (info.distributor, info.release, DetectionSource::ReleaseCommand);
    }

    if let Some(content) = host.read_file(Path::new(LSB_RELEASE)) {
        if let Some((id, version)) = identity_from(&content, "DISTRIB_ID", "DISTRIB_RELEASE") {
            return (id, version, DetectionSource::LsbRelease);
        }
    }

    let markers = [
        (DEBIAN_VERSION, "debian", DetectionSource::DebianVersion),
        (SUSE_RELEASE, "suse", DetectionSource::SuseRelease),
        (REDHAT_RELEASE, "redhat", DetectionSource::RedhatRelease),
    ];
    for (path, distro, source) in markers {
        if host.file_exists(Path::new(path)) {
            return (distro.to_string(), UNKNOWN_VERSION.to_string(), source);
        }
    }

    (uname.sysname.clone(), uname.release.clone(), DetectionSource::Uname)
}

/// Pull an (id, version) pair out of a shell-style release file
///
/// Returns `None` when the id key is missing or empty. A missing version is
/// reported as unknown.
fn identity_from(content: &str, id_key: &str, version_key: &str) -> Option<(String, String)> {
    let fields = parse_release_file(content);
    let id = fields.get(id_key).filter(|v| !v.is_empty())?;
    let version = fields
        .get(version_key)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
    Some((id.clone(), version))
}

/// Parse `KEY=value` lines, stripping one level of quotes
pub fn parse_release_file(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
