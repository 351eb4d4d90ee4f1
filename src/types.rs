//! Core data types for pmasetup
//!
//! This module defines the host description shared by detection, support
//! checking and dispatch.

use serde::Serialize;

/// Marker used when a probe cannot tell the distribution version
pub const UNKNOWN_VERSION: &str = "?";

/// Where the distribution identity was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionSource {
    OsRelease,
    ReleaseCommand,
    LsbRelease,
    DebianVersion,
    SuseRelease,
    RedhatRelease,
    Uname,
}

impl DetectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionSource::OsRelease => "/etc/os-release",
            DetectionSource::ReleaseCommand => "lsb_release",
            DetectionSource::LsbRelease => "/etc/lsb-release",
            DetectionSource::DebianVersion => "/etc/debian_version",
            DetectionSource::SuseRelease => "/etc/SuSe-release",
            DetectionSource::RedhatRelease => "/etc/redhat-release",
            DetectionSource::Uname => "uname",
        }
    }
}

/// Detected identity of the host
///
/// Built once by [`crate::host::detect`] and never mutated afterwards.
/// `is_supported` always reflects the support table for
/// `(distro_id, version_major)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostEnvironment {
    distro_id: String,
    version_string: String,
    version_major: String,
    cpu_architecture: String,
    is_supported: bool,
    source: DetectionSource,
}

impl HostEnvironment {
    /// Build an environment from raw probe values
    ///
    /// Normalizes the distro id, derives the major version and evaluates the
    /// support table.
    pub fn new(
        distro: &str,
        version: &str,
        cpu_architecture: &str,
        source: DetectionSource,
    ) -> Self {
        let distro_id = normalize_distro_id(distro);
        let version_string = match version.trim() {
            "" => UNKNOWN_VERSION.to_string(),
            v => v.to_string(),
        };
        let version_major = version_major(&version_string);
        let is_supported = crate::host::support::is_supported(&distro_id, &version_major);

        Self {
            distro_id,
            version_string,
            version_major,
            cpu_architecture: cpu_architecture.trim().to_string(),
            is_supported,
            source,
        }
    }

    pub fn distro_id(&self) -> &str {
        &self.distro_id
    }

    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    pub fn version_major(&self) -> &str {
        &self.version_major
    }

    pub fn cpu_architecture(&self) -> &str {
        &self.cpu_architecture
    }

    pub fn is_supported(&self) -> bool {
        self.is_supported
    }

    pub fn source(&self) -> DetectionSource {
        self.source
    }

    /// Human-readable "distro version" label
    pub fn label(&self) -> String {
        format!("{} {}", self.distro_id, self.version_string)
    }
}

/// Lowercase, trimmed distribution identifier
pub fn normalize_distro_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Leading component of a version string
///
/// `"20.04"` becomes `"20"`, `"9"` stays `"9"`, and an unknown version maps
/// to the `"?"` sentinel.
pub fn version_major(version: &str) -> String {
    let version = version.trim();
    if version.is_empty() || version == UNKNOWN_VERSION {
        return UNKNOWN_VERSION.to_string();
    }
    match version.split_once('.') {
        Some((major, _)) => major.to_string(),
        None => version.to_string(),
    }
}
