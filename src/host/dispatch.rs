//! Installer routine selection
//!
//! Maps a supported `(distro_id, version_major)` pair to the package-index
//! refresh to run first and the dependency routine to run after it. The
//! pre-step is table data so yum and dnf hosts never get the wrong refresh.

use crate::error::InstallError;
use crate::types::HostEnvironment;
use tracing::debug;

/// Package-index refresh run before a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreStep {
    Apt,
    Yum,
    Dnf,
}

impl PreStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreStep::Apt => "package-index refresh (apt)",
            PreStep::Yum => "package-index refresh (yum)",
            PreStep::Dnf => "package-index refresh (dnf)",
        }
    }
}

/// Dependency installation routines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    Ubuntu20,
    Ubuntu18,
    DebianStretch,
    Debian,
    Centos7,
    Centos8,
}

impl Routine {
    /// Stable routine identifier
    pub fn name(&self) -> &'static str {
        match self {
            Routine::Ubuntu20 => "ubuntu20_dep",
            Routine::Ubuntu18 => "ubuntu18_dep",
            Routine::DebianStretch => "debian_stretch_dep",
            Routine::Debian => "debian_dep",
            Routine::Centos7 => "centos7_dep",
            Routine::Centos8 => "centos8_dep",
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Routine::Ubuntu20 | Routine::Ubuntu18 | Routine::DebianStretch | Routine::Debian => {
                Family::Debian
            }
            Routine::Centos7 | Routine::Centos8 => Family::RedHat,
        }
    }
}

/// Platform family; decides web user, PHP-FPM socket and nginx layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Debian,
    RedHat,
}

impl Family {
    pub fn php_socket(&self) -> &'static str {
        match self {
            Family::Debian => "/run/php/php8.0-fpm.sock",
            Family::RedHat => "/var/run/php-fpm/panel.sock",
        }
    }

    pub fn web_user(&self) -> &'static str {
        match self {
            Family::Debian => "www-data",
            Family::RedHat => "nginx",
        }
    }
}

/// One row of the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchEntry {
    pub distro_id: &'static str,
    pub version_major: &'static str,
    pub pre_step: PreStep,
    pub routine: Routine,
}

pub const DISPATCH_TABLE: &[DispatchEntry] = &[
    DispatchEntry { distro_id: "ubuntu", version_major: "20", pre_step: PreStep::Apt, routine: Routine::Ubuntu20 },
    DispatchEntry { distro_id: "ubuntu", version_major: "18", pre_step: PreStep::Apt, routine: Routine::Ubuntu18 },
    DispatchEntry { distro_id: "debian", version_major: "9", pre_step: PreStep::Apt, routine: Routine::DebianStretch },
    DispatchEntry { distro_id: "debian", version_major: "10", pre_step: PreStep::Apt, routine: Routine::Debian },
    DispatchEntry { distro_id: "centos", version_major: "7", pre_step: PreStep::Yum, routine: Routine::Centos7 },
    DispatchEntry { distro_id: "centos", version_major: "8", pre_step: PreStep::Dnf, routine: Routine::Centos8 },
];

/// Selected installation steps for a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallPlan {
    pub pre_step: PreStep,
    pub routine: Routine,
}

impl InstallPlan {
    pub fn family(&self) -> Family {
        self.routine.family()
    }
}

/// Select the installation steps for a supported environment
///
/// Selection depends only on `(distro_id, version_major)`. A supported pair
/// missing from the table is reported, never skipped.
pub fn dispatch(env: &HostEnvironment) -> Result<InstallPlan, InstallError> {
    let entry = DISPATCH_TABLE
        .iter()
        .find(|e| e.distro_id == env.distro_id() && e.version_major == env.version_major())
        .ok_or_else(|| InstallError::MissingDispatchEntry {
            distro: env.distro_id().to_string(),
            version: env.version_string().to_string(),
        })?;

    debug!(
        routine = entry.routine.name(),
        pre_step = entry.pre_step.as_str(),
        "Selected installer routine"
    );
    Ok(InstallPlan {
        pre_step: entry.pre_step,
        routine: entry.routine,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::support::SUPPORT_TABLE;
    use crate::types::DetectionSource;

    fn env(distro: &str, version: &str) -> HostEnvironment {
        HostEnvironment::new(distro, version, "x86_64", DetectionSource::OsRelease)
    }

    #[test]
    fn test_ubuntu_20_selects_apt_then_ubuntu20_dep() {
        let plan = dispatch(&env("ubuntu", "20.04")).unwrap();
        assert_eq!(plan.pre_step, PreStep::Apt);
        assert_eq!(plan.routine.name(), "ubuntu20_dep");
        assert!(plan.pre_step.as_str().starts_with("package-index refresh"));
    }

    #[test]
    fn test_full_table() {
        let cases = [
            ("ubuntu", "20.04", PreStep::Apt, "ubuntu20_dep"),
            ("ubuntu", "18.04", PreStep::Apt, "ubuntu18_dep"),
            ("debian", "9", PreStep::Apt, "debian_stretch_dep"),
            ("debian", "10", PreStep::Apt, "debian_dep"),
            ("centos", "7", PreStep::Yum, "centos7_dep"),
            ("centos", "8", PreStep::Dnf, "centos8_dep"),
        ];
        for (distro, version, pre_step, routine) in cases {
            let plan = dispatch(&env(distro, version)).unwrap();
            assert_eq!(plan.pre_step, pre_step, "{} {}", distro, version);
            assert_eq!(plan.routine.name(), routine);
        }
    }

    #[test]
    fn test_every_supported_pair_has_an_entry() {
        for (distro, majors) in SUPPORT_TABLE {
            for major in *majors {
                assert!(
                    dispatch(&env(distro, major)).is_ok(),
                    "missing dispatch entry for {} {}",
                    distro,
                    major
                );
            }
        }
    }

    #[test]
    fn test_every_entry_is_supported() {
        for entry in DISPATCH_TABLE {
            assert!(crate::host::support::is_supported(entry.distro_id, entry.version_major));
        }
    }

    #[test]
    fn test_unknown_pair_is_an_error() {
        let err = dispatch(&env("fedora", "34")).unwrap_err();
        assert!(matches!(err, InstallError::MissingDispatchEntry { .. }));
    }

    #[test]
    fn test_families() {
        assert_eq!(Routine::DebianStretch.family(), Family::Debian);
        assert_eq!(Routine::Centos7.family(), Family::RedHat);
        assert_eq!(Family::Debian.web_user(), "www-data");
        assert_eq!(Family::RedHat.web_user(), "nginx");
    }
}
