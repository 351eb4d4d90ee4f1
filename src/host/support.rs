//! Support checks
//!
//! The architecture check only warns and asks; the distro/version check is a
//! hard gate against [`SUPPORT_TABLE`].

use crate::error::InstallError;
use crate::types::HostEnvironment;
use crate::ui::Confirm;
use tracing::{debug, info, warn};

/// Architecture the installer is tested on
pub const REFERENCE_ARCH: &str = "x86_64";

/// Supported major versions per distribution
pub const SUPPORT_TABLE: &[(&str, &[&str])] = &[
    ("ubuntu", &["18", "20"]),
    ("debian", &["9", "10"]),
    ("centos", &["7", "8"]),
];

/// Whether `(distro_id, version_major)` is an installable target
pub fn is_supported(distro_id: &str, version_major: &str) -> bool {
    SUPPORT_TABLE
        .iter()
        .any(|(distro, majors)| *distro == distro_id && majors.contains(&version_major))
}

/// Run the architecture check, then the support-table lookup
///
/// A non-reference architecture needs operator confirmation; declining
/// returns [`InstallError::UnsupportedArchitectureDeclined`] before the
/// support table is consulted. `Ok(false)` means the distro/version pair is
/// unsupported and the caller must stop.
pub fn check_supported(
    env: &HostEnvironment,
    reference_arch: &str,
    confirm: &mut dyn Confirm,
) -> Result<bool, InstallError> {
    if env.cpu_architecture() != reference_arch {
        warn!(
            arch = %env.cpu_architecture(),
            expected = reference_arch,
            "Host architecture differs from the reference architecture"
        );
        let question = format!(
            "Detected CPU architecture {} (expected {}). Using any other architecture than {} may cause problems. Continue anyway?",
            env.cpu_architecture(), reference_arch, reference_arch
        );
        if !confirm.confirm(&question) {
            return Err(InstallError::UnsupportedArchitectureDeclined {
                arch: env.cpu_architecture().to_string(),
            });
        }
        info!("Continuing on {} at operator request", env.cpu_architecture());
    }

    debug!(
        distro = %env.distro_id(),
        major = %env.version_major(),
        supported = env.is_supported(),
        "Support table lookup"
    );
    Ok(env.is_supported())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetectionSource;

    /// Records questions and answers with a fixed reply
    struct ScriptedConfirm {
        answer: bool,
        asked: Vec<String>,
    }

    impl ScriptedConfirm {
        fn answering(answer: bool) -> Self {
            Self { answer, asked: Vec::new() }
        }
    }

    impl Confirm for ScriptedConfirm {
        fn confirm(&mut self, question: &str) -> bool {
            self.asked.push(question.to_string());
            self.answer
        }
    }

    fn env(distro: &str, version: &str, arch: &str) -> HostEnvironment {
        HostEnvironment::new(distro, version, arch, DetectionSource::OsRelease)
    }

    #[test]
    fn test_all_table_pairs_supported() {
        for (distro, majors) in SUPPORT_TABLE {
            for major in *majors {
                let mut confirm = ScriptedConfirm::answering(false);
                let env = env(distro, major, REFERENCE_ARCH);
                assert!(check_supported(&env, REFERENCE_ARCH, &mut confirm).unwrap());
                assert!(confirm.asked.is_empty());
            }
        }
    }

    #[test]
    fn test_pairs_outside_table_unsupported() {
        let cases = [
            ("fedora", "34"),
            ("ubuntu", "22.04"),
            ("ubuntu", "16.04"),
            ("debian", "11"),
            ("centos", "6"),
            ("redhat", "?"),
            ("debian", "?"),
        ];
        for (distro, version) in cases {
            let mut confirm = ScriptedConfirm::answering(true);
            let env = env(distro, version, REFERENCE_ARCH);
            assert!(!check_supported(&env, REFERENCE_ARCH, &mut confirm).unwrap(), "{} {}", distro, version);
        }
    }

    #[test]
    fn test_reference_arch_does_not_prompt() {
        let mut confirm = ScriptedConfirm::answering(false);
        check_supported(&env("ubuntu", "20.04", "x86_64"), REFERENCE_ARCH, &mut confirm).unwrap();
        assert!(confirm.asked.is_empty());
    }

    #[test]
    fn test_other_arch_declined_aborts() {
        let mut confirm = ScriptedConfirm::answering(false);
        let err = check_supported(&env("centos", "8", "arm64"), REFERENCE_ARCH, &mut confirm).unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedArchitectureDeclined { ref arch } if arch == "arm64"));
        assert_eq!(confirm.asked.len(), 1);
        assert!(confirm.asked[0].contains("arm64"));
    }

    #[test]
    fn test_other_arch_accepted_still_checks_table() {
        let mut confirm = ScriptedConfirm::answering(true);
        assert!(check_supported(&env("centos", "8", "aarch64"), REFERENCE_ARCH, &mut confirm).unwrap());

        let mut confirm = ScriptedConfirm::answering(true);
        assert!(!check_supported(&env("fedora", "34", "aarch64"), REFERENCE_ARCH, &mut confirm).unwrap());
    }

    #[test]
    fn test_is_supported_needs_normalized_input() {
        assert!(is_supported("ubuntu", "20"));
        assert!(!is_supported("ubuntu", "20.04"));
        assert!(!is_supported("Ubuntu", "20"));
    }
}
