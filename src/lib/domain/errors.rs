//! The failures that abort a conversion run

use thiserror::Error;

use crate::domain::configuration::MfcUsage;
use crate::domain::target::TargetKind;

/// Every fatal condition the conversion core can run into.
///
/// They all carry enough context (target, configuration and the offending values) for the
/// user to go and fix the project configuration on the IDE side
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConversionError {
    #[error("Platform '{0}' is not supported")]
    UnsupportedPlatform(String),

    #[error("'{target}' does not contain the configuration '{configuration}|{platform}'")]
    ConfigurationNotFound {
        target: String,
        configuration: String,
        platform: String,
    },

    #[error("Mismatch the type of output of '{target}': {}", describe_per_config(.kinds))]
    InconsistentOutputKind {
        target: String,
        kinds: Vec<(String, TargetKind)>,
    },

    #[error("Mismatch 'Use of MFC' of '{target}': {}", describe_per_config(.usages))]
    InconsistentMfcUsage {
        target: String,
        usages: Vec<(String, MfcUsage)>,
    },

    #[error("Failed to load the project file of '{target}': {message}")]
    DescriptorParseError { target: String, message: String },

    #[error("No configuration of the solution matches the platform '{platform}'")]
    NoMatchingConfigurations { platform: String },

    #[error("The platform of '{project}' does not match {platform}")]
    PlatformMismatch { project: String, platform: String },

    #[error("No project to build is contained in the configuration '{configuration}'")]
    NoProjectsInConfiguration { configuration: String },

    #[error("The solution configurations do not build the same projects")]
    InconsistentProjectSets,

    #[error("No Visual C++ projects to build on platform '{platform}'")]
    NoNativeProjects { platform: String },

    #[error("The conversion failed for: {}", .targets.join(", "))]
    TargetsFailed { targets: Vec<String> },
}

fn describe_per_config<T: std::fmt::Display>(values: &[(String, T)]) -> String {
    values
        .iter()
        .map(|(configuration, value)| format!("{value} ({configuration})"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_kind_message_lists_every_configuration() {
        let err = ConversionError::InconsistentOutputKind {
            target: "core".into(),
            kinds: vec![
                ("Debug".into(), TargetKind::Executable),
                ("Release".into(), TargetKind::DyLib),
            ],
        };

        assert_eq!(
            err.to_string(),
            "Mismatch the type of output of 'core': executable (Debug), dynamic link library (Release)"
        );
    }
}
