//! The build settings that are compared between a target and each one of its files

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utils::constants::pch_defaults;

/// The settings of a target (or of one of its files), keyed by configuration name
pub type SettingsPerConfig = IndexMap<String, Settings>;

/// The value of every setting category for one configuration
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Settings {
    pub include_directories: Vec<String>,
    pub definitions: Vec<String>,
    pub library_directories: Vec<String>,
    pub link_libraries: Vec<String>,
    pub pch: PchSetting,
    /// `None` when the project does not state the flag at all, which is not the same as
    /// `Some(false)`
    pub sdl_check: Option<bool>,
}

impl Settings {
    /// Whether `self` and `other` would build a translation unit the same way.
    ///
    /// Definitions are compared as sets, every other category compares by exact value
    pub fn is_equivalent(&self, other: &Settings) -> bool {
        self.include_directories == other.include_directories
            && definitions_equivalent(&self.definitions, &other.definitions)
            && self.library_directories == other.library_directories
            && self.link_libraries == other.link_libraries
            && self.pch == other.pch
            && self.sdl_check == other.sdl_check
    }
}

/// Order insensitive comparison of two lists of preprocessor definitions
pub fn definitions_equivalent(lhs: &[String], rhs: &[String]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    let mut lhs: Vec<&String> = lhs.iter().collect();
    let mut rhs: Vec<&String> = rhs.iter().collect();
    lhs.sort();
    rhs.sort();
    lhs == rhs
}

/// The settings of a single translation unit of a target
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FileSettings {
    /// Relative to the target directory
    pub file: String,
    pub per_config: SettingsPerConfig,
}

impl FileSettings {
    /// True when the file builds exactly as the target defaults in every configuration
    pub fn matches_defaults(&self, defaults: &SettingsPerConfig) -> bool {
        defaults.iter().all(|(cfg, target_settings)| {
            self.per_config
                .get(cfg)
                .is_some_and(|s| s.is_equivalent(target_settings))
        })
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Copy, Clone)]
pub enum PchMode {
    #[default]
    #[serde(alias = "none", alias = "pchNone")]
    None,
    #[serde(alias = "use", alias = "pchUseUsingSpecific")]
    Use,
    #[serde(alias = "create", alias = "pchCreateUsingSpecific")]
    Create,
}

/// Precompiled header setting, compared by value
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct PchSetting {
    pub mode: PchMode,
    pub header: String,
    pub pch_file: String,
}

impl PchSetting {
    pub fn new(mode: PchMode, header: impl Into<String>, pch_file: impl Into<String>) -> Self {
        Self {
            mode,
            header: header.into(),
            pch_file: pch_file.into(),
        }
    }

    /// Builds the MSVC flags for this setting, leaving out the header and the output file
    /// when they hold the IDE defaults. Empty when no precompiled header is involved
    pub fn flags(&self) -> String {
        let mut flags = match self.mode {
            PchMode::None => return String::new(),
            PchMode::Use => String::from("/Yu"),
            PchMode::Create => String::from("/Yc"),
        };
        if !self.header.is_empty() && self.header != pch_defaults::HEADER_FILE {
            flags.push_str(&format!("\"{}\"", self.header));
        }
        if !self.pch_file.is_empty() && self.pch_file != pch_defaults::PCH_FILE {
            flags.push_str(&format!(" /Fp\"{}\"", self.pch_file));
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_definitions_compare_as_sets() {
        assert!(definitions_equivalent(&defs(&["B", "A"]), &defs(&["A", "B"])));
        assert!(!definitions_equivalent(
            &defs(&["A", "B", "C"]),
            &defs(&["A", "B"])
        ));
        assert!(!definitions_equivalent(&defs(&["A", "A"]), &defs(&["A", "B"])));
    }

    #[test]
    fn test_pch_flags() {
        assert_eq!(PchSetting::default().flags(), "");
        assert_eq!(
            PchSetting::new(PchMode::Use, "stdafx.h", "$(IntDir)$(TargetName).pch").flags(),
            "/Yu"
        );
        assert_eq!(
            PchSetting::new(PchMode::Create, "pch.h", "$(IntDir)$(TargetName).pch").flags(),
            "/Yc\"pch.h\""
        );
        assert_eq!(
            PchSetting::new(PchMode::Use, "pch.h", "out/app.pch").flags(),
            "/Yu\"pch.h\" /Fp\"out/app.pch\""
        );
    }

    #[test]
    fn test_pch_settings_are_values() {
        let lhs = PchSetting::new(PchMode::Use, "pch.h", "a.pch");
        let rhs = PchSetting::new(PchMode::Use, "pch.h", "a.pch");
        assert_eq!(lhs, rhs);
        assert_ne!(lhs, PchSetting::new(PchMode::Use, "pch.h", "b.pch"));
    }
}
