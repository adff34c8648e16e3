//! Build configurations and the per-configuration project properties that must agree
//! across all of them

use core::fmt;

use serde::{Deserialize, Serialize};

/// A named build variant of a target, resolved against the solution.
///
/// `name` is the solution level name, the one written to the generated descriptor, while
/// `project_configuration` is the name the project itself uses for the same variant. They
/// only differ when the solution maps a configuration onto a differently named one
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct BuildConfiguration {
    pub name: String,
    pub project_configuration: String,
    pub platform: String,
}

impl BuildConfiguration {
    pub fn new(
        name: impl Into<String>,
        project_configuration: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            project_configuration: project_configuration.into(),
            platform: platform.into(),
        }
    }

    /// The condition under which the project file scopes the properties of this
    /// configuration, ie: `'$(Configuration)|$(Platform)'=='Debug|x64'`
    pub fn condition(&self) -> String {
        condition_for(&self.project_configuration, &self.platform)
    }
}

pub fn condition_for(configuration: &str, platform: &str) -> String {
    format!("'$(Configuration)|$(Platform)'=='{configuration}|{platform}'")
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Copy, Clone, Hash)]
pub enum MfcUsage {
    #[default]
    #[serde(alias = "none", alias = "std", alias = "useMfcStdWin")]
    None,
    #[serde(alias = "static", alias = "useMfcStatic")]
    Static,
    #[serde(alias = "dynamic", alias = "shared", alias = "useMfcDynamic")]
    Dynamic,
}

impl MfcUsage {
    pub fn uses_mfc(&self) -> bool {
        !matches!(self, MfcUsage::None)
    }

    /// The value of the `CMAKE_MFC_FLAG` variable
    pub fn cmake_flag(&self) -> Option<u8> {
        match *self {
            MfcUsage::None => None,
            MfcUsage::Static => Some(1),
            MfcUsage::Dynamic => Some(2),
        }
    }
}

impl fmt::Display for MfcUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                MfcUsage::None => "standard windows libraries",
                MfcUsage::Static => "MFC in a static library",
                MfcUsage::Dynamic => "MFC in a shared DLL",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Copy, Clone)]
pub enum CharacterSet {
    #[default]
    #[serde(alias = "not_set", alias = "none")]
    NotSet,
    #[serde(alias = "unicode")]
    Unicode,
    #[serde(alias = "mbcs", alias = "multibyte")]
    Mbcs,
}

impl CharacterSet {
    pub fn implied_definition(&self) -> Option<&'static str> {
        match *self {
            CharacterSet::NotSet => None,
            CharacterSet::Unicode => Some("_UNICODE"),
            CharacterSet::Mbcs => Some("_MBCS"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Copy, Clone)]
pub enum SubSystem {
    #[default]
    #[serde(alias = "not_set", alias = "none")]
    NotSet,
    #[serde(alias = "console")]
    Console,
    #[serde(alias = "windows")]
    Windows,
    #[serde(other)]
    Other,
}
