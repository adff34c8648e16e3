//! The higher abstractions of the program

use core::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::configuration::{BuildConfiguration, MfcUsage, SubSystem};

/// One buildable unit of the solution, with everything that stays the same across all of
/// its resolved configurations
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Target {
    pub name: String,
    pub kind: TargetKind,
    pub use_of_mfc: MfcUsage,
    pub subsystem: SubSystem,
    /// The directory of the project file, with normalized separators. The generated
    /// descriptor for this target is written here
    pub directory: String,
    pub configurations: Vec<BuildConfiguration>,
    pub files: Vec<TargetFile>,
    /// The evaluated byproducts of the target, keyed by configuration name
    pub outputs: IndexMap<String, TargetOutputs>,
}

impl Target {
    /// The configuration names, in the order they were resolved
    pub fn configuration_names(&self) -> impl Iterator<Item = &str> {
        self.configurations.iter().map(|cfg| cfg.name.as_str())
    }

    /// The path that other targets have to pass to the linker in order to consume this one
    /// for the given configuration, if it produces something linkable at all
    pub fn linkable_output(&self, configuration: &str) -> Option<&str> {
        let outputs = self.outputs.get(configuration)?;
        match self.kind {
            TargetKind::StaticLib => Some(outputs.primary.as_str()),
            TargetKind::DyLib => Some(outputs.import_library.as_str()),
            TargetKind::Executable => None,
        }
        .filter(|path| !path.is_empty())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct TargetOutputs {
    pub primary: String,
    pub import_library: String,
}

/// A file reference declared by a [`Target`]
#[derive(Debug, PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct TargetFile {
    /// Relative to the target directory, with normalized separators
    pub relative_path: String,
    pub full_path: String,
    pub kind: FileKind,
}

/// The different types of final products
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Copy, Clone, Hash)]
pub enum TargetKind {
    #[default]
    #[serde(
        alias = "Executable",
        alias = "executable",
        alias = "exe",
        alias = "application"
    )]
    Executable,
    #[serde(
        alias = "StaticLib",
        alias = "static lib",
        alias = "static-lib",
        alias = "static_lib",
        alias = "staticlib"
    )]
    StaticLib,
    #[serde(
        alias = "DynamicLib",
        alias = "dynamic lib",
        alias = "dyn-lib",
        alias = "dyn_lib",
        alias = "dylib",
        alias = "shared"
    )]
    DyLib,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                TargetKind::Executable => "executable",
                TargetKind::StaticLib => "static link library",
                TargetKind::DyLib => "dynamic link library",
            }
        )
    }
}

/// How the IDE classifies a file of the project. Only the first three kinds are carried
/// over to the generated descriptor
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Copy, Clone, PartialOrd, Ord)]
pub enum FileKind {
    #[serde(alias = "source", alias = "cpp", alias = "c")]
    Source,
    #[serde(alias = "header", alias = "h")]
    Header,
    #[serde(alias = "resource", alias = "rc", alias = "bmp", alias = "ico")]
    Resource,
    #[default]
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library(kind: TargetKind) -> Target {
        let mut outputs = IndexMap::new();
        outputs.insert(
            "Debug".to_string(),
            TargetOutputs {
                primary: "C:/sln/x64/Debug/core.lib".into(),
                import_library: "C:/sln/x64/Debug/core_imp.lib".into(),
            },
        );
        Target {
            name: "core".into(),
            kind,
            use_of_mfc: MfcUsage::None,
            subsystem: SubSystem::NotSet,
            directory: "C:/sln/core".into(),
            configurations: vec![],
            files: vec![],
            outputs,
        }
    }

    #[test]
    fn test_linkable_output_depends_on_the_kind() {
        assert_eq!(
            library(TargetKind::StaticLib).linkable_output("Debug"),
            Some("C:/sln/x64/Debug/core.lib")
        );
        assert_eq!(
            library(TargetKind::DyLib).linkable_output("Debug"),
            Some("C:/sln/x64/Debug/core_imp.lib")
        );
        assert_eq!(library(TargetKind::Executable).linkable_output("Debug"), None);
        assert_eq!(library(TargetKind::StaticLib).linkable_output("Release"), None);
    }
}
