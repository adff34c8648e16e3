//! The resolved property values that a project model provider hands to the conversion core.
//!
//! They mirror what the IDE automation layer exposes for a solution and its native
//! projects, already split per configuration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::configuration::{CharacterSet, MfcUsage, SubSystem};
use crate::domain::settings::PchMode;
use crate::domain::target::{FileKind, TargetKind};

/// The solution being converted
///
/// ### Tests
///
/// ```rust
/// use sln2cmake::provider::model::SolutionInfo;
///
/// const SOLUTION_MOCK: &str = r#"
///     name = 'demo'
///     directory = 'C:\work\demo'
///
///     [[configurations]]
///     name = 'Debug'
///     platform = 'x64'
///     contexts = [
///         { project = 'app', configuration = 'Debug', platform = 'x64' },
///         { project = 'tools', configuration = 'Debug', platform = 'x64', should_build = false },
///     ]
/// "#;
///
/// let solution: SolutionInfo = toml::from_str(SOLUTION_MOCK)
///     .expect("A failure happened parsing the solution mock");
///
/// assert_eq!(solution.name, "demo");
/// assert_eq!(solution.configurations.len(), 1);
///
/// let contexts = &solution.configurations[0].contexts;
/// assert!(contexts[0].should_build);
/// assert!(!contexts[1].should_build);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
pub struct SolutionInfo {
    pub name: String,
    /// The root of the project tree. Paths below it are written relative to the aggregate
    /// descriptor
    pub directory: String,
    #[serde(default)]
    pub configurations: Vec<SolutionConfiguration>,
}

/// A `Configuration|Platform` pair of the solution, with the project configuration that
/// every project builds under it
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
pub struct SolutionConfiguration {
    pub name: String,
    pub platform: String,
    #[serde(default)]
    pub contexts: Vec<SolutionContext>,
}

/// How one project takes part in a [`SolutionConfiguration`]
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SolutionContext {
    pub project: String,
    pub configuration: String,
    pub platform: String,
    #[serde(default = "should_build_by_default")]
    pub should_build: bool,
}

fn should_build_by_default() -> bool {
    true
}

/// A project of the solution
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ProjectInfo {
    pub name: String,
    /// The absolute path of the project file
    pub full_path: String,
    /// Whether this is a Visual C++ project. Any other kind of project is skipped
    pub native: bool,
}

impl ProjectInfo {
    /// The directory that holds the project file, with forward slashes
    pub fn directory(&self) -> String {
        let normalized = self.full_path.replace('\\', "/");
        match normalized.rfind('/') {
            Some(idx) => normalized[..idx].to_string(),
            None => String::new(),
        }
    }
}

/// One configuration of a project, as the IDE evaluates it
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfiguration {
    pub name: String,
    pub platform: String,
    pub kind: TargetKind,
    pub use_of_mfc: MfcUsage,
    pub character_set: CharacterSet,
    pub subsystem: SubSystem,
    pub primary_output: String,
    /// Only meaningful for dynamic libraries
    pub import_library: String,
    /// The build macros defined for this configuration, ie: `OutDir`, `IntDir`...
    pub macros: IndexMap<String, String>,
    pub compiler: CompilerTool,
    pub linker: LinkerTool,
}

/// The compiler properties of a project configuration.
///
/// List values are kept as the IDE stores them, so an entry may still hold several
/// `;` separated items or inheritance placeholders like `%(PreprocessorDefinitions)`
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompilerTool {
    pub additional_include_directories: Vec<String>,
    pub preprocessor_definitions: Vec<String>,
    pub precompiled_header: PchMode,
    /// The header the precompiled header is built through (`/Yu"header"`)
    pub precompiled_header_through: String,
    /// Where the compiled header is written (`/Fp"file"`)
    pub precompiled_header_output: String,
    /// Not exposed by every version of the IDE automation layer. When missing, the value is
    /// read from the raw project file
    pub sdl_check: Option<bool>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LinkerTool {
    pub additional_library_directories: Vec<String>,
    /// Space or `;` separated library references
    pub additional_dependencies: Vec<String>,
}

/// A file referenced by a project
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
pub struct ProjectFile {
    /// Relative to the project directory
    pub relative_path: String,
    #[serde(default)]
    pub full_path: String,
    #[serde(default)]
    pub kind: FileKind,
    /// The properties this file overrides, keyed by project configuration name
    #[serde(default)]
    pub configurations: IndexMap<String, FileTool>,
}

/// The compiler properties overridden by a single file. `None` means the file inherits the
/// project value
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileTool {
    pub additional_include_directories: Option<Vec<String>>,
    pub preprocessor_definitions: Option<Vec<String>>,
    pub precompiled_header: Option<PchMode>,
    pub precompiled_header_through: Option<String>,
    pub precompiled_header_output: Option<String>,
    pub sdl_check: Option<bool>,
}
