//! The data structures that hold a project model snapshot, as it is exported from the IDE
//! into a TOML or a JSON file

use std::path::Path;

use color_eyre::{eyre::eyre, eyre::Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::provider::model::{ProjectConfiguration, ProjectFile, ProjectInfo, SolutionInfo};
use crate::utils::constants::error_messages;

/// ```rust
/// use sln2cmake::model_file::{self, ModelFormat};
/// use sln2cmake::domain::target::{FileKind, TargetKind};
/// use sln2cmake::domain::settings::PchMode;
///
/// const MODEL_FILE_MOCK: &str = r#"
///     [solution]
///     name = 'demo'
///     directory = 'C:/work/demo'
///
///     [[solution.configurations]]
///     name = 'Debug'
///     platform = 'x64'
///     contexts = [ { project = 'app', configuration = 'Debug', platform = 'x64' } ]
///
///     [environment]
///     BOOST_ROOT = 'C:/libs/boost'
///
///     [[projects]]
///     name = 'app'
///     full_path = 'C:/work/demo/app/app.vcxproj'
///     descriptor = 'app/app.vcxproj'
///
///     [[projects.configurations]]
///     name = 'Debug'
///     platform = 'x64'
///     kind = 'executable'
///     character_set = 'unicode'
///     primary_output = 'C:/work/demo/x64/Debug/app.exe'
///     macros = { OutDir = 'C:/work/demo/x64/Debug/' }
///     compiler = { preprocessor_definitions = ['WIN32', '_DEBUG'], precompiled_header = 'use' }
///     linker = { additional_dependencies = ['core.lib'] }
///
///     [[projects.files]]
///     relative_path = 'main.cpp'
///     kind = 'source'
///
///     [[projects.files]]
///     relative_path = 'stdafx.cpp'
///     kind = 'source'
///     configurations = { Debug = { precompiled_header = 'create' } }
/// "#;
///
/// let model = model_file::model_from_str(MODEL_FILE_MOCK, ModelFormat::Toml)
///     .expect("A failure happened parsing the model file");
///
/// assert_eq!(model.solution.name, "demo");
/// assert_eq!(model.environment.get("BOOST_ROOT").unwrap(), "C:/libs/boost");
///
/// let app = &model.projects[0];
/// assert!(app.native);
/// assert_eq!(app.descriptor.as_deref(), Some("app/app.vcxproj"));
///
/// let debug = &app.configurations[0];
/// assert_eq!(debug.kind, TargetKind::Executable);
/// assert_eq!(debug.compiler.precompiled_header, PchMode::Use);
/// assert_eq!(debug.macros.get("OutDir").unwrap(), "C:/work/demo/x64/Debug/");
///
/// let stdafx = &app.files[1];
/// assert_eq!(stdafx.kind, FileKind::Source);
/// assert_eq!(stdafx.configurations["Debug"].precompiled_header, Some(PchMode::Create));
/// assert!(stdafx.configurations["Debug"].preprocessor_definitions.is_none());
/// ```
/// The [`ModelFile`] is the type that holds the whole exported solution
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
pub struct ModelFile {
    pub solution: SolutionInfo,
    /// The environment that was visible to the IDE when the snapshot was taken
    #[serde(default)]
    pub environment: IndexMap<String, String>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

/// One project of the snapshot
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
pub struct ProjectEntry {
    pub name: String,
    pub full_path: String,
    #[serde(default = "native_by_default")]
    pub native: bool,
    /// Path to the raw project file, relative to the model file
    #[serde(default)]
    pub descriptor: Option<String>,
    /// The raw project file embedded on the snapshot. Wins over `descriptor`
    #[serde(default)]
    pub descriptor_text: Option<String>,
    #[serde(default)]
    pub configurations: Vec<ProjectConfiguration>,
    #[serde(default)]
    pub files: Vec<ProjectFile>,
}

fn native_by_default() -> bool {
    true
}

impl ProjectEntry {
    pub fn info(&self) -> ProjectInfo {
        ProjectInfo {
            name: self.name.clone(),
            full_path: self.full_path.clone(),
            native: self.native,
        }
    }
}

/// The serialization formats a snapshot can be written in
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ModelFormat {
    Toml,
    Json,
}

impl ModelFormat {
    /// Picks the format from the extension of the file
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ModelFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ModelFormat::Json),
            _ => Err(eyre!("{}: {:?}", error_messages::UNKNOWN_MODEL_FORMAT, path)),
        }
    }
}

pub fn model_from_str(raw: &str, format: ModelFormat) -> Result<ModelFile> {
    match format {
        ModelFormat::Toml => {
            toml::from_str(raw).with_context(|| error_messages::PARSE_MODEL_FILE)
        }
        ModelFormat::Json => {
            serde_json::from_str(raw).with_context(|| error_messages::PARSE_MODEL_FILE)
        }
    }
}
