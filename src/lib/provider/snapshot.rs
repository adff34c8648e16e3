//! A [`ProjectModelProvider`](super::ProjectModelProvider) backed by a project model
//! snapshot

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::ConversionError;
use crate::model_file::{ModelFile, ProjectEntry};
use crate::utils::macros::replace_macros;

use super::descriptor::RawDescriptor;
use super::model::{ProjectConfiguration, ProjectFile, ProjectInfo, SolutionInfo};
use super::{ConfigurationEnumeration, MacroEvaluation, RawDescriptorAccess};

/// Macro values may reference other macros. Past this depth the remaining references are
/// left as they are
const MAX_MACRO_DEPTH: usize = 8;

/// Serves the solution described by a [`ModelFile`]
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    model: ModelFile,
    projects: Vec<ProjectInfo>,
    /// The directory of the snapshot file, where relative descriptor paths start from
    base_dir: PathBuf,
}

impl SnapshotProvider {
    pub fn new(model: ModelFile, base_dir: impl Into<PathBuf>) -> Self {
        let projects = model.projects.iter().map(ProjectEntry::info).collect();
        Self {
            model,
            projects,
            base_dir: base_dir.into(),
        }
    }

    pub fn model(&self) -> &ModelFile {
        &self.model
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn entry(&self, project: &str) -> Option<&ProjectEntry> {
        self.model.projects.iter().find(|p| p.name == project)
    }

    fn resolve_macro(
        &self,
        project: &str,
        configuration: &ProjectConfiguration,
        name: &str,
        depth: usize,
    ) -> String {
        let value = configuration
            .macros
            .get(name)
            .cloned()
            .or_else(|| self.builtin_macro(project, configuration, name))
            .or_else(|| self.model.environment.get(name).cloned())
            .unwrap_or_default();

        if depth < MAX_MACRO_DEPTH && value.contains("$(") {
            replace_macros(&value, |inner| {
                self.resolve_macro(project, configuration, inner, depth + 1)
            })
        } else {
            value
        }
    }

    fn builtin_macro(
        &self,
        project: &str,
        configuration: &ProjectConfiguration,
        name: &str,
    ) -> Option<String> {
        match name {
            "Configuration" => Some(configuration.name.clone()),
            "Platform" => Some(configuration.platform.clone()),
            "ProjectName" => Some(project.to_string()),
            "ProjectDir" => self
                .projects
                .iter()
                .find(|p| p.name == project)
                .map(|p| format!("{}/", p.directory())),
            "SolutionName" => Some(self.model.solution.name.clone()),
            "SolutionDir" => Some(format!(
                "{}/",
                self.model.solution.directory.trim_end_matches(['/', '\\'])
            )),
            _ => None,
        }
    }
}

impl ConfigurationEnumeration for SnapshotProvider {
    fn solution(&self) -> &SolutionInfo {
        &self.model.solution
    }

    fn projects(&self) -> &[ProjectInfo] {
        &self.projects
    }

    fn project_configurations(&self, project: &str) -> &[ProjectConfiguration] {
        self.entry(project)
            .map(|p| p.configurations.as_slice())
            .unwrap_or_default()
    }

    fn project_files(&self, project: &str) -> &[ProjectFile] {
        self.entry(project)
            .map(|p| p.files.as_slice())
            .unwrap_or_default()
    }
}

impl MacroEvaluation for SnapshotProvider {
    fn evaluate(
        &self,
        project: &str,
        configuration: &ProjectConfiguration,
        text: &str,
    ) -> String {
        replace_macros(text, |name| {
            self.resolve_macro(project, configuration, name, 0)
        })
    }
}

impl RawDescriptorAccess for SnapshotProvider {
    fn raw_descriptor(&self, project: &str) -> Result<RawDescriptor, ConversionError> {
        let Some(entry) = self.entry(project) else {
            return Ok(RawDescriptor::default());
        };

        if let Some(text) = entry.descriptor_text.as_deref() {
            return RawDescriptor::parse(project, text);
        }

        match entry.descriptor.as_deref() {
            Some(path) => {
                let path = self.base_dir.join(path);
                let text = fs::read_to_string(&path).map_err(|e| {
                    ConversionError::DescriptorParseError {
                        target: project.to_string(),
                        message: format!("{path:?}: {e}"),
                    }
                })?;
                RawDescriptor::parse(project, &text)
            }
            None => Ok(RawDescriptor::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    fn provider() -> (SnapshotProvider, ProjectConfiguration) {
        let mut macros = IndexMap::new();
        macros.insert(
            "OutDir".to_string(),
            "$(SolutionDir)$(Platform)/$(Configuration)/".to_string(),
        );

        let configuration = ProjectConfiguration {
            name: "Debug".into(),
            platform: "x64".into(),
            macros,
            ..Default::default()
        };

        let mut environment = IndexMap::new();
        environment.insert("BOOST_ROOT".to_string(), "C:/libs/boost".to_string());

        let model = ModelFile {
            solution: SolutionInfo {
                name: "demo".into(),
                directory: "C:/work/demo".into(),
                configurations: vec![],
            },
            environment,
            projects: vec![ProjectEntry {
                name: "app".into(),
                full_path: "C:/work/demo/app/app.vcxproj".into(),
                native: true,
                descriptor_text: Some("<Project />".into()),
                configurations: vec![configuration.clone()],
                ..Default::default()
            }],
        };

        (SnapshotProvider::new(model, "."), configuration)
    }

    #[test]
    fn test_macro_evaluation_order() {
        let (provider, cfg) = provider();

        assert_eq!(
            provider.evaluate("app", &cfg, "$(OutDir)app.lib"),
            "C:/work/demo/x64/Debug/app.lib"
        );
        assert_eq!(
            provider.evaluate("app", &cfg, "$(BOOST_ROOT)/include"),
            "C:/libs/boost/include"
        );
        assert_eq!(
            provider.evaluate("app", &cfg, "$(ProjectDir)res"),
            "C:/work/demo/app/res"
        );
        assert_eq!(provider.evaluate("app", &cfg, "$(UNDEFINED)"), "");
    }

    #[test]
    fn test_enumeration_of_unknown_projects_is_empty() {
        let (provider, _) = provider();

        assert_eq!(provider.projects().len(), 1);
        assert_eq!(provider.project_configurations("app").len(), 1);
        assert!(provider.project_configurations("other").is_empty());
        assert!(provider.project_files("other").is_empty());
    }

    #[test]
    fn test_missing_descriptor_file_is_a_parse_error() {
        let (mut provider, _) = provider();
        provider.model.projects[0].descriptor_text = None;
        provider.model.projects[0].descriptor = Some("missing/app.vcxproj".into());

        assert!(matches!(
            provider.raw_descriptor("app"),
            Err(ConversionError::DescriptorParseError { .. })
        ));
    }
}
