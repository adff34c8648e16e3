//! Resolves the working set of build configurations for every project of the solution, and
//! validates that each project can be expressed as a single `CMake` target

use indexmap::{IndexMap, IndexSet};

use crate::converter::paths::{self, normalize_separators, paths_equal, PathTranslator};
use crate::domain::configuration::BuildConfiguration;
use crate::domain::errors::ConversionError;
use crate::domain::target::{Target, TargetFile, TargetOutputs};
use crate::provider::model::{
    ProjectConfiguration, ProjectInfo, SolutionConfiguration, SolutionInfo,
};
use crate::provider::ProjectModelProvider;
use crate::utils::constants::{ANY_PLATFORMS, DEFAULT_PLATFORM};
use crate::utils::logger::LogSink;

/// What the user asked to convert
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ConversionRequest {
    pub platform: String,
    /// The solution configurations to convert. `None` means every configuration available
    /// for the platform
    pub configurations: Option<Vec<String>>,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM)
    }
}

impl ConversionRequest {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            configurations: None,
        }
    }

    pub fn with_configurations<I, S>(mut self, configurations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.configurations = Some(configurations.into_iter().map(Into::into).collect());
        self
    }
}

/// A [`Target`] together with the project configuration that backs each one of its
/// configurations, keyed by the solution configuration name
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub target: Target,
    pub project_configurations: IndexMap<String, ProjectConfiguration>,
}

/// The project configuration that a project builds under each participating solution
/// configuration
type ProjectContexts = IndexMap<String, String>;

/// Verifies the solution against the request and resolves every native project that takes
/// part in the build, in the enumeration order of the provider
pub fn resolve_solution<P: ProjectModelProvider>(
    provider: &P,
    request: &ConversionRequest,
    sink: &mut dyn LogSink,
) -> Result<Vec<ResolvedTarget>, ConversionError> {
    let platform = request.platform.trim();
    if platform.is_empty() || ANY_PLATFORMS.iter().any(|p| p.eq_ignore_ascii_case(platform)) {
        return Err(ConversionError::UnsupportedPlatform(request.platform.clone()));
    }

    let solution = provider.solution();
    let participating = participating_configurations(solution, request, platform)?;
    log::debug!(
        "Solution configurations to convert: {:?}",
        participating.iter().map(|c| &c.name).collect::<Vec<_>>()
    );

    let contexts = gather_contexts(&participating, platform, sink)?;

    let mut resolved = Vec::new();
    for project in provider.projects() {
        if !project.native {
            sink.warn(&format!(
                "Project '{}' is not a Visual C++ project",
                project.name
            ));
            continue;
        }

        let Some(project_contexts) = contexts_of(&contexts, &solution.directory, project) else {
            log::debug!("Project '{}' is not built on {platform}", project.name);
            continue;
        };

        resolved.push(resolve_target(provider, project, project_contexts, platform)?);
    }

    if resolved.is_empty() {
        return Err(ConversionError::NoNativeProjects {
            platform: platform.to_string(),
        });
    }

    Ok(resolved)
}

/// The solution configurations of the platform that were requested, in request order
fn participating_configurations<'a>(
    solution: &'a SolutionInfo,
    request: &ConversionRequest,
    platform: &str,
) -> Result<Vec<&'a SolutionConfiguration>, ConversionError> {
    let available: Vec<&SolutionConfiguration> = solution
        .configurations
        .iter()
        .filter(|c| c.platform == platform)
        .collect();

    if available.is_empty() {
        return Err(ConversionError::NoMatchingConfigurations {
            platform: platform.to_string(),
        });
    }

    let requested: IndexSet<&str> = match request.configurations.as_ref() {
        Some(names) if !names.is_empty() => names.iter().map(|n| n.trim()).collect(),
        _ => available.iter().map(|c| c.name.as_str()).collect(),
    };

    requested
        .into_iter()
        .map(|name| {
            available
                .iter()
                .find(|c| c.name == name)
                .copied()
                .ok_or_else(|| ConversionError::ConfigurationNotFound {
                    target: solution.name.clone(),
                    configuration: name.to_string(),
                    platform: platform.to_string(),
                })
        })
        .collect()
}

/// For every participating solution configuration, the projects it builds together with the
/// project configuration each one is built with
fn gather_contexts(
    participating: &[&SolutionConfiguration],
    platform: &str,
    sink: &mut dyn LogSink,
) -> Result<IndexMap<String, ProjectContexts>, ConversionError> {
    let mut per_solution_config: IndexMap<String, ProjectContexts> = IndexMap::new();

    for sln_cfg in participating {
        let mut projects = ProjectContexts::new();

        for context in sln_cfg.contexts.iter().filter(|c| c.should_build) {
            if context.platform != platform {
                return Err(ConversionError::PlatformMismatch {
                    project: context.project.clone(),
                    platform: platform.to_string(),
                });
            }
            if context.configuration != sln_cfg.name {
                sink.warn(&format!(
                    "Configuration '{}' of '{}' does not match the solution configuration. \
                     It is replaced by '{}'",
                    context.configuration, context.project, sln_cfg.name
                ));
            }
            projects.insert(context.project.clone(), context.configuration.clone());
        }

        if projects.is_empty() {
            return Err(ConversionError::NoProjectsInConfiguration {
                configuration: sln_cfg.name.clone(),
            });
        }
        per_solution_config.insert(sln_cfg.name.clone(), projects);
    }

    let project_set = |projects: &ProjectContexts| {
        let mut names: Vec<String> = projects.keys().map(|k| k.to_lowercase()).collect();
        names.sort();
        names
    };
    let mut sets = per_solution_config.values().map(project_set);
    if let Some(first) = sets.next() {
        if sets.any(|set| set != first) {
            return Err(ConversionError::InconsistentProjectSets);
        }
    }

    Ok(per_solution_config)
}

/// Maps every participating solution configuration to the project configuration that
/// `project` is built with. `None` when the project is not built at all.
///
/// A context names its project either by name or by the path of the project file relative to
/// the solution directory
fn contexts_of(
    contexts: &IndexMap<String, ProjectContexts>,
    solution_dir: &str,
    project: &ProjectInfo,
) -> Option<IndexMap<String, String>> {
    let matches = |context_project: &str| {
        let context_project = normalize_separators(context_project);
        if context_project.contains('/') || context_project.to_lowercase().ends_with("proj") {
            paths_equal(&paths::join(solution_dir, &context_project), &project.full_path)
        } else {
            context_project.eq_ignore_ascii_case(&project.name)
        }
    };

    let mut mapping = IndexMap::new();
    for (sln_cfg, projects) in contexts {
        let (_, project_cfg) = projects.iter().find(|(name, _)| matches(name.as_str()))?;
        mapping.insert(sln_cfg.clone(), project_cfg.clone());
    }
    Some(mapping)
}

fn resolve_target<P: ProjectModelProvider>(
    provider: &P,
    project: &ProjectInfo,
    contexts: IndexMap<String, String>,
    platform: &str,
) -> Result<ResolvedTarget, ConversionError> {
    let name = project.name.as_str();
    let declared = provider.project_configurations(name);

    let mut project_configurations = IndexMap::new();
    for (sln_cfg, project_cfg) in &contexts {
        let cfg = declared
            .iter()
            .find(|c| &c.name == project_cfg && c.platform == platform)
            .ok_or_else(|| ConversionError::ConfigurationNotFound {
                target: name.to_string(),
                configuration: project_cfg.clone(),
                platform: platform.to_string(),
            })?;
        project_configurations.insert(sln_cfg.clone(), cfg.clone());
    }

    let Some(first) = project_configurations.values().next() else {
        return Err(ConversionError::NoMatchingConfigurations {
            platform: platform.to_string(),
        });
    };
    let (kind, use_of_mfc, subsystem) = (first.kind, first.use_of_mfc, first.subsystem);

    if project_configurations.values().any(|c| c.kind != kind) {
        return Err(ConversionError::InconsistentOutputKind {
            target: name.to_string(),
            kinds: project_configurations
                .iter()
                .map(|(sln_cfg, c)| (sln_cfg.clone(), c.kind))
                .collect(),
        });
    }
    if project_configurations
        .values()
        .any(|c| c.use_of_mfc != use_of_mfc)
    {
        return Err(ConversionError::InconsistentMfcUsage {
            target: name.to_string(),
            usages: project_configurations
                .iter()
                .map(|(sln_cfg, c)| (sln_cfg.clone(), c.use_of_mfc))
                .collect(),
        });
    }

    let directory = project.directory();
    let translator =
        PathTranslator::new(provider, name, &directory, &provider.solution().directory);

    let outputs = project_configurations
        .iter()
        .map(|(sln_cfg, cfg)| {
            let output = |text: &str| {
                let evaluated = translator.evaluate(cfg, text);
                if evaluated.trim().is_empty() {
                    String::new()
                } else {
                    translator.anchor(evaluated.trim())
                }
            };
            let outputs = TargetOutputs {
                primary: output(&cfg.primary_output),
                import_library: output(&cfg.import_library),
            };
            (sln_cfg.clone(), outputs)
        })
        .collect();

    let files = provider
        .project_files(name)
        .iter()
        .map(|file| {
            let relative_path = normalize_separators(file.relative_path.trim());
            let full_path = if file.full_path.trim().is_empty() {
                translator.anchor(&relative_path)
            } else {
                paths::normalize_path(&normalize_separators(file.full_path.trim()))
            };
            TargetFile {
                relative_path,
                full_path,
                kind: file.kind,
            }
        })
        .collect();

    let configurations = project_configurations
        .iter()
        .map(|(sln_cfg, cfg)| BuildConfiguration::new(sln_cfg, &cfg.name, &cfg.platform))
        .collect();

    log::debug!("Resolved the configurations of '{name}': {contexts:?}");

    Ok(ResolvedTarget {
        target: Target {
            name: name.to_string(),
            kind,
            use_of_mfc,
            subsystem,
            directory: translator.target_dir().to_string(),
            configurations,
            files,
            outputs,
        },
        project_configurations,
    })
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;

    use super::*;
    use crate::domain::configuration::{MfcUsage, SubSystem};
    use crate::domain::target::{FileKind, TargetKind};
    use crate::provider::snapshot::SnapshotProvider;
    use crate::utils::logger::CapturingSink;
    use crate::utils::test::demo_provider;

    fn resolve(provider: &SnapshotProvider, request: &ConversionRequest) -> Result<Vec<ResolvedTarget>> {
        Ok(resolve_solution(provider, request, &mut CapturingSink::default())?)
    }

    #[test]
    fn test_any_platform_is_rejected() -> Result<()> {
        let provider = demo_provider()?;
        let mut sink = CapturingSink::default();

        for platform in ["Any CPU", "anycpu", " "] {
            assert_eq!(
                resolve_solution(&provider, &ConversionRequest::new(platform), &mut sink)
                    .unwrap_err(),
                ConversionError::UnsupportedPlatform(platform.to_string())
            );
        }
        Ok(())
    }

    #[test]
    fn test_demo_targets() -> Result<()> {
        let provider = demo_provider()?;
        let mut sink = CapturingSink::default();
        let resolved = resolve_solution(&provider, &ConversionRequest::default(), &mut sink)?;

        assert_eq!(resolved.len(), 2);
        let core = &resolved[0].target;
        assert_eq!(core.name, "core");
        assert_eq!(core.kind, TargetKind::StaticLib);
        assert_eq!(core.directory, "C:/work/demo/core");
        assert_eq!(core.outputs["Debug"].primary, "C:/work/demo/x64/Debug/core.lib");
        assert_eq!(core.outputs["Release"].primary, "C:/work/demo/lib/Release/core.lib");
        assert_eq!(core.files[1].relative_path, "include/core.h");
        assert_eq!(core.files[1].full_path, "C:/work/demo/core/include/core.h");

        let app = &resolved[1].target;
        assert_eq!(app.subsystem, SubSystem::Windows);
        assert_eq!(app.use_of_mfc, MfcUsage::None);
        assert_eq!(
            app.configuration_names().collect::<Vec<_>>(),
            vec!["Debug", "Release"]
        );
        assert_eq!(app.outputs["Release"].primary, "C:/work/demo/x64/Release/app.exe");
        assert_eq!(
            app.files.iter().filter(|f| f.kind == FileKind::Source).count(),
            3
        );
        assert_eq!(app.files.last().map(|f| f.kind), Some(FileKind::Other));

        assert_eq!(
            sink.warnings(),
            vec!["Project 'installer' is not a Visual C++ project"]
        );
        Ok(())
    }

    #[test]
    fn test_requested_configurations_keep_the_request_order() -> Result<()> {
        let provider = demo_provider()?;
        let request = ConversionRequest::default().with_configurations(["Release", "Debug"]);
        let resolved = resolve(&provider, &request)?;

        assert_eq!(
            resolved[0].project_configurations.keys().collect::<Vec<_>>(),
            vec!["Release", "Debug"]
        );
        Ok(())
    }

    #[test]
    fn test_missing_configurations() -> Result<()> {
        let provider = demo_provider()?;
        let mut sink = CapturingSink::default();

        assert_eq!(
            resolve_solution(&provider, &ConversionRequest::new("ARM64"), &mut sink).unwrap_err(),
            ConversionError::NoMatchingConfigurations {
                platform: "ARM64".into()
            }
        );

        let mut model = provider.model().clone();
        model.projects[0]
            .configurations
            .retain(|c| c.name != "Release");
        let provider = SnapshotProvider::new(model, provider.base_dir());
        assert_eq!(
            resolve_solution(&provider, &ConversionRequest::default(), &mut sink).unwrap_err(),
            ConversionError::ConfigurationNotFound {
                target: "core".into(),
                configuration: "Release".into(),
                platform: "x64".into(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_mixed_use_of_mfc_is_rejected() -> Result<()> {
        let provider = demo_provider()?;
        let mut model = provider.model().clone();
        model.projects[1].configurations[1].use_of_mfc = MfcUsage::Dynamic;
        let provider = SnapshotProvider::new(model, provider.base_dir());

        let err = resolve(&provider, &ConversionRequest::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConversionError>(),
            Some(ConversionError::InconsistentMfcUsage { target, usages })
                if target == "app" && usages.len() == 2
        ));
        Ok(())
    }

    #[test]
    fn test_solution_level_mismatches() -> Result<()> {
        let provider = demo_provider()?;
        let mut sink = CapturingSink::default();

        let mut model = provider.model().clone();
        model.solution.configurations[1].contexts[0].platform = "Win32".into();
        let mismatch = SnapshotProvider::new(model, provider.base_dir());
        assert_eq!(
            resolve_solution(&mismatch, &ConversionRequest::default(), &mut sink).unwrap_err(),
            ConversionError::PlatformMismatch {
                project: "core".into(),
                platform: "x64".into(),
            }
        );

        let mut model = provider.model().clone();
        model.solution.configurations[1].contexts.remove(0);
        let uneven = SnapshotProvider::new(model, provider.base_dir());
        assert_eq!(
            resolve_solution(&uneven, &ConversionRequest::default(), &mut sink).unwrap_err(),
            ConversionError::InconsistentProjectSets
        );

        let mut model = provider.model().clone();
        model.solution.configurations[0]
            .contexts
            .iter_mut()
            .for_each(|c| c.should_build = false);
        let empty = SnapshotProvider::new(model, provider.base_dir());
        assert_eq!(
            resolve_solution(&empty, &ConversionRequest::default(), &mut sink).unwrap_err(),
            ConversionError::NoProjectsInConfiguration {
                configuration: "Debug".into()
            }
        );
        Ok(())
    }

    #[test]
    fn test_renamed_project_configuration_is_reported() -> Result<()> {
        let provider = demo_provider()?;
        let mut model = provider.model().clone();
        model.solution.configurations[1].contexts[0].configuration = "Debug".into();
        let provider = SnapshotProvider::new(model, provider.base_dir());
        let mut sink = CapturingSink::default();

        let resolved = resolve_solution(&provider, &ConversionRequest::default(), &mut sink)?;

        assert_eq!(resolved[0].project_configurations["Release"].name, "Debug");
        assert_eq!(resolved[0].target.configurations[1].project_configuration, "Debug");
        assert!(sink.warnings().contains(
            &"Configuration 'Debug' of 'core' does not match the solution configuration. \
              It is replaced by 'Release'"
        ));
        Ok(())
    }
}
