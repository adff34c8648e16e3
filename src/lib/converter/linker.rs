//! Turns the literal library references of a target into dependencies on the sibling targets
//! that produce those libraries

use crate::converter::paths::{is_rooted, join, normalize_path, paths_equal, PathTranslator};
use crate::converter::resolver::ResolvedTarget;
use crate::domain::settings::SettingsPerConfig;
use crate::domain::target::Target;
use crate::provider::model::ProjectConfiguration;
use crate::provider::MacroEvaluation;

/// What a library reference ends up being on the generated descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkReference {
    /// A target of the same run, referenced by name
    Target(String),
    /// The macro translated reference, as it was written
    Literal(String),
}

impl LinkReference {
    pub fn as_str(&self) -> &str {
        match self {
            LinkReference::Target(name) => name,
            LinkReference::Literal(path) => path,
        }
    }
}

/// A library reference together with the absolute paths it may stand for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub literal: String,
    pub paths: Vec<String>,
}

/// Every target of the run, in enumeration order
pub struct TargetGraph<'a> {
    targets: Vec<&'a Target>,
}

impl<'a> TargetGraph<'a> {
    pub fn new(targets: impl IntoIterator<Item = &'a Target>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// The first target other than `consumer` whose linkable output for `configuration`
    /// is `path`
    pub fn producer_of(&self, path: &str, configuration: &str, consumer: &str) -> Option<&Target> {
        self.targets
            .iter()
            .copied()
            .filter(|t| t.name != consumer)
            .find(|t| {
                t.linkable_output(configuration)
                    .is_some_and(|output| paths_equal(output, path))
            })
    }

    /// Resolves a candidate, falling back to its literal when no target produces it
    pub fn resolve(
        &self,
        candidate: &LinkCandidate,
        configuration: &str,
        consumer: &str,
    ) -> LinkReference {
        candidate
            .paths
            .iter()
            .find_map(|path| self.producer_of(path, configuration, consumer))
            .map(|target| LinkReference::Target(target.name.clone()))
            .unwrap_or_else(|| LinkReference::Literal(candidate.literal.clone()))
    }
}

/// Builds the candidate paths of a link token. Rooted references stand for themselves, the
/// relative ones are searched on every additional library directory. `None` when the token
/// evaluates to nothing
pub fn link_candidate<E: MacroEvaluation + ?Sized>(
    translator: &PathTranslator<'_, E>,
    cfg: &ProjectConfiguration,
    token: &str,
    library_directories: &[String],
) -> Option<LinkCandidate> {
    let literal = translator.translate_path(cfg, token);
    if literal.is_empty() {
        return None;
    }

    let paths = if is_rooted(&literal) {
        vec![normalize_path(&literal)]
    } else {
        library_directories
            .iter()
            .map(|dir| translator.evaluate(cfg, dir))
            .filter(|dir| !dir.trim().is_empty())
            .map(|dir| translator.anchor(&join(dir.trim(), &literal)))
            .collect()
    };

    Some(LinkCandidate { literal, paths })
}

/// The link references of `resolved`, per configuration
pub fn resolve_link_libraries<E: MacroEvaluation + ?Sized>(
    evaluator: &E,
    source_root: &str,
    graph: &TargetGraph<'_>,
    resolved: &ResolvedTarget,
    defaults: &SettingsPerConfig,
) -> Vec<(String, Vec<LinkReference>)> {
    let target = &resolved.target;
    let translator = PathTranslator::new(evaluator, &target.name, &target.directory, source_root);

    resolved
        .project_configurations
        .iter()
        .map(|(sln_cfg, cfg)| {
            let references = defaults
                .get(sln_cfg)
                .map(|settings| {
                    settings
                        .link_libraries
                        .iter()
                        .filter_map(|token| {
                            link_candidate(&translator, cfg, token, &settings.library_directories)
                        })
                        .map(|candidate| graph.resolve(&candidate, sln_cfg, &target.name))
                        .collect()
                })
                .unwrap_or_default();
            (sln_cfg.clone(), references)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::domain::configuration::{MfcUsage, SubSystem};
    use crate::domain::target::{TargetKind, TargetOutputs};
    use crate::utils::macros::replace_macros;

    struct NoMacros;

    impl MacroEvaluation for NoMacros {
        fn evaluate(&self, _: &str, cfg: &ProjectConfiguration, text: &str) -> String {
            replace_macros(text, |name| match name {
                "Configuration" => cfg.name.clone(),
                _ => String::new(),
            })
        }
    }

    fn target(name: &str, kind: TargetKind, outputs: &[(&str, &str, &str)]) -> Target {
        Target {
            name: name.to_string(),
            kind,
            use_of_mfc: MfcUsage::None,
            subsystem: SubSystem::NotSet,
            directory: format!("C:/sln/{name}"),
            configurations: vec![],
            files: vec![],
            outputs: outputs
                .iter()
                .map(|(cfg, primary, import)| {
                    (
                        cfg.to_string(),
                        TargetOutputs {
                            primary: primary.to_string(),
                            import_library: import.to_string(),
                        },
                    )
                })
                .collect::<IndexMap<_, _>>(),
        }
    }

    fn candidate(paths: &[&str]) -> LinkCandidate {
        LinkCandidate {
            literal: "core.lib".into(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_static_library_matches_by_configuration() {
        let core = target(
            "core",
            TargetKind::StaticLib,
            &[
                ("Debug", "C:/sln/x64/Debug/core_d.lib", ""),
                ("Release", "C:/sln/x64/Release/core.lib", ""),
            ],
        );
        let graph = TargetGraph::new([&core]);

        assert_eq!(
            graph.resolve(&candidate(&["c:\\sln\\x64\\release\\core.lib"]), "Release", "app"),
            LinkReference::Target("core".into())
        );
        assert_eq!(
            graph.resolve(&candidate(&["C:/sln/x64/Release/core.lib"]), "Debug", "app"),
            LinkReference::Literal("core.lib".into())
        );
    }

    #[test]
    fn test_dynamic_library_matches_on_the_import_library() {
        let dll = target(
            "plugin",
            TargetKind::DyLib,
            &[("Debug", "C:/sln/bin/plugin.dll", "C:/sln/lib/plugin.lib")],
        );
        let graph = TargetGraph::new([&dll]);

        assert_eq!(
            graph.resolve(&candidate(&["C:/sln/bin/plugin.dll"]), "Debug", "app"),
            LinkReference::Literal("core.lib".into())
        );
        assert_eq!(
            graph.resolve(&candidate(&["C:/sln/lib/plugin.lib"]), "Debug", "app"),
            LinkReference::Target("plugin".into())
        );
    }

    #[test]
    fn test_first_match_in_enumeration_order_wins_and_self_is_skipped() {
        let outputs = [("Debug", "C:/sln/out/core.lib", "")];
        let first = target("first", TargetKind::StaticLib, &outputs);
        let second = target("second", TargetKind::StaticLib, &outputs);
        let graph = TargetGraph::new([&first, &second]);

        assert_eq!(
            graph.resolve(&candidate(&["C:/sln/out/core.lib"]), "Debug", "app"),
            LinkReference::Target("first".into())
        );
        assert_eq!(
            graph.resolve(&candidate(&["C:/sln/out/core.lib"]), "Debug", "first"),
            LinkReference::Target("second".into())
        );
    }

    #[test]
    fn test_relative_tokens_are_searched_on_the_library_directories() {
        let evaluator = NoMacros;
        let translator = PathTranslator::new(&evaluator, "app", "C:/sln/app", "C:/sln");
        let cfg = ProjectConfiguration {
            name: "Debug".into(),
            ..Default::default()
        };
        let dirs = vec![
            "C:/sln/x64/$(Configuration)".to_string(),
            "$(UNDEFINED)".to_string(),
            "../lib".to_string(),
        ];

        let candidate = link_candidate(&translator, &cfg, "core.lib", &dirs).unwrap();
        assert_eq!(candidate.literal, "core.lib");
        assert_eq!(
            candidate.paths,
            vec!["C:/sln/x64/Debug/core.lib", "C:/sln/lib/core.lib"]
        );

        let rooted = link_candidate(&translator, &cfg, r"C:\sln\x64\Debug\..\Debug\core.lib", &dirs)
            .unwrap();
        assert_eq!(rooted.paths, vec!["C:/sln/x64/Debug/core.lib"]);

        assert!(link_candidate(&translator, &cfg, "$(UNDEFINED)", &dirs).is_none());
        assert!(link_candidate(&translator, &cfg, "core.lib", &[]).unwrap().paths.is_empty());
    }
}
