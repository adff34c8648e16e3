//! The settings of a target once every path has been translated and every file override has
//! been decided. This is what the descriptor emitter serializes

use indexmap::IndexSet;

use crate::converter::differ::{diff_target, Override, PchPlan};
use crate::converter::extractor::ExtractedTarget;
use crate::converter::linker::LinkReference;
use crate::converter::paths::PathTranslator;
use crate::converter::resolver::ResolvedTarget;
use crate::domain::target::Target;
use crate::provider::MacroEvaluation;

/// Values keyed by solution configuration, in configuration order
pub type PerConfig<T> = Vec<(String, T)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTarget {
    pub target: Target,
    pub include_directories: PerConfig<Vec<String>>,
    pub definitions: PerConfig<Vec<String>>,
    pub sdl_checks: PerConfig<Option<bool>>,
    pub library_directories: PerConfig<Vec<String>>,
    /// Filled once every target of the run has been normalized
    pub link_libraries: PerConfig<Vec<LinkReference>>,
    pub file_include_directories: Vec<Override<Vec<String>>>,
    pub file_definitions: Vec<Override<Vec<String>>>,
    pub file_sdl_checks: Vec<Override<bool>>,
    pub pch: PchPlan,
    /// Referenced by the translated paths, in discovery order
    pub environment_variables: IndexSet<String>,
}

/// Diffs the extracted settings of a target and translates its paths
pub fn normalize_target<E: MacroEvaluation + ?Sized>(
    evaluator: &E,
    source_root: &str,
    resolved: &ResolvedTarget,
    extracted: &ExtractedTarget,
) -> NormalizedTarget {
    let target = &resolved.target;
    let mut translator =
        PathTranslator::new(evaluator, &target.name, &target.directory, source_root);

    let diff = diff_target(&extracted.defaults, &extracted.files);

    let mut include_directories = Vec::new();
    let mut definitions = Vec::new();
    let mut sdl_checks = Vec::new();
    let mut library_directories = Vec::new();

    for (sln_cfg, settings) in &extracted.defaults {
        let Some(cfg) = resolved.project_configurations.get(sln_cfg) else {
            continue;
        };
        include_directories.push((
            sln_cfg.clone(),
            translator.translate_directories(cfg, &settings.include_directories),
        ));
        definitions.push((sln_cfg.clone(), settings.definitions.clone()));
        sdl_checks.push((sln_cfg.clone(), settings.sdl_check));
        library_directories.push((
            sln_cfg.clone(),
            translator.translate_directories(cfg, &settings.library_directories),
        ));
    }

    let file_include_directories = diff
        .include_directories
        .into_iter()
        .map(|file_override| Override {
            file: file_override.file,
            values: file_override
                .values
                .into_iter()
                .filter_map(|(sln_cfg, dirs)| {
                    let cfg = resolved.project_configurations.get(&sln_cfg)?;
                    let translated = translator.translate_directories(cfg, &dirs);
                    Some((sln_cfg, translated))
                })
                .collect(),
        })
        .collect();

    NormalizedTarget {
        target: target.clone(),
        include_directories,
        definitions,
        sdl_checks,
        library_directories,
        link_libraries: Vec::new(),
        file_include_directories,
        file_definitions: diff.definitions,
        file_sdl_checks: diff.sdl_checks,
        pch: diff.pch,
        environment_variables: translator.into_environment_variables(),
    }
}
