//! Decides which source files need their own settings, and for which configurations

use crate::domain::settings::{
    definitions_equivalent, FileSettings, PchMode, Settings, SettingsPerConfig,
};

/// The values a file must declare by itself, one per configuration where they differ from
/// the target default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override<T> {
    pub file: String,
    pub values: Vec<(String, T)>,
}

/// How the precompiled header options of a target are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PchPlan {
    /// One target wide option, plus the files that deviate from it
    TargetWide {
        defaults: Vec<(String, String)>,
        overrides: Vec<Override<String>>,
    },
    /// No target wide option. Every source file declares its own, grouped by identical
    /// options
    PerFile { groups: Vec<PchGroup> },
}

/// Files that share the same precompiled header options on every configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PchGroup {
    pub files: Vec<String>,
    /// The option string of every configuration, empty ones included
    pub flags: Vec<(String, String)>,
}

/// Every file level override of a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDiff {
    pub include_directories: Vec<Override<Vec<String>>>,
    pub definitions: Vec<Override<Vec<String>>>,
    pub sdl_checks: Vec<Override<bool>>,
    pub pch: PchPlan,
}

pub fn diff_target(defaults: &SettingsPerConfig, files: &[FileSettings]) -> TargetDiff {
    let mut include_directories = Vec::new();
    let mut definitions = Vec::new();
    let mut sdl_checks = Vec::new();

    for file in files.iter().filter(|f| !f.matches_defaults(defaults)) {
        push_override(
            &mut include_directories,
            file,
            defaults,
            |f, d| f.include_directories != d.include_directories,
            |f| Some(f.include_directories.clone()),
        );
        push_override(
            &mut definitions,
            file,
            defaults,
            |f, d| !definitions_equivalent(&f.definitions, &d.definitions),
            |f| Some(f.definitions.clone()),
        );
        push_override(
            &mut sdl_checks,
            file,
            defaults,
            |f, d| f.sdl_check != d.sdl_check,
            |f| f.sdl_check,
        );
    }

    TargetDiff {
        include_directories,
        definitions,
        sdl_checks,
        pch: plan_pch(defaults, files),
    }
}

/// Adds an override for `file` covering exactly the configurations where `differs` holds
fn push_override<T>(
    overrides: &mut Vec<Override<T>>,
    file: &FileSettings,
    defaults: &SettingsPerConfig,
    differs: impl Fn(&Settings, &Settings) -> bool,
    value: impl Fn(&Settings) -> Option<T>,
) {
    let values: Vec<(String, T)> = defaults
        .iter()
        .filter_map(|(cfg, target_settings)| {
            let file_settings = file.per_config.get(cfg)?;
            if differs(file_settings, target_settings) {
                value(file_settings).map(|v| (cfg.clone(), v))
            } else {
                None
            }
        })
        .collect();

    if !values.is_empty() {
        overrides.push(Override {
            file: file.file.clone(),
            values,
        });
    }
}

/// When the target uses a precompiled header and some file opts out of it, a target wide
/// `/Yu` would break that file. In that case the option moves to the files
pub fn is_mixed_pch(defaults: &SettingsPerConfig, files: &[FileSettings]) -> bool {
    defaults.values().any(|s| s.pch.mode == PchMode::Use)
        && files
            .iter()
            .any(|f| f.per_config.values().any(|s| s.pch.mode == PchMode::None))
}

fn plan_pch(defaults: &SettingsPerConfig, files: &[FileSettings]) -> PchPlan {
    if is_mixed_pch(defaults, files) {
        let mut groups: Vec<PchGroup> = Vec::new();
        for file in files {
            let flags: Vec<(String, String)> = defaults
                .keys()
                .map(|cfg| {
                    let flags = file
                        .per_config
                        .get(cfg)
                        .map(|s| s.pch.flags())
                        .unwrap_or_default();
                    (cfg.clone(), flags)
                })
                .collect();

            match groups.iter_mut().find(|g| g.flags == flags) {
                Some(group) => group.files.push(file.file.clone()),
                None => groups.push(PchGroup {
                    files: vec![file.file.clone()],
                    flags,
                }),
            }
        }
        groups.retain(|g| g.flags.iter().any(|(_, flags)| !flags.is_empty()));

        return PchPlan::PerFile { groups };
    }

    let mut overrides = Vec::new();
    for file in files.iter().filter(|f| !f.matches_defaults(defaults)) {
        push_override(
            &mut overrides,
            file,
            defaults,
            |f, d| f.pch != d.pch,
            |f| Some(f.pch.flags()),
        );
    }

    PchPlan::TargetWide {
        defaults: defaults
            .iter()
            .map(|(cfg, s)| (cfg.clone(), s.pch.flags()))
            .collect(),
        overrides,
    }
}
