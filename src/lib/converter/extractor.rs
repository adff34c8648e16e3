//! Extracts the build settings of a target, per configuration and per source file.
//!
//! Two sources are merged: the values exposed by the project model provider, and the raw
//! project file for what the provider leaves out. The merge itself is a pure function of
//! both, see [`assemble_project_settings`] and [`assemble_file_settings`]

use indexmap::IndexSet;

use crate::converter::resolver::ResolvedTarget;
use crate::domain::configuration::{condition_for, MfcUsage};
use crate::domain::errors::ConversionError;
use crate::domain::settings::{FileSettings, PchSetting, Settings, SettingsPerConfig};
use crate::domain::target::FileKind;
use crate::provider::descriptor::RawDescriptor;
use crate::provider::model::{FileTool, ProjectConfiguration, ProjectFile};
use crate::provider::ProjectModelProvider;
use crate::utils::macros::is_inheritance_placeholder;

/// The raw, still unevaluated, settings of a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTarget {
    /// The target defaults, keyed by solution configuration name
    pub defaults: SettingsPerConfig,
    /// The settings of every C/C++ source file, sorted by relative path
    pub files: Vec<FileSettings>,
}

pub fn extract_target<P: ProjectModelProvider>(
    provider: &P,
    resolved: &ResolvedTarget,
) -> Result<ExtractedTarget, ConversionError> {
    let name = resolved.target.name.as_str();
    let raw = provider.raw_descriptor(name)?;

    let mut defaults = SettingsPerConfig::new();
    for (sln_cfg, cfg) in &resolved.project_configurations {
        let condition = condition_for(&cfg.name, &cfg.platform);
        let settings = assemble_project_settings(cfg, &condition, &raw);
        trace_settings(name, sln_cfg, &settings);
        defaults.insert(sln_cfg.clone(), settings);
    }

    let mut files: Vec<FileSettings> = provider
        .project_files(name)
        .iter()
        .filter(|file| file.kind == FileKind::Source)
        .map(|file| {
            let per_config = resolved
                .project_configurations
                .iter()
                .map(|(sln_cfg, cfg)| {
                    let condition = condition_for(&cfg.name, &cfg.platform);
                    let settings = assemble_file_settings(
                        &defaults[sln_cfg],
                        cfg,
                        file,
                        file.configurations.get(&cfg.name),
                        &condition,
                        &raw,
                    );
                    (sln_cfg.clone(), settings)
                })
                .collect();
            FileSettings {
                file: file.relative_path.trim().replace('\\', "/"),
                per_config,
            }
        })
        .collect();
    files.sort_by(|a, b| a.file.cmp(&b.file));

    Ok(ExtractedTarget { defaults, files })
}

/// Merges the target level settings of one configuration. The provider value wins when it is
/// present, the raw project file fills the gaps
pub fn assemble_project_settings(
    cfg: &ProjectConfiguration,
    condition: &str,
    raw: &RawDescriptor,
) -> Settings {
    let compiler = &cfg.compiler;
    let linker = &cfg.linker;

    let mut definitions = implied_definitions(cfg);
    definitions.extend(split_list(&compiler.preprocessor_definitions));

    Settings {
        include_directories: split_list(&compiler.additional_include_directories),
        definitions: dedup_keep_order(definitions),
        library_directories: split_list(&linker.additional_library_directories),
        link_libraries: split_tokens(&linker.additional_dependencies),
        pch: PchSetting::new(
            compiler.precompiled_header,
            compiler.precompiled_header_through.trim(),
            compiler.precompiled_header_output.trim(),
        ),
        sdl_check: compiler
            .sdl_check
            .or_else(|| raw.project_sdl_check(condition)),
    }
}

/// Merges the settings of a source file for one configuration. Every category the file does
/// not override is inherited from `defaults`, so a file without overrides equals them
pub fn assemble_file_settings(
    defaults: &Settings,
    cfg: &ProjectConfiguration,
    file: &ProjectFile,
    tool: Option<&FileTool>,
    condition: &str,
    raw: &RawDescriptor,
) -> Settings {
    let mut settings = defaults.clone();

    if let Some(tool) = tool {
        if let Some(dirs) = tool.additional_include_directories.as_ref() {
            settings.include_directories = split_list(dirs);
        }
        if let Some(defs) = tool.preprocessor_definitions.as_ref() {
            let mut definitions = implied_definitions(cfg);
            definitions.extend(split_list(defs));
            settings.definitions = dedup_keep_order(definitions);
        }
        if let Some(mode) = tool.precompiled_header {
            settings.pch.mode = mode;
        }
        if let Some(header) = tool.precompiled_header_through.as_ref() {
            settings.pch.header = header.trim().to_string();
        }
        if let Some(output) = tool.precompiled_header_output.as_ref() {
            settings.pch.pch_file = output.trim().to_string();
        }
    }

    if let Some(sdl) = tool
        .and_then(|t| t.sdl_check)
        .or_else(|| raw.file_sdl_check(&file.relative_path, condition))
    {
        settings.sdl_check = Some(sdl);
    }

    settings
}

/// The definitions that the IDE adds by itself, from the character set and the use of MFC
fn implied_definitions(cfg: &ProjectConfiguration) -> Vec<String> {
    let mut definitions = Vec::new();
    if let Some(def) = cfg.character_set.implied_definition() {
        definitions.push(def.to_string());
    }
    if matches!(cfg.use_of_mfc, MfcUsage::Static | MfcUsage::Dynamic) {
        definitions.push("_AFXDLL".to_string());
    }
    definitions
}

/// Splits `;` separated property values, discarding the empty entries and the inheritance
/// placeholders
pub fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(';'))
        .map(str::trim)
        .filter(|v| !v.is_empty() && !is_inheritance_placeholder(v))
        .map(str::to_string)
        .collect()
}

/// Splits library references, which the IDE separates by whitespace or by `;`
pub fn split_tokens(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(|c: char| c == ';' || c.is_whitespace()))
        .filter(|v| !v.is_empty() && !is_inheritance_placeholder(v))
        .map(str::to_string)
        .collect()
}

fn dedup_keep_order(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

fn trace_settings(target: &str, configuration: &str, settings: &Settings) {
    log::debug!("--- Settings of {target} ({configuration}) ---");
    log::debug!("Additional include directories: {:?}", settings.include_directories);
    log::debug!("Preprocessor definitions: {:?}", settings.definitions);
    log::debug!("Additional library directories: {:?}", settings.library_directories);
    log::debug!("Link libraries: {:?}", settings.link_libraries);
    log::debug!("Precompiled header: {:?}", settings.pch);
    log::debug!("SDL check: {:?}", settings.sdl_check);
}
