//! Serializes the normalized targets into `CMakeLists.txt` descriptors

use crate::converter::differ::{Override, PchPlan};
use crate::converter::expressions::{config_expression, config_expressions};
use crate::converter::normalized::NormalizedTarget;
use crate::converter::paths::quote_if_needed;
use crate::domain::configuration::SubSystem;
use crate::domain::target::{FileKind, TargetKind};
use crate::utils::constants::CMAKE_REQUIRED_VERSION;

/// Separator of the expressions that share a single quoted `COMPILE_FLAGS` string. The
/// trailing backslash continues the quoted string on the next line
const FLAGS_SEPARATOR: &str = " \\\n   ";

/// Renders the whole descriptor of a target
pub fn emit_target(normalized: &NormalizedTarget) -> String {
    let target = &normalized.target;
    let name = target.name.as_str();

    let mut header = String::new();
    header.push_str(&format!(
        "cmake_minimum_required(VERSION {CMAKE_REQUIRED_VERSION})\n\n"
    ));
    header.push_str(&format!("project({name})\n\n"));
    header.push_str(&environment_validation(normalized));

    let mut body = String::new();
    body.push_str(&format!(
        "set(CMAKE_CONFIGURATION_TYPES \"{}\"\n",
        target.configuration_names().collect::<Vec<_>>().join(";")
    ));
    body.push_str("    CACHE STRING \"Configuration types\" FORCE)\n\n");

    if let Some(flag) = target.use_of_mfc.cmake_flag() {
        body.push_str("# Use of MFC\n");
        body.push_str(&format!("set(CMAKE_MFC_FLAG {flag})\n\n"));
    }

    body.push_str(&declaration(normalized));
    body.push('\n');

    let sections = [
        ("Output file name", output_names(normalized)),
        ("Additional include directories", include_directories(normalized)),
        ("Preprocessor definitions", definitions(normalized)),
        ("SDL check", sdl_checks(normalized)),
        ("Precompiled header files", precompiled_headers(normalized)),
        ("Additional library directories", library_directories(normalized)),
        ("Link libraries", link_libraries(normalized)),
    ];
    for (title, code) in sections {
        if !code.is_empty() {
            body.push_str(&format!("# {title}\n{code}\n"));
        }
    }

    format!("{header}{}\n", body.trim_end())
}

/// Renders the descriptor at the root of the project tree, which pulls every target in
pub fn emit_solution(name: &str, directories: &[String]) -> String {
    let mut out = format!("cmake_minimum_required(VERSION {CMAKE_REQUIRED_VERSION})\n\n");
    out.push_str(&format!("project({name})\n\n"));
    for dir in directories {
        out.push_str(&format!("add_subdirectory({})\n", quote_if_needed(dir)));
    }
    out
}

fn environment_validation(normalized: &NormalizedTarget) -> String {
    if normalized.environment_variables.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = normalized
        .environment_variables
        .iter()
        .map(String::as_str)
        .collect();

    let mut out = format!("foreach (EnvVar IN ITEMS {})\n", names.join(" "));
    out.push_str("  if (\"$ENV{${EnvVar}}\" STREQUAL \"\")\n");
    out.push_str("    message(WARNING \"Environment variable '${EnvVar}' is not defined.\")\n");
    out.push_str("  endif ()\n");
    out.push_str("endforeach ()\n\n");
    out
}

fn declaration(normalized: &NormalizedTarget) -> String {
    let target = &normalized.target;
    let mut out = match target.kind {
        TargetKind::Executable => {
            let mut decl = format!("add_executable({}\n", target.name);
            if target.subsystem == SubSystem::Windows {
                decl.push_str("  WIN32\n");
            }
            decl
        }
        TargetKind::DyLib => format!("add_library({} SHARED\n", target.name),
        TargetKind::StaticLib => format!("add_library({} STATIC\n", target.name),
    };

    let mut files: Vec<&str> = target
        .files
        .iter()
        .filter(|f| f.kind != FileKind::Other)
        .map(|f| f.relative_path.as_str())
        .collect();
    files.sort_unstable();
    files.dedup();

    for file in files {
        out.push_str(&format!("  {}\n", quote_if_needed(file)));
    }
    out.push_str(")\n");
    out
}

/// File name of the primary output, without its extension
fn output_stem(path: &str) -> &str {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

fn output_names(normalized: &NormalizedTarget) -> String {
    let target = &normalized.target;
    let stems: Vec<(&str, &str)> = target
        .configuration_names()
        .filter_map(|cfg| {
            let outputs = target.outputs.get(cfg)?;
            let stem = output_stem(&outputs.primary);
            (!stem.is_empty()).then_some((cfg, stem))
        })
        .collect();

    if stems.iter().all(|(_, stem)| *stem == target.name) {
        return String::new();
    }

    let mut out = format!("set_target_properties({}\n  PROPERTIES\n", target.name);
    for (cfg, stem) in stems {
        out.push_str(&format!(
            "  OUTPUT_NAME_{} {}\n",
            cfg.to_uppercase(),
            quote_if_needed(stem)
        ));
    }
    out.push_str(")\n");
    out
}

fn include_directories(normalized: &NormalizedTarget) -> String {
    let name = &normalized.target.name;
    let mut out = String::new();

    if normalized
        .include_directories
        .iter()
        .any(|(_, dirs)| !dirs.is_empty())
    {
        let per_config = normalized.include_directories.iter().map(|(cfg, dirs)| {
            let value = if dirs.is_empty() {
                String::new()
            } else {
                format!("\n    {}", dirs.join(";\n    "))
            };
            (cfg, value)
        });
        out.push_str(&format!(
            "set_property(TARGET {name}\n  APPEND PROPERTY INCLUDE_DIRECTORIES\n  {}\n)\n",
            config_expressions(per_config, "\n  ")
        ));
    }

    for file_override in &normalized.file_include_directories {
        out.push_str(&source_list_property(
            file_override,
            "INCLUDE_DIRECTORIES",
            |dirs| unquote_all(dirs).join(";"),
        ));
    }
    out
}

fn definitions(normalized: &NormalizedTarget) -> String {
    let name = &normalized.target.name;
    let mut out = String::new();

    let expressions = quoted_expressions(
        normalized
            .definitions
            .iter()
            .map(|(cfg, defs)| (cfg, escape_quotes(&defs.join(";")))),
    );
    if !expressions.is_empty() {
        out.push_str(&format!(
            "target_compile_definitions({name} PRIVATE\n{expressions})\n"
        ));
    }

    for file_override in &normalized.file_definitions {
        out.push_str(&source_list_property(
            file_override,
            "COMPILE_DEFINITIONS",
            |defs| defs.join(";"),
        ));
    }
    out
}

fn sdl_flag(enabled: bool) -> &'static str {
    if enabled {
        "/sdl"
    } else {
        "/sdl-"
    }
}

fn sdl_checks(normalized: &NormalizedTarget) -> String {
    let name = &normalized.target.name;
    let mut out = String::new();

    let expressions = quoted_expressions(
        normalized
            .sdl_checks
            .iter()
            .filter_map(|(cfg, check)| check.map(|enabled| (cfg, sdl_flag(enabled).to_string()))),
    );
    if !expressions.is_empty() {
        out.push_str(&format!(
            "target_compile_options({name} PRIVATE\n{expressions})\n"
        ));
    }

    for file_override in &normalized.file_sdl_checks {
        let flags = file_override
            .values
            .iter()
            .map(|(cfg, enabled)| (cfg, sdl_flag(*enabled)));
        out.push_str(&source_compile_flags(&[file_override.file.as_str()], flags));
    }
    out
}

fn precompiled_headers(normalized: &NormalizedTarget) -> String {
    let name = &normalized.target.name;
    let mut out = String::new();

    match &normalized.pch {
        PchPlan::TargetWide {
            defaults,
            overrides,
        } => {
            let expressions = quoted_expressions(
                defaults
                    .iter()
                    .map(|(cfg, flags)| (cfg, escape_quotes(flags))),
            );
            if !expressions.is_empty() {
                out.push_str(&format!(
                    "target_compile_options({name} PRIVATE\n{expressions})\n"
                ));
            }
            for file_override in overrides {
                out.push_str(&source_compile_flags(
                    &[file_override.file.as_str()],
                    file_override.values.iter().map(|(cfg, flags)| (cfg, flags)),
                ));
            }
        }
        PchPlan::PerFile { groups } => {
            for group in groups {
                let files: Vec<&str> = group.files.iter().map(String::as_str).collect();
                out.push_str(&source_compile_flags(
                    &files,
                    group.flags.iter().map(|(cfg, flags)| (cfg, flags)),
                ));
            }
        }
    }

    if out.is_empty() {
        return out;
    }
    format!("if (MSVC)\n{}endif ()\n", indent(&out))
}

fn library_directories(normalized: &NormalizedTarget) -> String {
    let msvc = library_directories_with(normalized, "/LIBPATH:");
    if msvc.is_empty() {
        return msvc;
    }
    let others = library_directories_with(normalized, "-L");
    format!(
        "if (MSVC)\n{}else ()\n{}endif ()\n",
        indent(&msvc),
        indent(&others)
    )
}

fn library_directories_with(normalized: &NormalizedTarget, option: &str) -> String {
    if normalized
        .library_directories
        .iter()
        .all(|(_, dirs)| dirs.is_empty())
    {
        return String::new();
    }

    let mut out = format!("target_link_options({} PRIVATE\n", normalized.target.name);
    for (cfg, dirs) in &normalized.library_directories {
        if dirs.is_empty() {
            continue;
        }
        let options: Vec<String> = dirs.iter().map(|dir| format!("{option}{dir}")).collect();
        out.push_str(&format!(
            "  $<$<CONFIG:{cfg}>:\n    {}>\n",
            options.join("\n    ")
        ));
    }
    out.push_str(")\n");
    out
}

fn link_libraries(normalized: &NormalizedTarget) -> String {
    let expressions = quoted_expressions(normalized.link_libraries.iter().map(|(cfg, refs)| {
        let refs: Vec<&str> = refs.iter().map(|r| r.as_str()).collect();
        (cfg, escape_quotes(&refs.join(";")))
    }));
    if expressions.is_empty() {
        return expressions;
    }
    format!(
        "set_property(TARGET {}\n  APPEND PROPERTY LINK_LIBRARIES\n{expressions})\n",
        normalized.target.name
    )
}

/// One quoted expression per line, for every configuration with a value
fn quoted_expressions<C, V>(pairs: impl Iterator<Item = (C, V)>) -> String
where
    C: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .filter(|(_, value)| !value.as_ref().is_empty())
        .map(|(cfg, value)| format!("  \"{}\"\n", config_expression(cfg.as_ref(), value.as_ref())))
        .collect()
}

/// A list valued source property, ie: `COMPILE_DEFINITIONS`
fn source_list_property(
    file_override: &Override<Vec<String>>,
    property: &str,
    render: impl Fn(&[String]) -> String,
) -> String {
    let expressions = quoted_expressions(
        file_override
            .values
            .iter()
            .map(|(cfg, values)| (cfg, escape_quotes(&render(values)))),
    );
    if expressions.is_empty() {
        return expressions;
    }
    format!(
        "set_property(SOURCE {}\n  APPEND PROPERTY {property}\n{expressions})\n",
        quote_if_needed(&file_override.file)
    )
}

/// Appends configuration scoped flags to the `COMPILE_FLAGS` string of some sources. Empty
/// when no configuration has a flag
fn source_compile_flags<C, V>(files: &[&str], flags: impl Iterator<Item = (C, V)>) -> String
where
    C: AsRef<str>,
    V: AsRef<str>,
{
    let pairs: Vec<(String, String)> = flags
        .map(|(cfg, value)| (cfg.as_ref().to_string(), escape_quotes(value.as_ref())))
        .collect();
    let expressions = config_expressions(pairs, FLAGS_SEPARATOR);
    if expressions.is_empty() {
        return expressions;
    }
    let files: Vec<String> = files.iter().map(|f| quote_if_needed(f)).collect();
    format!(
        "set_property(SOURCE {}\n  APPEND_STRING PROPERTY COMPILE_FLAGS\n  \" {expressions}\")\n",
        files.join(" ")
    )
}

/// Paths already quoted because of their whitespace go inside a single quoted list
fn unquote_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim_matches('"').to_string())
        .collect()
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

fn indent(text: &str) -> String {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| format!("  {line}\n"))
        .collect()
}
