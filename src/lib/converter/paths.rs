//! Rewrites the paths found on the project properties into portable forms.
//!
//! The paths below the project tree become relative to one of the `CMake` source directory
//! variables. Anything else keeps its original macros, where the ones that are not defined by
//! the IDE itself turn into environment variable references

use indexmap::IndexSet;

use crate::provider::model::ProjectConfiguration;
use crate::provider::MacroEvaluation;
use crate::utils::constants::{cmake_dirs, IDE_MACROS};
use crate::utils::macros::{macro_names, replace_macros};

/// Translates the paths of a single target, collecting along the way the environment
/// variables that the generated descriptor will depend on
pub struct PathTranslator<'a, E: MacroEvaluation + ?Sized> {
    evaluator: &'a E,
    project: &'a str,
    /// The directory where the descriptor of the target is written
    target_dir: String,
    /// The root of the whole project tree
    source_root: String,
    environment_variables: IndexSet<String>,
}

impl<'a, E: MacroEvaluation + ?Sized> PathTranslator<'a, E> {
    pub fn new(evaluator: &'a E, project: &'a str, target_dir: &str, source_root: &str) -> Self {
        Self {
            evaluator,
            project,
            target_dir: normalize_path(&normalize_separators(target_dir)),
            source_root: normalize_path(&normalize_separators(source_root)),
            environment_variables: IndexSet::new(),
        }
    }

    pub fn target_dir(&self) -> &str {
        &self.target_dir
    }

    /// The environment variables referenced by the translated paths, in discovery order
    pub fn into_environment_variables(self) -> IndexSet<String> {
        self.environment_variables
    }

    pub fn evaluate(&self, configuration: &ProjectConfiguration, text: &str) -> String {
        self.evaluator.evaluate(self.project, configuration, text)
    }

    /// Evaluates `text`, normalizing the result only when it is rooted. Relative paths are
    /// left relative. Empty when the text evaluates to nothing
    pub fn translate_path(&self, configuration: &ProjectConfiguration, text: &str) -> String {
        let evaluated = normalize_separators(self.evaluate(configuration, text).trim());
        if is_rooted(&evaluated) {
            normalize_path(&evaluated)
        } else {
            evaluated
        }
    }

    /// Makes an evaluated path absolute, resolving the relative ones against the target
    /// directory, the same way `MSBuild` does
    pub fn anchor(&self, evaluated: &str) -> String {
        let evaluated = normalize_separators(evaluated);
        normalize_path(&join(&self.target_dir, &evaluated))
    }

    /// Translates a list of directories, dropping the ones that evaluate to nothing
    pub fn translate_directories(
        &mut self,
        configuration: &ProjectConfiguration,
        directories: &[String],
    ) -> Vec<String> {
        directories
            .iter()
            .filter_map(|dir| self.translate_directory(configuration, dir))
            .collect()
    }

    /// Translates a single directory into its portable form, or `None` when it evaluates to
    /// the empty string
    pub fn translate_directory(
        &mut self,
        configuration: &ProjectConfiguration,
        original: &str,
    ) -> Option<String> {
        let evaluated = self.evaluate(configuration, original);
        let evaluated = evaluated.trim();
        if evaluated.is_empty() {
            return None;
        }

        // A relative path only keeps its meaning once anchored if nothing on it evaluated away
        let classified = if is_rooted(&normalize_separators(evaluated))
            || !self.has_unresolved_macros(configuration, original)
        {
            self.below_source_dirs(&self.anchor(evaluated))
        } else {
            None
        };

        let translated = classified.unwrap_or_else(|| {
            let expanded = self.expand_ide_macros(configuration, original.trim());
            self.to_environment_references(&normalize_separators(&expanded))
        });

        Some(quote_if_needed(translated.trim_end_matches('/')))
    }

    /// `absolute` relative to the target directory or to the root of the project tree
    fn below_source_dirs(&self, absolute: &str) -> Option<String> {
        if let Some(rel) = relative_to(absolute, &self.target_dir) {
            Some(prefixed(cmake_dirs::CURRENT_SOURCE_DIR, &rel))
        } else {
            relative_to(absolute, &self.source_root)
                .map(|rel| prefixed(cmake_dirs::SOURCE_DIR, &rel))
        }
    }

    /// Whether some `$(Name)` of `text` evaluates to nothing on this configuration
    fn has_unresolved_macros(&self, configuration: &ProjectConfiguration, text: &str) -> bool {
        macro_names(text).any(|name| {
            self.evaluate(configuration, &format!("$({name})"))
                .trim()
                .is_empty()
        })
    }

    /// Evaluates only the macros that the IDE defines by itself, leaving the rest untouched
    fn expand_ide_macros(&self, configuration: &ProjectConfiguration, text: &str) -> String {
        replace_macros(text, |name| {
            if IDE_MACROS.iter().any(|m| m.eq_ignore_ascii_case(name)) {
                normalize_separators(&self.evaluate(configuration, &format!("$({name})")))
            } else {
                format!("$({name})")
            }
        })
    }

    /// Turns the remaining `$(Name)` into `$ENV{Name}`
    fn to_environment_references(&mut self, text: &str) -> String {
        replace_macros(text, |name| {
            self.environment_variables.insert(name.to_string());
            format!("$ENV{{{name}}}")
        })
    }
}

fn prefixed(dir_variable: &str, rel: &str) -> String {
    if rel.is_empty() {
        dir_variable.to_string()
    } else {
        format!("{dir_variable}/{rel}")
    }
}

pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Whether the path starts at a root: a drive letter, a leading separator or a share
pub fn is_rooted(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with('\\')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Splits a normalized path into its root (`C:`, `/`, `//` or nothing) and the rest
fn split_root(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        (&path[..2], path[2..].trim_start_matches('/'))
    } else if path.starts_with("//") {
        ("//", path.trim_start_matches('/'))
    } else if path.starts_with('/') {
        ("/", path.trim_start_matches('/'))
    } else {
        ("", path)
    }
}

/// Lexically collapses the `.` and `..` components of a path with `/` separators. Leading
/// `..` components of a relative path are kept
pub fn normalize_path(path: &str) -> String {
    let (root, rest) = split_root(path);
    let mut components: Vec<&str> = Vec::new();

    for component in rest.split('/') {
        match component {
            "" | "." => {}
            ".." => match components.last() {
                Some(&last) if last != ".." => {
                    components.pop();
                }
                _ if root.is_empty() => components.push(".."),
                _ => {}
            },
            _ => components.push(component),
        }
    }

    let joined = components.join("/");
    match root {
        "" => joined,
        "/" | "//" => format!("{root}{joined}"),
        drive => format!("{drive}/{joined}"),
    }
}

/// `rel` relative to `base`, unless it is already rooted
pub fn join(base: &str, rel: &str) -> String {
    if is_rooted(rel) || base.is_empty() {
        rel.to_string()
    } else if rel.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), rel)
    }
}

/// The part of `path` below `base`, when `base` is a component-wise prefix of `path`.
/// Both are expected to be normalized. Comparison is case insensitive
pub fn relative_to(path: &str, base: &str) -> Option<String> {
    if base.is_empty() {
        return None;
    }
    let path_components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
    let base_components: Vec<&str> = base.split('/').filter(|c| !c.is_empty()).collect();

    if path_components.len() < base_components.len()
        || is_rooted(path) != is_rooted(base)
        || path.starts_with('/') != base.starts_with('/')
    {
        return None;
    }

    let is_prefix = base_components
        .iter()
        .zip(path_components.iter())
        .all(|(b, p)| eq_ignore_case(b, p));

    is_prefix.then(|| path_components[base_components.len()..].join("/"))
}

/// Case insensitive equality of two paths, after normalizing both
pub fn paths_equal(lhs: &str, rhs: &str) -> bool {
    eq_ignore_case(
        &normalize_path(&normalize_separators(lhs)),
        &normalize_path(&normalize_separators(rhs)),
    )
}

fn eq_ignore_case(lhs: &str, rhs: &str) -> bool {
    lhs.to_lowercase() == rhs.to_lowercase()
}

pub fn quote_if_needed(path: &str) -> String {
    if path.chars().any(char::is_whitespace) {
        format!("\"{path}\"")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    /// Evaluates from a fixed table, like the IDE would for a single configuration
    struct TableEvaluator(IndexMap<&'static str, &'static str>);

    impl MacroEvaluation for TableEvaluator {
        fn evaluate(&self, _: &str, _: &ProjectConfiguration, text: &str) -> String {
            replace_macros(text, |name| {
                self.0.get(name).map(|v| v.to_string()).unwrap_or_default()
            })
        }
    }

    fn evaluator() -> TableEvaluator {
        TableEvaluator(IndexMap::from([
            ("SolutionDir", r"C:\work\demo\"),
            ("ProjectDir", r"C:\work\demo\app\"),
            ("Configuration", "Debug"),
            ("BOOST_ROOT", r"D:\libs\boost"),
        ]))
    }

    fn translate(original: &str) -> (Option<String>, Vec<String>) {
        let evaluator = evaluator();
        let mut translator =
            PathTranslator::new(&evaluator, "app", r"C:\work\demo\app", r"C:\work\demo");
        let translated = translator.translate_directory(&ProjectConfiguration::default(), original);
        let env = translator.into_environment_variables().into_iter().collect();
        (translated, env)
    }

    #[test]
    fn test_own_directory_paths() {
        assert_eq!(
            translate(r"$(ProjectDir)include\").0.as_deref(),
            Some("${CMAKE_CURRENT_SOURCE_DIR}/include")
        );
        assert_eq!(
            translate("include").0.as_deref(),
            Some("${CMAKE_CURRENT_SOURCE_DIR}/include")
        );
        assert_eq!(
            translate(".").0.as_deref(),
            Some("${CMAKE_CURRENT_SOURCE_DIR}")
        );
    }

    #[test]
    fn test_project_tree_paths() {
        assert_eq!(
            translate(r"$(SolutionDir)common\include").0.as_deref(),
            Some("${CMAKE_SOURCE_DIR}/common/include")
        );
        assert_eq!(
            translate(r"..\common").0.as_deref(),
            Some("${CMAKE_SOURCE_DIR}/common")
        );
    }

    #[test]
    fn test_sibling_directory_with_a_common_prefix_is_not_below() {
        assert_eq!(
            translate(r"C:\work\demo-extras\include").0.as_deref(),
            Some("C:/work/demo-extras/include")
        );
    }

    #[test]
    fn test_unresolved_macros_become_environment_references() {
        let (translated, env) = translate(r"$(BOOST_ROOT)\include");
        assert_eq!(translated.as_deref(), Some("$ENV{BOOST_ROOT}/include"));
        assert_eq!(env, vec!["BOOST_ROOT"]);

        let (translated, env) = translate(r"$(UNDEFINED_ROOT)\$(Configuration)\include");
        assert_eq!(
            translated.as_deref(),
            Some("$ENV{UNDEFINED_ROOT}/Debug/include")
        );
        assert_eq!(env, vec!["UNDEFINED_ROOT"]);
    }

    #[test]
    fn test_relative_paths_keep_their_unresolved_macros() {
        let (translated, env) = translate(r"..\$(THIRD_PARTY)\include");
        assert_eq!(translated.as_deref(), Some("../$ENV{THIRD_PARTY}/include"));
        assert_eq!(env, vec!["THIRD_PARTY"]);

        let (translated, env) = translate(r"$(THIRD_PARTY)\include");
        assert_eq!(translated.as_deref(), Some("$ENV{THIRD_PARTY}/include"));
        assert_eq!(env, vec!["THIRD_PARTY"]);

        let (translated, env) = translate(r"..\$(Configuration)\include");
        assert_eq!(translated.as_deref(), Some("${CMAKE_SOURCE_DIR}/Debug/include"));
        assert!(env.is_empty());
    }

    #[test]
    fn test_empty_evaluations_are_dropped() {
        assert_eq!(translate("$(UNDEFINED)").0, None);
        assert_eq!(translate("  ").0, None);
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        assert_eq!(
            translate(r"C:\Program Files\SDK\include\").0.as_deref(),
            Some("\"C:/Program Files/SDK/include\"")
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("C:/a/./b/../c/"), "C:/a/c");
        assert_eq!(normalize_path("/usr/../lib"), "/lib");
        assert_eq!(normalize_path("../../x/./y"), "../../x/y");
        assert_eq!(normalize_path("C:/.."), "C:/");
    }

    #[test]
    fn test_relative_to_is_component_wise_and_case_insensitive() {
        assert_eq!(
            relative_to("C:/Work/Demo/app", "c:/work/demo"),
            Some("app".to_string())
        );
        assert_eq!(relative_to("C:/work/demo", "C:/work/demo"), Some(String::new()));
        assert_eq!(relative_to("C:/work/demo2", "C:/work/demo"), None);
        assert_eq!(relative_to("app/include", "C:/work/demo"), None);
    }

    #[test]
    fn test_paths_equal() {
        assert!(paths_equal(r"C:\sln\x64\Debug\core.lib", "c:/sln/x64/debug/./core.lib"));
        assert!(!paths_equal("C:/sln/core.lib", "C:/sln/core_imp.lib"));
    }
}
