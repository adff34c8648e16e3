//! Helpers for the `$(Name)` build macros found on the project properties

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn macro_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\(([^()]*)\)").unwrap())
}

/// Replaces every `$(Name)` reference found on `text` with the value that `resolve` returns
/// for `Name`
pub fn replace_macros<F>(text: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> String,
{
    macro_regex()
        .replace_all(text, |caps: &Captures| resolve(&caps[1]))
        .into_owned()
}

/// The names of the `$(Name)` references found on `text`, in order of appearance
pub fn macro_names(text: &str) -> impl Iterator<Item = &str> {
    macro_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
}

/// Whether `value` is an MSBuild inheritance placeholder, ie: `%(PreprocessorDefinitions)`
pub fn is_inheritance_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("%(") && value.ends_with(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_macros() {
        let replaced = replace_macros("$(SolutionDir)lib/$(Configuration)", |name| {
            match name {
                "SolutionDir" => "C:/sln/".to_string(),
                "Configuration" => "Debug".to_string(),
                _ => String::new(),
            }
        });
        assert_eq!(replaced, "C:/sln/lib/Debug");
    }

    #[test]
    fn test_unbalanced_references_are_kept() {
        assert_eq!(replace_macros("$(OutDir", |_| String::new()), "$(OutDir");
        assert_eq!(replace_macros("$(A)$(B)", |name| name.to_lowercase()), "ab");
    }

    #[test]
    fn test_macro_names() {
        let names: Vec<&str> = macro_names(r"..\$(THIRD_PARTY)\$(Configuration)\inc").collect();
        assert_eq!(names, vec!["THIRD_PARTY", "Configuration"]);
        assert_eq!(macro_names("include").count(), 0);
    }

    #[test]
    fn test_inheritance_placeholders() {
        assert!(is_inheritance_placeholder("%(AdditionalIncludeDirectories)"));
        assert!(!is_inheritance_placeholder("$(OutDir)"));
    }
}
