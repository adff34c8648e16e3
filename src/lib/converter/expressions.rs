//! Builds `CMake` generator expressions scoped to a build configuration

/// `$<$<CONFIG:name>:value>`
pub fn config_expression(configuration: &str, value: &str) -> String {
    format!("$<$<CONFIG:{configuration}>:{value}>")
}

/// Joins one [`config_expression`] per non empty value with `separator`, keeping the order
/// of the pairs. When every value is empty the result is empty too, and the caller is
/// expected to skip the construct that would have surrounded it
///
/// ```rust
/// use sln2cmake::converter::expressions::config_expressions;
///
/// let pairs = [("Debug", "_DEBUG"), ("Profile", ""), ("Release", "NDEBUG")];
/// assert_eq!(
///     config_expressions(pairs, " "),
///     "$<$<CONFIG:Debug>:_DEBUG> $<$<CONFIG:Release>:NDEBUG>"
/// );
/// assert_eq!(config_expressions([("Debug", "")], " "), "");
/// ```
pub fn config_expressions<I, C, V>(pairs: I, separator: &str) -> String
where
    I: IntoIterator<Item = (C, V)>,
    C: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .filter(|(_, value)| !value.as_ref().is_empty())
        .map(|(cfg, value)| config_expression(cfg.as_ref(), value.as_ref()))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_order_is_preserved() {
        let pairs = vec![
            ("Release".to_string(), "/sdl-".to_string()),
            ("Debug".to_string(), "/sdl".to_string()),
        ];
        assert_eq!(
            config_expressions(pairs, "\n  "),
            "$<$<CONFIG:Release>:/sdl->\n  $<$<CONFIG:Debug>:/sdl>"
        );
    }

    #[test]
    fn test_all_empty_values_yield_nothing() {
        let pairs: [(&str, &str); 2] = [("Debug", ""), ("Release", "")];
        assert!(config_expressions(pairs, ";").is_empty());
        assert!(config_expressions(Vec::<(&str, &str)>::new(), ";").is_empty());
    }
}
