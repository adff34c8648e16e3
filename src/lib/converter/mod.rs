//! The conversion core. Turns the projects of a solution into `CMake` descriptors.
//!
//! The run goes through two passes. The first one resolves every target, extracts its
//! settings and translates its paths. Only once every target is known, the second one
//! resolves the library references between them and renders the descriptors

pub mod differ;
pub mod emitter;
pub mod expressions;
pub mod extractor;
pub mod linker;
pub mod normalized;
pub mod paths;
pub mod resolver;

use crate::domain::errors::ConversionError;
use crate::provider::ProjectModelProvider;
use crate::utils::logger::LogSink;

use self::extractor::extract_target;
use self::linker::{resolve_link_libraries, TargetGraph};
use self::normalized::{normalize_target, NormalizedTarget};
use self::paths::{normalize_path, normalize_separators, relative_to};
use self::resolver::{resolve_solution, ConversionRequest, ResolvedTarget};

/// A rendered `CMakeLists.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDescriptor {
    /// The target it describes, or the solution for the aggregate one
    pub name: String,
    /// Where the descriptor goes, relative to the solution directory. Empty for the root
    pub directory: String,
    pub contents: String,
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionOutput {
    /// The descriptors of the targets, in enumeration order
    pub targets: Vec<GeneratedDescriptor>,
    /// The aggregate descriptor. Not rendered when some target failed
    pub solution: Option<GeneratedDescriptor>,
    /// The targets whose project file couldn't be loaded
    pub failures: Vec<ConversionError>,
}

impl ConversionOutput {
    /// Every descriptor of the run, the aggregate one last
    pub fn descriptors(&self) -> impl Iterator<Item = &GeneratedDescriptor> {
        self.targets.iter().chain(self.solution.iter())
    }

    /// Collapses the per target failures into the status of the whole run
    pub fn status(&self) -> Result<(), ConversionError> {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(ConversionError::TargetsFailed {
            targets: self
                .failures
                .iter()
                .map(|failure| match failure {
                    ConversionError::DescriptorParseError { target, .. } => target.clone(),
                    other => other.to_string(),
                })
                .collect(),
        })
    }
}

/// Converts the solution served by `provider`.
///
/// A validation failure aborts the run before anything is rendered. A project file that
/// can't be loaded only skips its own target, and is reported on
/// [`ConversionOutput::failures`]
pub fn convert<P: ProjectModelProvider>(
    provider: &P,
    request: &ConversionRequest,
    sink: &mut dyn LogSink,
) -> Result<ConversionOutput, ConversionError> {
    let resolved = resolve_solution(provider, request, sink)?;
    let source_root = normalize_path(&normalize_separators(&provider.solution().directory));

    let mut failures = Vec::new();
    let mut converted: Vec<(&ResolvedTarget, NormalizedTarget, _)> = Vec::new();
    for target in &resolved {
        sink.info(&format!("Converting '{}'", target.target.name));
        match extract_target(provider, target) {
            Ok(extracted) => {
                let normalized = normalize_target(provider, &source_root, target, &extracted);
                for variable in &normalized.environment_variables {
                    sink.warn(&format!(
                        "'{}' depends on the environment variable '{variable}'",
                        target.target.name
                    ));
                }
                converted.push((target, normalized, extracted.defaults));
            }
            Err(err @ ConversionError::DescriptorParseError { .. }) => {
                sink.error(&err.to_string());
                failures.push(err);
            }
            Err(err) => return Err(err),
        }
    }

    let graph = TargetGraph::new(resolved.iter().map(|r| &r.target));
    let mut output = ConversionOutput {
        failures,
        ..Default::default()
    };

    for (resolved, mut normalized, defaults) in converted {
        normalized.link_libraries =
            resolve_link_libraries(provider, &source_root, &graph, resolved, &defaults);

        output.targets.push(GeneratedDescriptor {
            name: normalized.target.name.clone(),
            directory: descriptor_directory(&normalized, &source_root, sink),
            contents: emitter::emit_target(&normalized),
        });
    }

    if output.failures.is_empty() {
        let name = &provider.solution().name;
        let directories: Vec<String> = output
            .targets
            .iter()
            .map(|t| t.directory.clone())
            .collect();
        output.solution = Some(GeneratedDescriptor {
            name: name.clone(),
            directory: String::new(),
            contents: emitter::emit_solution(name, &directories),
        });
    }

    Ok(output)
}

/// The directory of the target relative to the solution. A target living outside of the
/// project tree is placed on a directory named after it
fn descriptor_directory(
    normalized: &NormalizedTarget,
    source_root: &str,
    sink: &mut dyn LogSink,
) -> String {
    let target = &normalized.target;
    match relative_to(&target.directory, source_root) {
        Some(rel) if !rel.is_empty() => rel,
        Some(_) => ".".to_string(),
        None => {
            sink.warn(&format!(
                "'{}' lives outside of the solution directory. Its descriptor is written to '{}'",
                target.name, target.name
            ));
            target.name.clone()
        }
    }
}
