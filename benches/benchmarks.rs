//! Benchmarks tests for measuring the performance of the code

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use sln2cmake::{
    converter::{self, emitter, resolver::ConversionRequest},
    domain::{settings::PchMode, target::FileKind, target::TargetKind},
    model_file::{ModelFile, ProjectEntry},
    provider::{
        model::{
            CompilerTool, FileTool, LinkerTool, ProjectConfiguration, ProjectFile,
            SolutionConfiguration, SolutionContext, SolutionInfo,
        },
        snapshot::SnapshotProvider,
    },
    utils::logger::CapturingSink,
};

const TARGETS: usize = 40;
const FILES_PER_TARGET: usize = 60;
const CONFIGURATIONS: [&str; 3] = ["Debug", "Release", "Profile"];

/// A solution where every library links the previous one, and every fifth file overrides
/// its definitions on some configuration
fn generated_snapshot() -> SnapshotProvider {
    let configurations = CONFIGURATIONS
        .iter()
        .map(|cfg| SolutionConfiguration {
            name: cfg.to_string(),
            platform: "x64".into(),
            contexts: (0..TARGETS)
                .map(|i| SolutionContext {
                    project: format!("lib{i}"),
                    configuration: cfg.to_string(),
                    platform: "x64".into(),
                    should_build: true,
                })
                .collect(),
        })
        .collect();

    let projects = (0..TARGETS).map(generated_project).collect();

    let model = ModelFile {
        solution: SolutionInfo {
            name: "generated".into(),
            directory: "C:/work/generated".into(),
            configurations,
        },
        environment: IndexMap::new(),
        projects,
    };
    SnapshotProvider::new(model, ".")
}

fn generated_project(index: usize) -> ProjectEntry {
    let mut macros = IndexMap::new();
    macros.insert(
        "OutDir".to_string(),
        "$(SolutionDir)$(Platform)/$(Configuration)/".to_string(),
    );

    let configurations = CONFIGURATIONS
        .iter()
        .map(|cfg| ProjectConfiguration {
            name: cfg.to_string(),
            platform: "x64".into(),
            kind: TargetKind::StaticLib,
            primary_output: format!("$(OutDir)lib{index}.lib"),
            macros: macros.clone(),
            compiler: CompilerTool {
                additional_include_directories: vec![
                    "include;../common/include;$(THIRD_PARTY)/include".into(),
                ],
                preprocessor_definitions: vec![format!("WIN32;{}", cfg.to_uppercase())],
                precompiled_header: PchMode::Use,
                ..Default::default()
            },
            linker: LinkerTool {
                additional_library_directories: vec!["$(OutDir)".into()],
                additional_dependencies: match index {
                    0 => vec!["kernel32.lib".into()],
                    _ => vec![format!("lib{}.lib;kernel32.lib", index - 1)],
                },
            },
            ..Default::default()
        })
        .collect();

    let files = (0..FILES_PER_TARGET)
        .map(|f| {
            let mut overrides = IndexMap::new();
            if f % 5 == 0 {
                overrides.insert(
                    "Release".to_string(),
                    FileTool {
                        preprocessor_definitions: Some(vec![format!("WIN32;RELEASE;FILE_{f}")]),
                        ..Default::default()
                    },
                );
            }
            ProjectFile {
                relative_path: format!("src/file_{f}.cpp"),
                kind: FileKind::Source,
                configurations: overrides,
                ..Default::default()
            }
        })
        .collect();

    ProjectEntry {
        name: format!("lib{index}"),
        full_path: format!("C:/work/generated/lib{index}/lib{index}.vcxproj"),
        native: true,
        descriptor_text: Some("<Project />".into()),
        configurations,
        files,
        ..Default::default()
    }
}

pub fn conversion_benchmark(c: &mut Criterion) {
    let provider = generated_snapshot();
    let request = ConversionRequest::default();

    c.bench_function("Convert a generated solution", |b| {
        b.iter(|| {
            converter::convert(
                black_box(&provider),
                black_box(&request),
                &mut CapturingSink::default(),
            )
        })
    });

    let directories: Vec<String> = (0..TARGETS).map(|i| format!("lib{i}")).collect();
    c.bench_function("Render the aggregate descriptor", |b| {
        b.iter(|| emitter::emit_solution(black_box("generated"), black_box(&directories)))
    });
}

criterion_group!(benches, conversion_benchmark);
criterion_main!(benches);
