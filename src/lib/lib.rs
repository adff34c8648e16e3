pub mod cli;
pub mod converter;
pub mod domain;
pub mod model_file;
pub mod provider;
pub mod utils;

/// The entry point for the execution of the program.
///
/// This module existence is motivated to let us run
/// integration tests for the whole operations of the program
/// without having to do fancy work about checking the
/// data sent to stdout/stderr
pub mod worker {
    use std::path::{Path, PathBuf};
    use std::time::Instant;

    use color_eyre::{
        eyre::{eyre, Context},
        Result,
    };

    use crate::converter::{self, ConversionOutput};
    use crate::provider::snapshot::SnapshotProvider;
    use crate::provider::ConfigurationEnumeration;
    use crate::utils::constants::{error_messages, CMAKE_LISTS};
    use crate::utils::logger::LogFacadeSink;
    use crate::{
        cli::input::{CliArgs, Command},
        utils::{
            self,
            reader::{find_model_files, load_model},
        },
    };

    /// The main work of the project. Runs the tasks
    /// inputted in the CLI
    pub fn run_sln2cmake(cli_args: &CliArgs, project_root: &Path) -> Result<()> {
        let abs_project_root = determine_absolute_path_of_the_project_root(cli_args, project_root)?;

        for model_path in model_files(cli_args, &abs_project_root)? {
            log::debug!("Launching a sln2cmake work event for the snapshot: {model_path:?}");
            let provider = load_model(&model_path)?;

            match &cli_args.command {
                Command::Convert {
                    output, dry_run, ..
                } => {
                    let out_dir = output
                        .as_deref()
                        .map(|out| abs_project_root.join(out))
                        .unwrap_or_else(|| provider.base_dir().to_path_buf());
                    convert_solution(cli_args, &provider, &out_dir, *dry_run)
                        .with_context(|| {
                            format!("{}: {model_path:?}", error_messages::FAILURE_CONVERTING_SOLUTION)
                        })?;
                }
                Command::List { .. } => list_configurations(&provider),
            }
        }

        Ok(())
    }

    /// Resolves the full path of the location of the project's root on the fs. If the `--root`
    /// [`CliArgs`] arg is present, it will be used as the project root path, otherwise, we will
    /// assume that the project root is exactly the `project_root` from where the *sln2cmake*
    /// binary was invoked by the user
    fn determine_absolute_path_of_the_project_root(
        cli_args: &CliArgs,
        project_root: &Path,
    ) -> Result<PathBuf> {
        let root = cli_args
            .root
            .as_deref()
            .map(|root| project_root.join(root))
            .unwrap_or_else(|| project_root.to_path_buf());

        utils::fs::get_project_root_absolute_path(&root)
            .with_context(|| error_messages::FAILURE_GATHERING_PROJECT_ROOT_ABS_PATH)
    }

    /// The snapshot selected with `--model`, or every one found on the project's root
    fn model_files(cli_args: &CliArgs, abs_project_root: &Path) -> Result<Vec<PathBuf>> {
        match cli_args.command.model() {
            Some(model) => Ok(vec![abs_project_root.join(model)]),
            None => Ok(find_model_files(abs_project_root)?
                .into_iter()
                .map(|entry| entry.path)
                .collect()),
        }
    }

    fn convert_solution(
        cli_args: &CliArgs,
        provider: &SnapshotProvider,
        out_dir: &Path,
        dry_run: bool,
    ) -> Result<()> {
        let request = cli_args
            .command
            .conversion_request()
            .ok_or_else(|| eyre!("Nothing to convert for {:?}", cli_args.command))?;

        let conversion_ts = Instant::now();
        let output = converter::convert(provider, &request, &mut LogFacadeSink)?;
        log::debug!(
            "sln2cmake took a total of {:?} ms on converting the solution",
            conversion_ts.elapsed().as_millis()
        );

        if dry_run {
            print_descriptors(&output);
        } else {
            write_descriptors(&output, out_dir)?;
        }

        Ok(output.status()?)
    }

    fn print_descriptors(output: &ConversionOutput) {
        for descriptor in output.descriptors() {
            println!("# ---- {} ({}) ----", descriptor.name, descriptor_path(&descriptor.directory));
            println!("{}", descriptor.contents);
        }
    }

    /// Writes every generated descriptor below `out_dir`, creating the missing directories
    fn write_descriptors(output: &ConversionOutput, out_dir: &Path) -> Result<()> {
        for descriptor in output.descriptors() {
            let dir = out_dir.join(&descriptor.directory);
            utils::fs::create_directory(&dir)?;
            utils::fs::create_file(&dir, CMAKE_LISTS, descriptor.contents.as_bytes())
                .with_context(|| {
                    format!("{}: {:?}", error_messages::FAILURE_WRITING_DESCRIPTOR, dir)
                })?;
            log::info!("Generated {:?}", dir.join(CMAKE_LISTS));
        }
        Ok(())
    }

    fn descriptor_path(directory: &str) -> String {
        if directory.is_empty() {
            CMAKE_LISTS.to_string()
        } else {
            format!("{directory}/{CMAKE_LISTS}")
        }
    }

    /// Prints every platform of the solution, with the configurations available for it
    fn list_configurations(provider: &SnapshotProvider) {
        let solution = provider.solution();
        let mut platforms: Vec<&str> = Vec::new();
        for cfg in &solution.configurations {
            if !platforms.contains(&cfg.platform.as_str()) {
                platforms.push(&cfg.platform);
            }
        }

        println!("Solution '{}'", solution.name);
        for platform in platforms {
            let configurations: Vec<&str> = solution
                .configurations
                .iter()
                .filter(|cfg| cfg.platform == platform)
                .map(|cfg| cfg.name.as_str())
                .collect();
            println!("  {platform}: {}", configurations.join(", "));
        }
    }

}
