use clap::{Parser, Subcommand};

use crate::converter::resolver::ConversionRequest;
use crate::utils::constants::DEFAULT_PLATFORM;

/// [`CliArgs`] is the command line arguments parser
///
/// #Test
/// ```rust
/// use clap::Parser;
/// use sln2cmake::cli::input::{CliArgs, Command};
///
/// let parser = CliArgs::parse_from(["", "-vv", "list"]);
/// assert_eq!(2, parser.verbose);
/// assert_eq!(parser.command, Command::List { model: None });
///
/// let parser = CliArgs::parse_from(["", "convert"]);
/// let Command::Convert { ref platform, ref configurations, dry_run, .. } = parser.command else {
///     panic!("Expected the convert command");
/// };
/// assert_eq!(platform, "x64");
/// assert!(configurations.is_none());
/// assert!(!dry_run);
///
/// let parser = CliArgs::parse_from([
///     "", "--root", "C:/work/demo", "convert", "--platform", "Win32",
///     "--configurations", "Debug,Release", "--dry-run",
/// ]);
/// assert_eq!(parser.root.as_deref(), Some("C:/work/demo"));
/// let request = parser.command.conversion_request().unwrap();
/// assert_eq!(request.platform, "Win32");
/// assert_eq!(request.configurations, Some(vec!["Debug".to_string(), "Release".to_string()]));
/// ```
#[derive(Parser, Debug)]
#[command(name = "sln2cmake")]
#[command(author = "Zero Day Code")]
#[command(version = "0.4.0")]
#[command(
    about = "sln2cmake converts Visual C++ solutions into CMake projects",
    long_about = "sln2cmake reads a project model snapshot exported from Visual Studio and writes \
        one CMakeLists.txt per project, keeping every build configuration"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, help="sln2cmake maximum allowed verbosity level is: '-vv'")]
    pub verbose: u8,

    #[arg(short, long, help = "Allows the user to specify the project's root")]
    pub root: Option<String>,
}

/// [`Command`] -  The core enum commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Writes the CMakeLists.txt files of the solution
    Convert {
        #[arg(short, long, default_value = DEFAULT_PLATFORM, help = "The platform to convert")]
        platform: String,
        #[arg(
            short,
            long,
            value_delimiter = ',',
            help = "The solution configurations to convert. All of them when omitted"
        )]
        configurations: Option<Vec<String>>,
        #[arg(
            short,
            long,
            help = "The project model snapshot. Searched on the project's root when omitted"
        )]
        model: Option<String>,
        #[arg(
            short,
            long,
            help = "Where the descriptors are written. Defaults to the snapshot directory"
        )]
        output: Option<String>,
        #[arg(long, help = "Prints the descriptors instead of writing them")]
        dry_run: bool,
    },
    /// Shows the platforms and configurations declared by the solution
    List {
        #[arg(short, long, help = "The project model snapshot")]
        model: Option<String>,
    },
}

impl Command {
    /// The snapshot explicitly selected by the user, if any
    pub fn model(&self) -> Option<&str> {
        match self {
            Command::Convert { model, .. } | Command::List { model } => model.as_deref(),
        }
    }

    /// What has to be converted. `None` for the commands that don't convert anything
    pub fn conversion_request(&self) -> Option<ConversionRequest> {
        let Command::Convert {
            platform,
            configurations,
            ..
        } = self
        else {
            return None;
        };

        let request = ConversionRequest::new(platform.as_str());
        Some(match configurations {
            Some(names) => request.with_configurations(names.iter().map(String::as_str)),
            None => request,
        })
    }
}
