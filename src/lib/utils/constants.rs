//! Constant value definitions to use across the whole program

/// The oldest `CMake` able to process the generated descriptors. `target_link_options`
/// appeared on 3.13
pub const CMAKE_REQUIRED_VERSION: &str = "3.13";
pub const CMAKE_LISTS: &str = "CMakeLists.txt";

pub const MODEL_FILE_PREFIX: &str = "sln2cmake";
pub const MODEL_FILE_EXTS: [&str; 2] = ["toml", "json"];

pub const DEFAULT_PLATFORM: &str = "x64";

/// Platform names meaning "any architecture", which can't be mapped into a native build
pub const ANY_PLATFORMS: [&str; 3] = ["Any CPU", "AnyCPU", "any"];

/// The portable prefixes that replace absolute paths in the generated descriptors
pub mod cmake_dirs {
    pub const CURRENT_SOURCE_DIR: &str = "${CMAKE_CURRENT_SOURCE_DIR}";
    pub const SOURCE_DIR: &str = "${CMAKE_SOURCE_DIR}";
}

/// What the IDE assumes when a precompiled header property is left untouched
pub mod pch_defaults {
    pub const HEADER_FILE: &str = "stdafx.h";
    pub const PCH_FILE: &str = "$(IntDir)$(TargetName).pch";
}

/// Macro names defined by Visual Studio itself. Any other `$(Name)` found on a path is
/// considered an environment variable.
/// See https://msdn.microsoft.com/library/239bd708-2ea9-4687-b264-043f1febf98b
pub const IDE_MACROS: [&str; 40] = [
    "RemoteMachine",
    "Configuration",
    "Platform",
    "ParentName",
    "RootNameSpace",
    "IntDir",
    "OutDir",
    "DevEnvDir",
    "InputDir",
    "InputPath",
    "InputName",
    "InputFileName",
    "InputExt",
    "ProjectDir",
    "ProjectPath",
    "ProjectName",
    "ProjectFileName",
    "ProjectExt",
    "SolutionDir",
    "SolutionPath",
    "SolutionName",
    "SolutionFileName",
    "SolutionExt",
    "TargetDir",
    "TargetPath",
    "TargetName",
    "TargetFileName",
    "TargetExt",
    "VSInstallDir",
    "VCInstallDir",
    "FrameworkDir",
    "FrameworkVersion",
    "FrameworkSDKDir",
    "WebDeployPath",
    "WebDeployRoot",
    "SafeParentName",
    "SafeInputName",
    "SafeRootNamespace",
    "FxCopDir",
    "NOINHERIT",
];

pub mod debug_messages {
    pub const SEARCHING_MODEL_FILES: &str = "Searching for project model snapshots...";
}

pub mod error_messages {
    pub const READ_MODEL_FILE: &str = "Could not read the project model file";
    pub const PARSE_MODEL_FILE: &str = "Could not parse the project model file";
    pub const NO_MODEL_FILES: &str = "No project model files found for the solution";
    pub const UNKNOWN_MODEL_FORMAT: &str =
        "Unknown project model format. Expected a .toml or a .json file";
    pub const FAILURE_GATHERING_PROJECT_ROOT_ABS_PATH: &str =
        "An unexpected error happened while resolving the absolute path to the current project root";
    pub const FAILURE_CONVERTING_SOLUTION: &str = "Failed to convert the solution";
    pub const FAILURE_WRITING_DESCRIPTOR: &str = "Failed to write the generated CMakeLists.txt";
}
