//! The consumed interface of the conversion core.
//!
//! A project model provider is whatever knows how to answer questions about a solution: the
//! IDE automation layer, or a snapshot exported from it. The core only talks to it through
//! the capability traits declared here, so new providers only need to implement them

pub mod descriptor;
pub mod model;
pub mod snapshot;

use crate::domain::errors::ConversionError;

use self::descriptor::RawDescriptor;
use self::model::{ProjectConfiguration, ProjectFile, ProjectInfo, SolutionInfo};

/// Enumerates the solution, its projects and everything declared for each one of them
pub trait ConfigurationEnumeration {
    fn solution(&self) -> &SolutionInfo;

    /// Every project of the solution, in enumeration order
    fn projects(&self) -> &[ProjectInfo];

    /// The configurations declared by `project`. Empty for an unknown project
    fn project_configurations(&self, project: &str) -> &[ProjectConfiguration];

    /// The files referenced by `project`. Empty for an unknown project
    fn project_files(&self, project: &str) -> &[ProjectFile];
}

/// Evaluates the build macros of a string in the context of a project configuration
pub trait MacroEvaluation {
    /// Returns `text` with every `$(Name)` replaced. Undefined macros evaluate to the empty
    /// string
    fn evaluate(&self, project: &str, configuration: &ProjectConfiguration, text: &str)
        -> String;
}

/// Gives access to the raw project file of a project
pub trait RawDescriptorAccess {
    fn raw_descriptor(&self, project: &str) -> Result<RawDescriptor, ConversionError>;
}

/// Everything the conversion core needs from a provider
pub trait ProjectModelProvider:
    ConfigurationEnumeration + MacroEvaluation + RawDescriptorAccess
{
}

impl<T> ProjectModelProvider for T where
    T: ConfigurationEnumeration + MacroEvaluation + RawDescriptorAccess
{
}
