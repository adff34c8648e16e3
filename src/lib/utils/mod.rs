pub mod constants;
pub mod fs;
pub mod logger;
pub mod macros;
pub mod reader;
