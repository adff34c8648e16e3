//! The types shared by every stage of the conversion
pub mod configuration;
pub mod errors;
pub mod settings;
pub mod target;
