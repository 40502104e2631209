//! Command implementations

pub mod addresses;
pub mod deploy;
pub mod version;
