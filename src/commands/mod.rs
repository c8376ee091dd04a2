//! Command implementations for stackup CLI

pub mod completions;
pub mod install;
pub mod list;
pub mod plan;
pub mod proxies;
pub mod version;
