//! Domain models for stackup
//!
//! This module contains pure domain objects representing core entities.
//! These types are free of I/O and are shared by the resolver, the
//! orchestrator and the proxy generator.

pub mod module;
pub mod report;

pub use module::ModuleDescriptor;
pub use report::{InstallOutcome, InstallReport};
