//! Error types and handling for stackup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Resolution errors (duplicate, missing pinned, missing dependency, cycle)
//! abort a run before anything is installed. Installation and proxy errors
//! are recorded per module / per entry point and only surface at the end.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for stackup operations
#[derive(Error, Diagnostic, Debug)]
pub enum StackupError {
    // Resolution errors
    #[error("Module '{name}' is declared more than once")]
    #[diagnostic(
        code(stackup::resolve::duplicate_module),
        help("Every module.yaml under the modules directory must use a unique name")
    )]
    DuplicateModule { name: String },

    #[error("Pinned module '{name}' was not found")]
    #[diagnostic(
        code(stackup::resolve::missing_pinned),
        help("Foundational modules are always installed first and must exist in the modules directory")
    )]
    MissingPinnedModule { name: String },

    #[error("Module '{module}' depends on '{dependency}', which does not exist")]
    #[diagnostic(
        code(stackup::resolve::missing_dependency),
        help("Add the missing module or remove it from the module's dependencies")
    )]
    MissingDependency { module: String, dependency: String },

    #[error("Circular dependency detected between: {}", .modules.join(", "))]
    #[diagnostic(
        code(stackup::resolve::cycle),
        help("Remove one of the dependencies so the modules no longer depend on each other")
    )]
    Cycle { modules: Vec<String> },

    // Installation errors
    #[error("{} module(s) failed to install: {}", .modules.len(), .modules.join(", "))]
    #[diagnostic(code(stackup::install::failed))]
    InstallFailure { modules: Vec<String> },

    #[error("Installer exited with {status}: {detail}")]
    #[diagnostic(code(stackup::install::command_failed))]
    InstallCommandFailed { status: String, detail: String },

    #[error("Installer timed out after {seconds}s")]
    #[diagnostic(
        code(stackup::install::timed_out),
        help("Raise timeout_secs in stackup.yaml if the module legitimately needs longer")
    )]
    InstallTimedOut { seconds: u64 },

    #[error("Failed to start installer '{program}': {reason}")]
    #[diagnostic(
        code(stackup::install::spawn_failed),
        help("Check installer.program in stackup.yaml and that the environment has been created")
    )]
    InstallerSpawnFailed { program: String, reason: String },

    #[error("Failed to record install marker at {path}: {reason}")]
    #[diagnostic(code(stackup::install::marker_failed))]
    MarkerWriteFailed { path: String, reason: String },

    // Proxy errors
    #[error("Failed to generate proxy for '{entry_point}': {reason}")]
    #[diagnostic(code(stackup::proxy::generation_failed))]
    ProxyGeneration { entry_point: String, reason: String },

    // Environment errors
    #[error("Isolated environment not found at: {path}")]
    #[diagnostic(
        code(stackup::environment::not_found),
        help("Create it first, for example with 'python3 -m venv .venv'")
    )]
    EnvironmentNotFound { path: String },

    #[error("Environment is locked by another stackup process")]
    #[diagnostic(
        code(stackup::environment::locked),
        help("Wait for the other install to finish")
    )]
    EnvironmentLocked,

    #[error("Failed to acquire environment lock: {reason}")]
    #[diagnostic(code(stackup::environment::lock_failed))]
    EnvironmentLockFailed { reason: String },

    // Configuration errors
    #[error("Modules directory not found: {path}")]
    #[diagnostic(
        code(stackup::config::modules_dir_not_found),
        help("Set modules_dir in stackup.yaml or create the directory")
    )]
    ModulesDirNotFound { path: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(stackup::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file {path}: {reason}")]
    #[diagnostic(code(stackup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid module descriptor {path}: {reason}")]
    #[diagnostic(
        code(stackup::descriptor::invalid),
        help("module.yaml needs at least a non-empty 'name'")
    )]
    DescriptorParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to write file: {path}")]
    #[diagnostic(code(stackup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(stackup::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for StackupError {
    fn from(err: std::io::Error) -> Self {
        StackupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for StackupError {
    fn from(err: serde_yaml::Error) -> Self {
        StackupError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StackupError {
    fn from(err: serde_json::Error) -> Self {
        StackupError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StackupError>;
