//! Error types for the run logger and its configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while running workers against a policy.
#[derive(Debug, Error)]
pub enum RunError {
	/// The requester tripped the configured failure sentinel inside the
	/// run-id critical section.
	#[error("request_run ran into an error for '{requester}'")]
	InitializationFailed {
		/// Name of the worker whose request failed.
		requester: String,
	},

	/// A worker thread panicked before reporting.
	#[error("worker '{worker}' panicked")]
	WorkerPanicked {
		/// Name of the worker.
		worker: String,
	},

	/// A worker thread could not be started.
	#[error("failed to spawn thread for worker '{worker}': {error}")]
	Spawn {
		/// Name of the worker.
		worker: String,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for run operations.
pub type Result<T> = std::result::Result<T, RunError>;

/// Errors that can occur when loading demo configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {}: {error}", .path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or structure.
	#[error("failed to parse demo config: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value parsed but is out of bounds.
	#[error("invalid demo config: {0}")]
	Invalid(String),
}
