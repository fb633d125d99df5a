//! Error types emitted by the roadfuel CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use roadfuel_core::{PlanError, TripRequestValidationError};
use thiserror::Error;

/// Errors emitted by the roadfuel CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can also supply it.
        env: &'static str,
    },
    /// The path resolution was zero, negative or not a number.
    #[error("{field} must be a positive number of kilometres, got {value}")]
    InvalidResolution {
        /// Flag name of the offending option.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name of the input.
        field: &'static str,
        /// Path that was looked up.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name of the input.
        field: &'static str,
        /// Path that was looked up.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name of the input.
        field: &'static str,
        /// Path that was looked up.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the trip request file failed.
    #[error("failed to open trip request at {path:?}: {source}")]
    OpenTripRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Trip request JSON could not be decoded.
    #[error("failed to parse trip request JSON at {path:?}: {source}")]
    ParseTripRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The trip request payload failed validation.
    #[error("trip request in {path:?} failed validation: {source}")]
    InvalidTripRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// First invalid parameter.
        #[source]
        source: TripRequestValidationError,
    },
    /// Opening the station dataset failed.
    #[error("failed to open stations at {path:?}: {source}")]
    OpenStations {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Station dataset JSON could not be decoded.
    #[error("failed to parse stations JSON at {path:?}: {source}")]
    ParseStations {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The planner rejected the request.
    #[error("planner failed: {source}")]
    Plan {
        /// Planner failure.
        #[source]
        source: PlanError,
    },
    /// Serializing the plan response failed.
    #[error("failed to serialize plan response: {0}")]
    SerializePlanResponse(#[source] serde_json::Error),
    /// Writing the plan output failed.
    #[error("failed to write plan output: {0}")]
    WritePlanOutput(#[source] std::io::Error),
}
