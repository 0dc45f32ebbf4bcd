//! Smart Brain client
//!
//! Client library for the Smart Brain face-detection service: sign in or
//! register against the backend, submit an image URL, and turn the
//! variant-shaped detection response into a pixel-space bounding box for an
//! edge-inset overlay.
//!
//! # Module Structure
//!
//! - `interpret`: detection response normalization and box arithmetic
//! - `session`: immutable session/view state, replaced on each transition
//! - `api`: blocking JSON client for the backend contract
//! - `flow`: the sequential submit → count bump → interpret flow
//! - `config`: backend location and transport timeout

pub mod api;
pub mod config;
pub mod flow;
pub mod interpret;
pub mod session;

pub use api::{ApiError, BackendClient};
pub use config::ClientConfig;
pub use flow::{run_detection, SUBMIT_FAILED_STATUS};
pub use interpret::{
    interpret, DisplayDimensions, FaceBox, Interpretation, NoFaceReason, UPSTREAM_ERROR_MARKER,
};
pub use session::{Route, SessionState, User};
