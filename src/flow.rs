//! The detection submission flow.
//!
//! One submission is strictly sequential: submit the image URL, bump the
//! signed-in account's entry count when the backend answered at all, then
//! interpret the detection payload. The count bump and the interpretation
//! are independent; a failure in one must not block the other.

use crate::api::BackendClient;
use crate::interpret::{interpret, DisplayDimensions};
use crate::session::SessionState;

/// Generic retryable status used when the submission itself fails.
pub const SUBMIT_FAILED_STATUS: &str = "Error processing image. Please try again.";

/// Run one image submission and fold the outcome into the session state.
///
/// The returned state replaces the previous one wholesale; with one
/// submission in flight at a time, the last state returned wins.
pub fn run_detection(
    client: &BackendClient,
    state: SessionState,
    image_url: &str,
    dims: Option<DisplayDimensions>,
) -> SessionState {
    let state = state.submitted(image_url.to_string());

    let response = match client.submit_image_url(image_url) {
        Ok(response) => response,
        Err(err) => {
            log::warn!("image submission failed: {err}");
            return state.with_status(SUBMIT_FAILED_STATUS);
        }
    };

    // Count bump is best-effort: log and carry on, the box still gets drawn.
    let state = if !response.is_null() {
        match state.user_id() {
            Some(user_id) => match client.increment_entries(user_id) {
                Ok(entries) => state.entries_updated(entries),
                Err(err) => {
                    log::warn!("entry count update failed: {err}");
                    state
                }
            },
            None => state,
        }
    } else {
        state
    };

    state.detection_result(interpret(&response, dims))
}
