//! Immutable session/view state.
//!
//! One value holds everything the client knows about the current session:
//! the active route, the signed-in user, the image under analysis, the last
//! face box, and the user-facing status line. Transitions consume the state
//! and return a replacement, so there is no partially-updated intermediate
//! to observe; sign-out restores the initial defaults wholesale.

use serde::Deserialize;

use crate::interpret::{FaceBox, Interpretation, NoFaceReason};

/// Which screen the session is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Signin,
    Register,
    Home,
}

/// Account record returned by the backend.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub entries: i64,
    pub joined: String,
}

/// Snapshot of the client session.
///
/// `face_box` is only ever populated from a successful interpretation; a
/// no-face outcome leaves it `None` and records a status line instead. There
/// is no zero-filled placeholder box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub route: Route,
    pub user: Option<User>,
    pub image_url: Option<String>,
    pub face_box: Option<FaceBox>,
    pub status: Option<String>,
}

impl SessionState {
    /// Transition to the home screen with a freshly authenticated user.
    pub fn signed_in(self, user: User) -> Self {
        Self {
            route: Route::Home,
            user: Some(user),
            image_url: None,
            face_box: None,
            status: None,
        }
    }

    /// Registration lands on the home screen like a sign-in.
    pub fn registered(self, user: User) -> Self {
        self.signed_in(user)
    }

    /// Full reset: route back to sign-in, user and detection state cleared.
    pub fn signed_out(self) -> Self {
        Self::default()
    }

    /// Record the image URL being analyzed; any previous box or status line
    /// belongs to an older submission and is dropped.
    pub fn submitted(self, image_url: String) -> Self {
        Self {
            image_url: Some(image_url),
            face_box: None,
            status: None,
            ..self
        }
    }

    /// Fold a detection outcome into the state.
    pub fn detection_result(self, interpretation: Interpretation) -> Self {
        match interpretation {
            Interpretation::Face(face_box) => Self {
                face_box: Some(face_box),
                status: None,
                ..self
            },
            Interpretation::NoFace(reason) => Self {
                face_box: None,
                status: Some(status_message(reason).to_string()),
                ..self
            },
        }
    }

    /// Replace the status line, clearing any stale box.
    pub fn with_status(self, status: &str) -> Self {
        Self {
            face_box: None,
            status: Some(status.to_string()),
            ..self
        }
    }

    /// Replace the signed-in user's entry count.
    pub fn entries_updated(mut self, entries: i64) -> Self {
        if let Some(user) = &mut self.user {
            user.entries = entries;
        }
        self
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.id)
    }
}

/// User-facing wording per no-face kind.
fn status_message(reason: NoFaceReason) -> &'static str {
    match reason {
        NoFaceReason::NoRegions => "no face detected, try a different image",
        NoFaceReason::UpstreamError => "the detection service could not process this image",
        NoFaceReason::MalformedResponse => "unexpected reply from the detection service, try again",
        NoFaceReason::MissingDimensions => "image size unknown, wait for the image to load and retry",
    }
}
