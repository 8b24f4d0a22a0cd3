//! The edit session and its single-slot container
//!
//! A session owns one original image and moves through
//! `Idle → Processing → Success | Failed`. The status is a sum type, so a
//! result only exists on success and an error message only on failure.
//!
//! Transitions consume the session and return the next value; the store
//! swaps the old value out for the new one.

use tracing::{debug, warn};
use uuid::Uuid;

use super::data::ImageAsset;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Uploaded, waiting for the user to start processing
    Idle,
    /// A remote call is in flight
    Processing,
    /// The remote call returned a cleaned image
    Success(ImageAsset),
    /// The remote call failed with a user-facing message
    Failed(String),
}

/// Flat status label for the view layer
///
/// `Uploading` is never stored in a session: it describes the window in
/// which a file read is in flight and no session exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    Idle,
    Uploading,
    Processing,
    Success,
    Error,
}

impl From<&Status> for ProcessingStatus {
    fn from(status: &Status) -> Self {
        match status {
            Status::Idle => ProcessingStatus::Idle,
            Status::Processing => ProcessingStatus::Processing,
            Status::Success(_) => ProcessingStatus::Success,
            Status::Failed(_) => ProcessingStatus::Error,
        }
    }
}

/// One upload/process/display cycle
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    id: String,
    original: ImageAsset,
    status: Status,
}

impl EditSession {
    /// Start a new session for a freshly loaded image
    pub fn new(original: ImageAsset) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original,
            status: Status::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original(&self) -> &ImageAsset {
        &self.original
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The cleaned image, present only on success
    pub fn result(&self) -> Option<&ImageAsset> {
        match &self.status {
            Status::Success(result) => Some(result),
            _ => None,
        }
    }

    /// The failure message, present only on error
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.status == Status::Processing
    }

    /// Whether the user may start (or restart) processing
    pub fn can_process(&self) -> bool {
        matches!(self.status, Status::Idle | Status::Failed(_))
    }

    /// Move to `Processing`, dropping any previous error
    ///
    /// Allowed from `Idle` and from `Failed` (the user re-invokes processing).
    pub fn begin_processing(self) -> Self {
        if !self.can_process() {
            warn!("Ignoring begin_processing in state {:?}", ProcessingStatus::from(&self.status));
            return self;
        }
        self.with_status(Status::Processing)
    }

    /// Move to `Success` carrying the cleaned image
    pub fn complete(self, result: ImageAsset) -> Self {
        if !self.is_processing() {
            warn!("Ignoring complete in state {:?}", ProcessingStatus::from(&self.status));
            return self;
        }
        self.with_status(Status::Success(result))
    }

    /// Move to `Failed` carrying a user-facing message
    pub fn fail(self, message: impl Into<String>) -> Self {
        if !self.is_processing() {
            warn!("Ignoring fail in state {:?}", ProcessingStatus::from(&self.status));
            return self;
        }
        self.with_status(Status::Failed(message.into()))
    }

    fn with_status(self, status: Status) -> Self {
        debug!(
            "Session {}: {:?} -> {:?}",
            self.id,
            ProcessingStatus::from(&self.status),
            ProcessingStatus::from(&status)
        );
        Self { status, ..self }
    }
}

/// Holds the single live session, if any
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<EditSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&EditSession> {
        self.current.as_ref()
    }

    /// Replace whatever session exists with a new idle one
    pub fn create(&mut self, original: ImageAsset) -> &EditSession {
        self.current.insert(EditSession::new(original))
    }

    pub fn begin_processing(&mut self) {
        self.replace(EditSession::begin_processing);
    }

    pub fn complete(&mut self, result: ImageAsset) {
        self.replace(|session| session.complete(result));
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.replace(|session| session.fail(message));
    }

    /// Drop the session entirely
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Whether `id` names the live session
    pub fn is_current(&self, id: &str) -> bool {
        self.current.as_ref().is_some_and(|s| s.id() == id)
    }

    fn replace(&mut self, transition: impl FnOnce(EditSession) -> EditSession) {
        self.current = self.current.take().map(transition);
    }
}
