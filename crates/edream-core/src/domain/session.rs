//! Upload session state.
//!
//! A session lives for exactly one upload call. It moves
//! `Created -> AwaitingParts -> Completing -> Done`, or to `Failed` from
//! `AwaitingParts` or `Completing`.

use serde::Serialize;
use thiserror::Error;

use super::part::CompletedPart;
use super::resource::ResourceType;

/// Lifecycle state of an upload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Planned but not yet opened on the backend.
    Created,
    /// Opened; parts are being uploaded.
    AwaitingParts,
    /// Every part uploaded; completion requested.
    Completing,
    /// Completed successfully.
    Done,
    /// Terminated by a fatal error.
    Failed,
}

impl SessionStatus {
    /// Whether the session can no longer change.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Rejected part or state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStateError {
    /// A part was recorded out of order or twice.
    #[error("Expected part {expected}, got part {got}")]
    OutOfOrder {
        /// Next part number the session accepts
        expected: u32,
        /// Part number that was offered
        got: u32,
    },

    /// More parts recorded than planned.
    #[error("Part {part_number} exceeds the planned {total_parts} parts")]
    TooManyParts {
        /// Part number that was offered
        part_number: u32,
        /// Planned part count
        total_parts: u32,
    },

    /// Transition not allowed from the current status.
    #[error("Cannot move upload session from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status
        from: SessionStatus,
        /// Requested status
        to: SessionStatus,
    },
}

/// Mutable state of one multipart upload.
///
/// `completed_parts` is strictly increasing by part number, never longer than
/// `total_parts`, and free of duplicates. [`SessionState::record_part`]
/// enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    resource_type: ResourceType,
    resource_id: Option<String>,
    upload_id: Option<String>,
    total_parts: u32,
    part_size: u64,
    completed_parts: Vec<CompletedPart>,
    bytes_uploaded: u64,
    status: SessionStatus,
}

impl SessionState {
    /// Plan a session. `resource_id` may be `None` until the backend assigns one.
    pub fn new(
        resource_type: ResourceType,
        resource_id: Option<String>,
        total_parts: u32,
        part_size: u64,
    ) -> Self {
        Self {
            resource_type,
            resource_id,
            upload_id: None,
            total_parts,
            part_size,
            completed_parts: Vec::with_capacity(total_parts as usize),
            bytes_uploaded: 0,
            status: SessionStatus::Created,
        }
    }

    /// Record the backend-assigned upload id and move to `AwaitingParts`.
    ///
    /// `assigned_id` fills in the resource id when none was supplied up front.
    pub fn open(
        &mut self,
        upload_id: impl Into<String>,
        assigned_id: Option<String>,
    ) -> Result<(), SessionStateError> {
        self.transition(SessionStatus::Created, SessionStatus::AwaitingParts)?;
        self.upload_id = Some(upload_id.into());
        if self.resource_id.is_none() {
            self.resource_id = assigned_id;
        }
        Ok(())
    }

    /// Append a completed part of `size` bytes.
    pub fn record_part(&mut self, part: CompletedPart, size: u64) -> Result<(), SessionStateError> {
        if self.status != SessionStatus::AwaitingParts {
            return Err(SessionStateError::InvalidTransition {
                from: self.status,
                to: SessionStatus::AwaitingParts,
            });
        }
        if part.part_number > self.total_parts {
            return Err(SessionStateError::TooManyParts {
                part_number: part.part_number,
                total_parts: self.total_parts,
            });
        }
        let expected = self.next_part_number();
        if part.part_number != expected {
            return Err(SessionStateError::OutOfOrder {
                expected,
                got: part.part_number,
            });
        }
        self.completed_parts.push(part);
        self.bytes_uploaded += size;
        Ok(())
    }

    /// Move to `Completing`. Every planned part must be recorded.
    pub fn begin_completing(&mut self) -> Result<(), SessionStateError> {
        if !self.all_parts_uploaded() {
            return Err(SessionStateError::InvalidTransition {
                from: self.status,
                to: SessionStatus::Completing,
            });
        }
        self.transition(SessionStatus::AwaitingParts, SessionStatus::Completing)
    }

    /// Move to `Done`.
    pub fn finish(&mut self) -> Result<(), SessionStateError> {
        self.transition(SessionStatus::Completing, SessionStatus::Done)
    }

    /// Move to `Failed` from `AwaitingParts` or `Completing`.
    ///
    /// A session that was never opened stays `Created`; a terminal one is left untouched.
    pub fn fail(&mut self) {
        if matches!(
            self.status,
            SessionStatus::AwaitingParts | SessionStatus::Completing
        ) {
            self.status = SessionStatus::Failed;
        }
    }

    fn transition(
        &mut self,
        from: SessionStatus,
        to: SessionStatus,
    ) -> Result<(), SessionStateError> {
        if self.status != from {
            return Err(SessionStateError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Part number the session expects next.
    #[allow(clippy::cast_possible_truncation)] // Bounded by total_parts
    pub fn next_part_number(&self) -> u32 {
        self.completed_parts.len() as u32 + 1
    }

    /// Whether every planned part has a completed entry.
    pub fn all_parts_uploaded(&self) -> bool {
        self.completed_parts.len() == self.total_parts as usize
    }

    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    pub const fn total_parts(&self) -> u32 {
        self.total_parts
    }

    pub const fn part_size(&self) -> u64 {
        self.part_size
    }

    pub fn completed_parts(&self) -> &[CompletedPart] {
        &self.completed_parts
    }

    pub const fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded
    }

    pub const fn status(&self) -> SessionStatus {
        self.status
    }
}
