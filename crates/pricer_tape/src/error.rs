//! Tape error types.

use thiserror::Error;

/// Errors raised by the recording protocol.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeError {
    /// A recording scope is already open on this tape.
    #[error("A recording is already in progress on this tape")]
    RecordingInProgress,
}
