use core::fmt;
use std::error::Error;
use std::io;

use crate::backend::SurfaceError;
use crate::compositor::RunState;

/// Errors reported by the display compositor.
#[derive(Debug)]
pub enum DisplayError {
    /// The call is not allowed in the compositor's current state.
    InvalidState {
        /// The operation attempted.
        operation: &'static str,
        /// The state the compositor was in.
        state: RunState,
    },
    /// The output surface failed.
    Surface(SurfaceError),
    /// The frame loop thread could not be started.
    Spawn(io::Error),
    /// The frame loop thread panicked.
    LoopPanicked,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { operation, state } => {
                write!(formatter, "Cannot {operation} while the display is {state:?}")
            }
            Self::Surface(err) => write!(formatter, "Surface error: {err}"),
            Self::Spawn(err) => write!(formatter, "Failed to spawn the display thread: {err}"),
            Self::LoopPanicked => write!(formatter, "The display thread panicked"),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Surface(err) => Some(err),
            Self::Spawn(err) => Some(err),
            Self::InvalidState { .. } | Self::LoopPanicked => None,
        }
    }
}

impl From<SurfaceError> for DisplayError {
    fn from(err: SurfaceError) -> Self {
        Self::Surface(err)
    }
}
