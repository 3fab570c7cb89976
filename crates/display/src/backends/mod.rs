//! Built-in surface backends.

mod memory;
mod null;

pub use memory::{MemorySurface, PresentedFrame};
pub use null::NullSurface;
