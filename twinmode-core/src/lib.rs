//! # twinmode-core
//!
//! Infrastructure primitives shared by every twinmode component.
//!
//! ### Key Submodules:
//! - `time`: `Clock` with a live (tokio) and a null (logical, test-driven) mode
//! - `tracking`: `OutputListener` / `OutputTracker` for observing side effects
//! - `error`: `ClockError`

pub mod error;
pub mod time;
pub mod tracking;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::time::*;
    pub use crate::tracking::*;
}

pub use error::ClockError;
pub use time::{Clock, TimerHandle};
pub use tracking::{OutputListener, OutputTracker};
