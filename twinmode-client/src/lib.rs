// twinmode-client/src/lib.rs

/*!
# Twinmode Client

Client for the ROT-13 transform service. `TransformClient::create` talks HTTP
to a running service; `TransformClient::create_null` answers from a script of
stubbed outcomes so request handlers can be tested without a network.

## Key Components:
- **TransformClient:** `invoke(port, text)` returns an `OperationHandle`.
- **OperationHandle:** the pending response plus a `CancelHandle`.
- **StubbedOutcome:** success, error, or hang for each null call.
- **OperationRecord:** what `track_calls` observes.
*/

pub mod client;
pub mod error;
mod http;
pub mod stubbed;
pub mod wire;

pub use client::{CancelHandle, OperationHandle, OperationRecord, TransformClient};
pub use error::OperationError;
pub use stubbed::{StubbedOutcome, DEFAULT_RESPONSE};
