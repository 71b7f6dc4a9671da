//! # twinmode-engine
//!
//! The www front end and the ROT-13 service.
//!
//! ### Key Submodules:
//! - `controller`: `HomePageController`, which races the transform call
//!   against a timeout and falls back to fixed text
//! - `form`, `view`, `www`: request parsing, page rendering, and the
//!   request/response types controllers work with
//! - `server`: axum routers for both processes
//! - `runtime`: `run_www` and `run_rot13`

pub mod controller;
pub mod error;
pub mod form;
pub mod rot13;
pub mod runtime;
pub mod server;
pub mod view;
pub mod www;

pub use controller::{Controller, HomePageController};
pub use error::ServerError;
pub use form::{parse_form_field, ParseError};
pub use runtime::{run_rot13, run_www};
pub use view::home_page_view;
pub use www::{RequestContext, WwwRequest, WwwResponse};
