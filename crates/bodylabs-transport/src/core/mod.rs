//! Pure helpers for API access.
//!
//! Nothing in this module performs I/O.

mod auth;
mod path;

pub use auth::{API_VERSION_HEADER, authorization_header};
pub use path::{file_name, is_redirect, join_url};
