//! Pure helpers: error classification and small inferences.

mod contents;
mod file_type;
mod timeout;

pub use contents::map_contents_error;
pub use file_type::infer_file_type;
pub use timeout::TimeoutError;
