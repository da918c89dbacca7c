//! Operations that talk to the API.
//!
//! Every function here goes through a [`Client`](bodylabs_transport::Client).

mod artifact;
mod file;
mod guard;
mod poll;
mod resource;
mod scan;

pub use artifact::Artifact;
pub use file::File;
pub use guard::with_timeout;
pub use poll::poll_until_ready;
pub use resource::Resource;
pub use scan::Scan;
