mod error;
mod handlers;
mod helpers;
mod reply;
mod router;
mod types;

pub use reply::ReplySink;
pub use router::handle_request;
pub use types::{AppState, Dispatch, Request};
