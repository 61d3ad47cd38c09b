mod error;
mod handlers;
mod router;
mod serve;
mod types;

pub use serve::serve;
pub use types::AppState;
