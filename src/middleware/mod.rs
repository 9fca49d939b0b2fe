mod auth;
mod logging;
mod recovery;

pub use auth::*;
pub use logging::add_tracing;
pub use recovery::{handle_panic, not_found};
