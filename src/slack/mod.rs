pub mod client;
pub mod events;
pub mod signature;

pub use client::{SlackClient, SlackError};
