//! carfetch command-line front end.

pub mod config;
pub mod repl;
#[cfg(feature = "serve")]
pub mod serve;

pub use config::{resolve_base_url, Settings};
