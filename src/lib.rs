pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod platform;
pub mod store;
pub mod tally;

pub use error::{Error, Result};
pub use platform::Platform;
