//! Types shared by the dip-claimer crates

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
