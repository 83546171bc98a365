//! Shared primitives and traits for the phipsi workspace.
//!
//! - **Error types** — [`PhipsiError`] and [`Result`] for structured error handling
//! - **Traits** — [`Summarizable`], [`ContentAddressable`]
//! - **Hashing** — SHA-256 content addressing in [`hash`]

pub mod error;
pub mod hash;
pub mod traits;

pub use error::{PhipsiError, Result};
pub use traits::*;
