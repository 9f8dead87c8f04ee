//! Method level metadata: header parsing and attribute flags.
//!
//! # Key Types
//! - [`MethodBody`] - A parsed tiny or fat method header, locating the instruction stream
//! - [`MethodAccessFlags`] / [`MethodModifiers`] - Member attributes (visibility, static, ...)

mod body;
mod types;

pub use body::MethodBody;
pub use types::*;
