//! The subset of ECMA-335 metadata needed to describe search candidates.
//!
//! - [`token`] - metadata tokens identifying type and method definitions
//! - [`method`] - method header parsing and member attribute flags

pub mod method;
pub mod token;
