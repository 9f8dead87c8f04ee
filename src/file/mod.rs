//! Bounds-checked access to raw byte buffers.
//!
//! - [`io`] - little-endian decoding of primitive values
//! - [`parser`] - the cursor based [`parser::Parser`] used by the instruction decoder and the
//!   method header reader

pub mod io;
pub mod parser;
