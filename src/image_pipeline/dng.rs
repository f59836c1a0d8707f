//! DNG writing module
//!
//! Serializes a negative, its raw pixels and the rendered previews into a DNG container.

mod writer;
mod standard_dng_writer;
pub mod tags;

pub use writer::DngWriter;
pub use standard_dng_writer::StandardDngWriter;
