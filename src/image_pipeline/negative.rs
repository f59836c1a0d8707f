//! DNG negative construction
//!
//! Turns decoded sensor data into the metadata a DNG file carries alongside the pixels.

mod builder;
pub mod types;

pub use builder::NegativeBuilder;
pub use types::{DngNegative, RawLayout};
