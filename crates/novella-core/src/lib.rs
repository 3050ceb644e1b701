//! Novella Core — shared content abstractions.
//!
//! This crate defines the error type and the chapter/scene id rules that
//! every other crate depends on. It contains no I/O.

pub mod error;
pub mod ids;
