//! Novella — Narrative bounded context.
//!
//! Holds converted scenes in chapter namespaces, resolves scene references
//! with deterministic precedence, and evaluates choices against flag state
//! for the rendering layer.

pub mod application;
pub mod domain;
