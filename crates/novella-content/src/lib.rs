//! Novella — Content Authoring bounded context.
//!
//! Responsible for the authored scene format, asset path and speaker
//! normalization, and compilation of raw scenes into the runtime scene graph.

pub mod application;
pub mod domain;
