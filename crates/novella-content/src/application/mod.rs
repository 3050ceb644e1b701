//! Application layer for the Content Authoring context.

pub mod choice_compiler;
pub mod loader;
pub mod scene_converter;
