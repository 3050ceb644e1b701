//! Domain model for the Content Authoring context.

pub mod assets;
pub mod choice;
pub mod raw;
pub mod scene;
pub mod speakers;
