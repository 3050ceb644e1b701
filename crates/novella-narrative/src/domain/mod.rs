//! Domain model for the Narrative context.

pub mod choice_views;
pub mod registry;
