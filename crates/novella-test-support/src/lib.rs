//! Shared test fixtures and utilities for the Novella content engine.

mod flags;
mod scenes;

pub use flags::flag_set;
pub use scenes::{ChoiceFixture, SceneFixture};
