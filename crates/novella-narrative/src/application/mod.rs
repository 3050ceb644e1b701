//! Application layer for the Narrative context.

pub mod query_handlers;
