//! Built-in game data
//!
//! - Starter quests offered to new profiles

pub mod quests;

pub use quests::{find_starter_quest, starter_quests, starter_quests_in, STARTER_QUESTS};
