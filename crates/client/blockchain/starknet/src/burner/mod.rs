//! Burner (ephemeral) account management.

mod manager;
mod store;

pub use manager::{BurnerAccountSource, StarknetBurnerManager};
pub use store::{BurnerRecord, BurnerStore};
