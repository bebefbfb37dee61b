//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod health;
mod key_value;
mod mood_sync;

pub use health::HealthSampleSource;
pub use key_value::KeyValueStore;
pub use mood_sync::{LifestyleEntry, MoodSyncEndpoint};
