//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (model artifact, storage).

mod classifier;
mod record_store;

pub use classifier::{Classifier, InferenceError};
pub use record_store::RecordStore;
