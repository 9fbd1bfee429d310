//! Local persistence for resume documents.
//!
//! `ResumeStore` is the backend contract. `SaveScheduler` sits in front of it
//! and turns bursts of edits into a single debounced write.

pub mod backend;
pub mod filesystem;
#[cfg(test)]
pub mod memory;
pub mod scheduler;

pub use backend::{ResumeStore, StoreError};
pub use filesystem::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;
pub use scheduler::{SaveScheduler, SaveStatus};
