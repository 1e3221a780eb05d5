//! Host abstraction layer
//!
//! Provides the traits and types the pipeline uses to talk to its host engine,
//! plus an in-memory recording host for tests and tooling.

pub mod recording;
pub mod traits;
pub mod types;

pub use recording::RecordingHost;
pub use traits::*;
pub use types::*;
