//! Frame Graph System
//!
//! Passes record named command buffers in a fixed order; the executor hands
//! them to the host and scopes temporary render targets to the frame.

pub mod command;
pub mod executor;
pub mod graph;
pub mod pass;
pub mod resource;

pub use command::*;
pub use executor::*;
pub use graph::*;
pub use pass::*;
pub use resource::*;
