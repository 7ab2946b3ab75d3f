//! Learner daemon orchestration.
//!
//! Each episode lists units newer than the buffer's cursor, backward-fills
//! them into the buffer, then decides what to do with the result.
//!
//! ## Episode
//!
//! 1. **List** — unit names newer than the cursor
//! 2. **Ingest** — backward-fill into the replay buffer
//! 3. **Decide** — [`Decision::Train`], [`Decision::Bootstrap`], or [`Decision::Idle`]
//! 4. **Act** — train and publish, publish the untrained model, or sleep
//!
//! ## Core Types
//!
//! - [`Config`] — command line and environment settings
//! - [`Mode`] — `run` or `status`
//! - [`Orchestrator`] — owns the buffer and drives episodes
//! - [`Fault`] — anything that ends an episode early
mod config;
mod decision;
mod fault;
mod mode;
mod orchestrator;
mod status;

pub use config::*;
pub use decision::*;
pub use fault::*;
pub use mode::*;
pub use orchestrator::*;
pub use status::*;
