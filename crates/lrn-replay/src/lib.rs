//! Bounded replay buffer fed by backward-fill ingestion.
//!
//! The buffer is the training window: an oldest-first run of samples capped
//! at `max_length`, plus the name of the newest unit ingested so far.
//!
//! ## Core Types
//!
//! - [`Sample`] — one (state, policy, value) triple
//! - [`Batch`] — the decoded samples of one unit
//! - [`ReplayBuffer`] — the window and its cursor
//! - [`Ingested`] — what one backward-fill walk did
//!
//! ## Ingestion
//!
//! [`ReplayBuffer::ingest`] walks newly listed units from newest to oldest,
//! stopping once it has read a full window, then commits them oldest first.
//!
//! ## Persistence
//!
//! [`ReplayBuffer::save`] and [`ReplayBuffer::load`] keep the window and cursor
//! across restarts in a small big-endian binary file.
mod batch;
mod buffer;
mod error;
mod ingest;
mod sample;
mod snapshot;

pub use batch::*;
pub use buffer::*;
pub use error::*;
pub use ingest::*;
pub use sample::*;
pub use snapshot::*;
