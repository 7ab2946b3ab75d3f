//! Replay-buffer learner for a self-play reinforcement-learning pipeline.
//!
//! This facade crate re-exports all public lrn crates for convenient access.
//!
//! ## Crate Organization
//!
//! - [`core`] — Type aliases, sample shape, defaults, runtime utilities
//! - [`store`] — Object stores and the sample unit source
//! - [`replay`] — Samples, the replay buffer, backward-fill ingestion, snapshots
//! - [`pg`] — PostgreSQL model registry
//! - [`trainer`] — Trainer interface and the reference linear model
//! - [`autotrain`] — Configuration and the episode loop

pub use lrn_core      as core;
pub use lrn_store     as store;
pub use lrn_replay    as replay;
pub use lrn_pg        as pg;
pub use lrn_trainer   as trainer;
pub use lrn_autotrain as autotrain;
