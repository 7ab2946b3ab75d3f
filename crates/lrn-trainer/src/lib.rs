//! Training collaborators for the learner.
//!
//! The daemon only needs two things from a trainer: fit the current window
//! for some epochs, and hand back bytes that can be published and served.
//!
//! - [`Trainer`] — the interface the orchestrator drives
//! - [`LinearModel`] — softmax policy head plus sigmoid value head over the raw state
//! - [`LinearTrainer`] — full-batch gradient descent on a [`LinearModel`]
//! - [`Losses`] — policy cross-entropy and value squared error
mod artifact;
mod linear;
mod losses;
mod trainer;

pub use artifact::*;
pub use linear::*;
pub use losses::*;
pub use trainer::*;
