use super::*;
use lrn_core::*;
use std::path::PathBuf;
use std::time::Duration;

/// Learner daemon settings, from flags or the environment.
#[derive(Debug, Clone, clap::Parser)]
#[command(author, version, about = "Replay-buffer learner daemon", long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub mode: Option<Mode>,
    /// Object store holding `sample/` units and `weights/` artifacts:
    /// `s3://bucket/prefix`, `file:///path`, a bare path, or `memory:`.
    #[arg(long, env = "STORE_URL")]
    pub store: String,
    /// Registry database. Without it, published models are recorded in memory only.
    #[arg(long, env = "DB_URL")]
    pub db_url: Option<String>,
    /// Replay buffer capacity in samples.
    #[arg(long, env = "MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,
    /// Training epochs per published model.
    #[arg(long, env = "EPOCHS", default_value_t = DEFAULT_EPOCHS)]
    pub epochs: usize,
    /// Seconds to sleep when there is nothing to do.
    #[arg(long, env = "IDLE_SECS", default_value_t = DEFAULT_IDLE_SECS)]
    pub idle_secs: u64,
    #[arg(long, env = "LEARNING_RATE", default_value_t = DEFAULT_LEARNING_RATE)]
    pub learning_rate: Scalar,
    #[arg(long, env = "WEIGHT_DECAY", default_value_t = DEFAULT_WEIGHT_DECAY)]
    pub weight_decay: Scalar,
    /// When an episode may train.
    #[arg(long, env = "TRAIN_GATE", value_enum, default_value_t = TrainGate::Any)]
    pub gate: TrainGate,
    /// Persist the buffer and cursor here between runs.
    #[arg(long, env = "SNAPSHOT")]
    pub snapshot: Option<PathBuf>,
}

impl Config {
    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }
}
