//! Command selection and wiring of the concrete collaborators.
use super::*;
use clap::Parser;
use lrn_pg::Evaluations;
use lrn_pg::MemoryEvaluations;
use lrn_pg::ModelRegistry;
use lrn_pg::Registry;
use lrn_replay::ReplayBuffer;
use lrn_store::ObjectStore;
use lrn_store::SampleSource;
use lrn_trainer::LinearModel;
use lrn_trainer::LinearTrainer;
use std::sync::Arc;

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::Subcommand)]
pub enum Mode {
    /// Run the episode loop until interrupted.
    #[default]
    Run,
    /// Print registry, store, and snapshot counts, then exit.
    Status,
}

impl Mode {
    /// Parses [`Config`] from the command line and environment, then runs the selected mode.
    pub async fn run() -> anyhow::Result<()> {
        let config = Config::parse();
        let store = lrn_store::open(&config.store).await?;
        let evaluations = Self::evaluations(&config).await?;
        let buffer = match config.snapshot {
            Some(ref path) => ReplayBuffer::load(path, config.max_length)?,
            None => None,
        };
        match config.mode.unwrap_or_default() {
            Self::Status => {
                let source = SampleSource::from(store);
                Status::gather(&evaluations, &source, buffer.as_ref())
                    .await?
                    .log();
                Ok(())
            }
            Self::Run => {
                let buffer = buffer.unwrap_or_else(|| ReplayBuffer::new(config.max_length));
                let registry = ModelRegistry::new(evaluations, store.clone());
                let trainer = resume(&registry, config.learning_rate, config.weight_decay).await?;
                Ok(Self::orchestrator(&config, store, registry, trainer, buffer)
                    .run()
                    .await?)
            }
        }
    }

    async fn evaluations(config: &Config) -> anyhow::Result<Arc<dyn Evaluations>> {
        match config.db_url {
            Some(ref url) => {
                let client: Arc<dyn Evaluations> = lrn_pg::db(url).await?;
                Ok(client)
            }
            None => {
                log::warn!("no DB_URL set, recording published models in memory only");
                let rows: Arc<dyn Evaluations> = Arc::new(MemoryEvaluations::default());
                Ok(rows)
            }
        }
    }

    fn orchestrator(
        config: &Config,
        store: Arc<dyn ObjectStore>,
        registry: ModelRegistry<Arc<dyn Evaluations>, Arc<dyn ObjectStore>>,
        trainer: LinearTrainer,
        buffer: ReplayBuffer,
    ) -> Orchestrator<
        SampleSource<Arc<dyn ObjectStore>>,
        ModelRegistry<Arc<dyn Evaluations>, Arc<dyn ObjectStore>>,
        LinearTrainer,
    > {
        let orchestrator = Orchestrator::new(
            SampleSource::from(store),
            registry,
            trainer,
            buffer,
        )
        .epochs(config.epochs)
        .idle(config.idle())
        .gate(config.gate);
        match config.snapshot {
            Some(ref path) => orchestrator.snapshot(path.clone()),
            None => orchestrator,
        }
    }
}

/// Seeds a [`LinearTrainer`] with the newest published weights, or zeros
/// when nothing usable has been published.
pub async fn resume<R: Registry>(
    registry: &R,
    learning_rate: lrn_core::Scalar,
    weight_decay: lrn_core::Scalar,
) -> Result<LinearTrainer, Fault> {
    let model = match registry.latest().await? {
        Some((name, bytes)) => match lrn_trainer::decode(&bytes) {
            Ok(model) => {
                log::info!("{:<32}{:<32}", "resuming from model", name);
                model
            }
            Err(e) => {
                log::warn!("ignoring model {}: {}", name, e);
                LinearModel::default()
            }
        },
        None => LinearModel::default(),
    };
    Ok(LinearTrainer::resume(model, learning_rate, weight_decay))
}
