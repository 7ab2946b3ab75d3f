use super::*;
use lrn_pg::Registry;
use lrn_replay::ReplayBuffer;
use lrn_store::Units;
use lrn_trainer::Trainer;
use std::path::PathBuf;
use std::time::Duration;

/// Owns the replay buffer and drives the episode loop against a unit
/// source, a model registry, and a trainer.
pub struct Orchestrator<U, R, T> {
    source: U,
    registry: R,
    trainer: T,
    buffer: ReplayBuffer,
    epochs: usize,
    idle: Duration,
    gate: TrainGate,
    snapshot: Option<PathBuf>,
}

impl<U, R, T> Orchestrator<U, R, T>
where
    U: Units,
    R: Registry,
    T: Trainer,
{
    pub fn new(source: U, registry: R, trainer: T, buffer: ReplayBuffer) -> Self {
        Self {
            source,
            registry,
            trainer,
            buffer,
            epochs: lrn_core::DEFAULT_EPOCHS,
            idle: Duration::from_secs(lrn_core::DEFAULT_IDLE_SECS),
            gate: TrainGate::default(),
            snapshot: None,
        }
    }
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }
    pub fn idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }
    pub fn gate(mut self, gate: TrainGate) -> Self {
        self.gate = gate;
        self
    }
    /// Saves the buffer to `path` after episodes that moved the cursor, and on exit.
    pub fn snapshot(mut self, path: PathBuf) -> Self {
        self.snapshot = Some(path);
        self
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }
    pub fn registry(&self) -> &R {
        &self.registry
    }
    pub fn trainer(&self) -> &T {
        &self.trainer
    }

    /// Runs episodes until a graceful interrupt or the first fault.
    pub async fn run(mut self) -> Result<(), Fault> {
        log::info!("starting learner");
        log::info!("press 'Q + ↵' to stop gracefully");
        loop {
            self.episode().await?;
            if lrn_core::interrupted() {
                break;
            }
        }
        self.save()?;
        log::info!("{:<32}{:<32}", "learner stopped", self.cursor());
        Ok(())
    }

    /// One pass of list, ingest, decide, act.
    pub async fn episode(&mut self) -> Result<Decision, Fault> {
        let before = self.buffer.cursor().map(str::to_string);
        let units = self
            .source
            .list_new(before.as_deref())
            .await
            .map_err(Fault::Listing)?;
        log::debug!("{:<32}{:<32}", "listed new units", units.len());
        self.buffer.ingest(&self.source, &units).await?;
        let decision = self.decide().await?;
        log::info!(
            "{:<32}{:<32}",
            format!("episode: {}", decision),
            format!("{} / {} samples", self.buffer.len(), self.buffer.max_length())
        );
        match decision {
            Decision::Train => {
                self.trainer.train(self.buffer.contiguous(), self.epochs);
                self.publish().await?;
            }
            Decision::Bootstrap => {
                self.publish().await?;
            }
            Decision::Idle => {
                tokio::time::sleep(self.idle).await;
            }
        }
        if self.buffer.cursor() != before.as_deref() {
            self.save()?;
        }
        Ok(decision)
    }

    async fn decide(&self) -> Result<Decision, Fault> {
        if self.gate.admits(&self.buffer) {
            Ok(Decision::Train)
        } else if !self.registry.exists().await? {
            Ok(Decision::Bootstrap)
        } else {
            Ok(Decision::Idle)
        }
    }

    async fn publish(&self) -> Result<(), Fault> {
        let artifact = self.trainer.servable();
        self.registry.publish(artifact, self.trainer.kind()).await?;
        Ok(())
    }

    fn save(&self) -> Result<(), Fault> {
        match self.snapshot {
            Some(ref path) => Ok(self.buffer.save(path)?),
            None => Ok(()),
        }
    }

    fn cursor(&self) -> String {
        self.buffer.cursor().unwrap_or("(none)").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrn_pg::MemoryEvaluations;
    use lrn_pg::ModelRegistry;
    use lrn_replay::Batch;
    use lrn_replay::Sample;
    use lrn_store::MemoryStore;
    use lrn_store::SampleSource;
    use lrn_trainer::Losses;
    use std::sync::Arc;

    type Store = Arc<MemoryStore>;
    type Models = ModelRegistry<Arc<MemoryEvaluations>, Store>;

    /// Counts calls and publishes a fixed artifact.
    #[derive(Default)]
    struct Counting {
        trained: Vec<usize>,
    }

    impl Trainer for Counting {
        fn kind(&self) -> &'static str {
            "counting"
        }
        fn train(&mut self, samples: &[Sample], _: usize) -> Losses {
            self.trained.push(samples.len());
            Losses::default()
        }
        fn servable(&self) -> Vec<u8> {
            vec![self.trained.len() as u8]
        }
    }

    fn unit(store: &MemoryStore, name: &str, n: usize) {
        let body = Batch::from(vec![Sample::default(); n]).table();
        store.insert(format!("sample/{}.bz2", name), lrn_store::pack(body.as_bytes()));
    }

    fn orchestrator(
        store: &Store,
        published: usize,
        max_length: usize,
    ) -> Orchestrator<SampleSource<Store>, Models, Counting> {
        Orchestrator::new(
            SampleSource::from(store.clone()),
            ModelRegistry::new(Arc::new(MemoryEvaluations::with(published)), store.clone()),
            Counting::default(),
            ReplayBuffer::new(max_length),
        )
        .idle(Duration::from_millis(1))
        .epochs(2)
    }

    fn weights(store: &MemoryStore) -> usize {
        store.keys().iter().filter(|k| k.starts_with("weights/")).count()
    }

    #[tokio::test]
    async fn empty_store_bootstraps_exactly_once() {
        let store = Store::default();
        let mut learner = orchestrator(&store, 0, 10);
        assert_eq!(learner.episode().await.unwrap(), Decision::Bootstrap);
        assert_eq!(learner.episode().await.unwrap(), Decision::Idle);
        assert_eq!(learner.episode().await.unwrap(), Decision::Idle);
        assert_eq!(weights(&store), 1);
        assert_eq!(learner.registry().evaluations().names().len(), 1);
        assert!(learner.trainer().trained.is_empty());
    }

    #[tokio::test]
    async fn idle_neither_trains_nor_publishes() {
        let store = Store::default();
        let mut learner = orchestrator(&store, 1, 10);
        assert_eq!(learner.episode().await.unwrap(), Decision::Idle);
        assert_eq!(weights(&store), 0);
        assert_eq!(learner.registry().evaluations().names().len(), 1);
        assert!(learner.trainer().trained.is_empty());
    }

    #[tokio::test]
    async fn data_trains_whether_or_not_a_model_exists() {
        for published in [0, 3] {
            let store = Store::default();
            unit(&store, "01A", 4);
            let mut learner = orchestrator(&store, published, 10);
            assert_eq!(learner.episode().await.unwrap(), Decision::Train);
            assert_eq!(learner.trainer().trained, vec![4]);
            assert_eq!(weights(&store), 1);
            assert_eq!(learner.buffer().cursor(), Some("01A"));
        }
    }

    #[tokio::test]
    async fn retained_window_keeps_training_without_new_units() {
        let store = Store::default();
        unit(&store, "01A", 4);
        let mut learner = orchestrator(&store, 0, 10);
        learner.episode().await.unwrap();
        // the new unit evicts its own size before appending
        unit(&store, "01B", 3);
        learner.episode().await.unwrap();
        learner.episode().await.unwrap();
        assert_eq!(learner.trainer().trained, vec![4, 4, 4]);
        assert_eq!(learner.buffer().cursor(), Some("01B"));
        assert_eq!(weights(&store), 3);
    }

    #[tokio::test]
    async fn full_gate_waits_for_a_full_window() {
        let store = Store::default();
        unit(&store, "01A", 4);
        let mut learner = orchestrator(&store, 0, 6).gate(TrainGate::Full);
        assert_eq!(learner.episode().await.unwrap(), Decision::Bootstrap);
        assert_eq!(learner.episode().await.unwrap(), Decision::Idle);
        unit(&store, "01B", 6);
        assert_eq!(learner.episode().await.unwrap(), Decision::Train);
        assert_eq!(learner.trainer().trained, vec![6]);
    }

    #[tokio::test]
    async fn failed_download_ends_the_episode() {
        let store = Store::default();
        unit(&store, "01A", 4);
        store.fail("sample/01A.bz2");
        let mut learner = orchestrator(&store, 0, 10);
        assert!(matches!(learner.episode().await, Err(Fault::Ingest(_))));
        assert!(learner.buffer().is_empty());
        assert_eq!(weights(&store), 0);
    }

    #[tokio::test]
    async fn failed_listing_ends_the_episode() {
        let store = Store::default();
        unit(&store, "01A", 4);
        store.fail("sample/");
        let mut learner = orchestrator(&store, 0, 10);
        assert!(matches!(learner.episode().await, Err(Fault::Listing(_))));
        assert!(learner.buffer().is_empty());
        assert_eq!(learner.buffer().cursor(), None);
        assert_eq!(weights(&store), 0);
    }

    #[tokio::test]
    async fn registry_outage_surfaces_as_fault() {
        let store = Store::default();
        let mut learner = orchestrator(&store, 0, 10);
        learner.registry().evaluations().outage();
        assert!(matches!(learner.episode().await, Err(Fault::Registry(_))));
    }

    #[tokio::test]
    async fn snapshot_follows_the_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buffer.bin");
        let store = Store::default();
        let mut learner = orchestrator(&store, 1, 10).snapshot(path.clone());
        learner.episode().await.unwrap();
        assert!(!path.exists());
        unit(&store, "01A", 4);
        learner.episode().await.unwrap();
        let saved = ReplayBuffer::load(&path, 10).unwrap().unwrap();
        assert_eq!(saved.cursor(), Some("01A"));
        assert_eq!(saved.len(), 4);
    }
}
