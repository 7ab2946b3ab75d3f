use super::*;
use lrn_core::*;
use lrn_store::ObjectStore;

/// Where trained artifacts are published and how the daemon learns
/// whether any exist yet.
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Whether at least one model has been published.
    async fn exists(&self) -> Result<bool, RegistryError>;
    /// Uploads `artifact` under a fresh name and records it. Returns the name.
    async fn publish(&self, artifact: Vec<u8>, kind: &str) -> Result<Name, RegistryError>;
    /// Name and bytes of the most recently published artifact, if any.
    async fn latest(&self) -> Result<Option<(Name, Vec<u8>)>, RegistryError>;
}

/// [`Registry`] that stores artifacts as `weights/<uuid v7>` blobs and
/// records one [`Evaluation`] row per artifact.
pub struct ModelRegistry<E, S> {
    evaluations: E,
    store: S,
}

impl<E, S> ModelRegistry<E, S>
where
    E: Evaluations,
    S: ObjectStore,
{
    pub fn new(evaluations: E, store: S) -> Self {
        Self { evaluations, store }
    }
    pub fn evaluations(&self) -> &E {
        &self.evaluations
    }
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Store key of a published model.
pub fn model_key(name: &str) -> String {
    format!("{}{}", MODEL_PREFIX, name)
}

#[async_trait::async_trait]
impl<E, S> Registry for ModelRegistry<E, S>
where
    E: Evaluations,
    S: ObjectStore,
{
    async fn exists(&self) -> Result<bool, RegistryError> {
        Ok(self.evaluations.count().await? > 0)
    }
    async fn publish(&self, artifact: Vec<u8>, kind: &str) -> Result<Name, RegistryError> {
        let name = uuid::Uuid::now_v7().to_string();
        let size = artifact.len();
        self.store.put(&model_key(&name), artifact).await?;
        self.evaluations.insert(&name, kind).await?;
        log::info!(
            "{:<32}{:<32}",
            "published model",
            format!("{} ({} bytes)", name, commas(size))
        );
        Ok(name)
    }
    async fn latest(&self) -> Result<Option<(Name, Vec<u8>)>, RegistryError> {
        // uuid v7 names sort by creation time
        match self.store.list(MODEL_PREFIX, None).await?.pop() {
            Some(key) => {
                let bytes = self.store.get(&key).await?;
                let name = key.trim_start_matches(MODEL_PREFIX).to_string();
                Ok(Some((name, bytes)))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrn_store::MemoryStore;

    fn registry(seeded: usize) -> ModelRegistry<Arc<MemoryEvaluations>, Arc<MemoryStore>> {
        ModelRegistry::new(
            Arc::new(MemoryEvaluations::with(seeded)),
            Arc::new(MemoryStore::default()),
        )
    }

    #[tokio::test]
    async fn exists_follows_row_count() {
        assert!(!registry(0).exists().await.unwrap());
        assert!(registry(1).exists().await.unwrap());
    }

    #[tokio::test]
    async fn publish_uploads_then_records_one_row() {
        let registry = registry(0);
        let name = registry.publish(vec![1, 2, 3], "linear").await.unwrap();
        assert!(registry.exists().await.unwrap());
        assert_eq!(registry.store().keys(), vec![format!("weights/{}", name)]);
        assert_eq!(
            registry.evaluations().names(),
            vec![(name.clone(), "linear".to_string())]
        );
        assert_eq!(
            registry.store().get(&model_key(&name)).await.unwrap(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn names_are_unique() {
        let registry = registry(0);
        let a = registry.publish(vec![], "linear").await.unwrap();
        let b = registry.publish(vec![], "linear").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.evaluations().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn latest_is_the_last_published() {
        let registry = registry(0);
        assert!(registry.latest().await.unwrap().is_none());
        registry.publish(vec![1], "linear").await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let name = registry.publish(vec![2], "linear").await.unwrap();
        assert_eq!(registry.latest().await.unwrap(), Some((name, vec![2])));
    }

    #[tokio::test]
    async fn failed_insert_surfaces_as_registry_error() {
        let registry = registry(0);
        registry.evaluations().outage();
        assert!(matches!(
            registry.publish(vec![0], "linear").await,
            Err(RegistryError::Unavailable(_))
        ));
        registry.evaluations().restore();
        assert!(!registry.exists().await.unwrap());
    }
}
