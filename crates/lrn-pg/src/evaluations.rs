use super::*;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Evaluations defines the registry's row-level interface.
/// All queries against the model tables are consolidated here.
#[async_trait::async_trait]
pub trait Evaluations: Send + Sync {
    /// Number of published models.
    async fn count(&self) -> Result<usize, RegistryError>;
    /// Records a published model and its architecture tag in one statement.
    async fn insert(&self, name: &str, kind: &str) -> Result<(), RegistryError>;
}

#[async_trait::async_trait]
impl Evaluations for Client {
    async fn count(&self) -> Result<usize, RegistryError> {
        #[rustfmt::skip]
        const SQL: &str = const_format::concatcp!(
            "SELECT COUNT(*) FROM ", EVALUATION
        );
        let row = self.query_one(SQL, &[]).await?;
        Ok(row.get::<_, i64>(0) as usize)
    }
    async fn insert(&self, name: &str, kind: &str) -> Result<(), RegistryError> {
        #[rustfmt::skip]
        const SQL: &str = const_format::concatcp!(
            "WITH e AS (",
                "INSERT INTO ", EVALUATION, " (name, total_reward, total_count) ",
                "VALUES                      ($1,   0,            0) ",
            ") ",
            "INSERT INTO ", NETWORK, " (name, type) ",
            "VALUES                   ($1,   $2)"
        );
        self.execute(SQL, &[&name, &kind]).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<E> Evaluations for Arc<E>
where
    E: Evaluations + ?Sized,
{
    async fn count(&self) -> Result<usize, RegistryError> {
        self.as_ref().count().await
    }
    async fn insert(&self, name: &str, kind: &str) -> Result<(), RegistryError> {
        self.as_ref().insert(name, kind).await
    }
}

/// In-process registry rows. Stands in for the database in tests and
/// `memory:` dry runs.
#[derive(Debug, Default)]
pub struct MemoryEvaluations {
    rows: Mutex<Vec<(String, String)>>,
    down: AtomicBool,
}

impl MemoryEvaluations {
    /// Starts with `n` anonymous models already published.
    pub fn with(n: usize) -> Self {
        let this = Self::default();
        for i in 0..n {
            this.rows().push((format!("seed-{}", i), "seed".to_string()));
        }
        this
    }
    /// Makes every later call fail until [`MemoryEvaluations::restore`].
    pub fn outage(&self) {
        self.down.store(true, Ordering::Relaxed);
    }
    pub fn restore(&self) {
        self.down.store(false, Ordering::Relaxed);
    }
    /// Recorded `(name, kind)` pairs in insertion order.
    pub fn names(&self) -> Vec<(String, String)> {
        self.rows().clone()
    }
    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<(String, String)>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
    fn check(&self) -> Result<(), RegistryError> {
        match self.down.load(Ordering::Relaxed) {
            true => Err(RegistryError::Unavailable("simulated outage".to_string())),
            false => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl Evaluations for MemoryEvaluations {
    async fn count(&self) -> Result<usize, RegistryError> {
        self.check()?;
        Ok(self.rows().len())
    }
    async fn insert(&self, name: &str, kind: &str) -> Result<(), RegistryError> {
        self.check()?;
        self.rows().push((name.to_string(), kind.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_rows_count_and_fail() {
        let rows = MemoryEvaluations::with(2);
        assert_eq!(rows.count().await.unwrap(), 2);
        rows.insert("abc", "linear").await.unwrap();
        assert_eq!(rows.count().await.unwrap(), 3);
        rows.outage();
        assert!(matches!(rows.count().await, Err(RegistryError::Unavailable(_))));
        assert!(rows.insert("def", "linear").await.is_err());
        rows.restore();
        assert_eq!(rows.names().last(), Some(&("abc".to_string(), "linear".to_string())));
    }
}
