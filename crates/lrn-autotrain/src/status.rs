use lrn_core::*;
use lrn_pg::Evaluations;
use lrn_replay::ReplayBuffer;
use lrn_store::Units;

/// What the learner would start from right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub models: usize,
    pub units: usize,
    pub pending: usize,
    pub samples: usize,
    pub cursor: Option<Name>,
}

impl Status {
    /// Counts published models, stored units, and units newer than the snapshot's cursor.
    pub async fn gather<E, U>(
        evaluations: &E,
        source: &U,
        snapshot: Option<&ReplayBuffer>,
    ) -> anyhow::Result<Self>
    where
        E: Evaluations + ?Sized,
        U: Units + ?Sized,
    {
        let cursor = snapshot.and_then(|b| b.cursor()).map(str::to_string);
        Ok(Self {
            models: evaluations.count().await?,
            units: source.list_new(None).await?.len(),
            pending: source.list_new(cursor.as_deref()).await?.len(),
            samples: snapshot.map_or(0, ReplayBuffer::len),
            cursor,
        })
    }

    pub fn log(&self) {
        let cursor = self.cursor.as_deref().unwrap_or("-");
        log::info!("┌────────────┬────────────────────────────────┐");
        log::info!("│ Models     │ {:>30} │", commas(self.models));
        log::info!("│ Units      │ {:>30} │", commas(self.units));
        log::info!("│ Pending    │ {:>30} │", commas(self.pending));
        log::info!("├────────────┼────────────────────────────────┤");
        log::info!("│ Samples    │ {:>30} │", commas(self.samples));
        log::info!("│ Cursor     │ {:>30} │", cursor);
        log::info!("└────────────┴────────────────────────────────┘");
    }
}
