use super::*;
use lrn_core::*;
use lrn_store::Units;

/// One visited unit, held on the walk's stack until the unwind commits it.
#[derive(Debug)]
struct Frame {
    unit: Name,
    batch: Batch,
}

/// What one backward-fill walk did to the buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingested {
    /// Units in visit order, newest first.
    pub visited: Vec<Name>,
    /// Samples read across visited units.
    pub read: usize,
    /// Pre-existing samples evicted to make room.
    pub evicted: usize,
}

impl ReplayBuffer {
    /// Backward-fill ingest of `units` (ascending, oldest first).
    ///
    /// Descends from the newest unit towards the oldest, fetching and parsing
    /// each one and evicting its size from the front, and stops recruiting
    /// older units once a full window has been read. The unwind then appends
    /// the visited batches oldest first and advances the cursor to the newest
    /// name visited.
    ///
    /// Every fetch happens before any mutation, so a failed fetch or parse
    /// leaves the buffer and cursor exactly as they were.
    pub async fn ingest<U>(&mut self, source: &U, units: &[Name]) -> Result<Ingested, IngestError>
    where
        U: Units + ?Sized,
    {
        let stack = self.descend(source, units).await?;
        Ok(self.unwind(stack))
    }

    async fn descend<U>(&self, source: &U, units: &[Name]) -> Result<Vec<Frame>, IngestError>
    where
        U: Units + ?Sized,
    {
        let mut stack = Vec::new();
        let mut read = 0;
        for unit in units.iter().rev() {
            let bytes = source
                .fetch(unit)
                .await
                .map_err(|source| IngestError::Transfer {
                    unit: unit.clone(),
                    source,
                })?;
            let batch = Batch::parse(&bytes).map_err(|source| IngestError::Parse {
                unit: unit.clone(),
                source,
            })?;
            read += batch.len();
            log::debug!("{:<32}{:<32}", "parsed unit", format!("{} ({})", unit, batch.len()));
            stack.push(Frame {
                unit: unit.clone(),
                batch,
            });
            if read >= self.max_length() {
                break;
            }
        }
        Ok(stack)
    }

    /// Replays the recursive walk's mutations: every frame's eviction runs on
    /// the way down, before any frame appends on the way back up.
    fn unwind(&mut self, stack: Vec<Frame>) -> Ingested {
        let visited = stack.iter().map(|f| f.unit.clone()).collect::<Vec<_>>();
        let read = stack.iter().map(|f| f.batch.len()).sum::<usize>();
        let evicted = stack
            .iter()
            .map(|f| f.batch.len())
            .map(|k| self.evict(k))
            .sum::<usize>();
        for frame in stack.into_iter().rev() {
            self.append(frame.batch);
            self.advance(&frame.unit);
        }
        if !visited.is_empty() {
            log::info!(
                "{:<32}{:<32}",
                "ingested units",
                format!("{} units, {} read, {} evicted", visited.len(), read, evicted)
            );
        }
        Ingested {
            visited,
            read,
            evicted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrn_store::MemoryStore;
    use lrn_store::SampleSource;
    use lrn_store::TransferError;
    use std::sync::Arc;

    type Source = SampleSource<Arc<MemoryStore>>;

    fn batch(values: std::ops::Range<u32>) -> Batch {
        values
            .map(|v| Sample {
                value: v as Scalar,
                ..Sample::default()
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn source(units: &[(&str, std::ops::Range<u32>)]) -> Source {
        let store = Arc::new(MemoryStore::default());
        for (name, values) in units {
            let body = batch(values.clone()).table();
            store.insert(format!("sample/{}.bz2", name), lrn_store::pack(body.as_bytes()));
        }
        SampleSource::from(store)
    }

    fn names(units: &[&str]) -> Vec<Name> {
        units.iter().map(|s| s.to_string()).collect()
    }

    fn values(buffer: &ReplayBuffer) -> Vec<u32> {
        buffer.iter().map(|s| s.value as u32).collect()
    }

    #[tokio::test]
    async fn empty_listing_is_a_no_op() {
        let source = source(&[("01A", 0..5)]);
        let mut buffer = ReplayBuffer::new(10);
        buffer.ingest(&source, &names(&["01A"])).await.unwrap();
        let before = values(&buffer);
        let ingested = buffer.ingest(&source, &[]).await.unwrap();
        assert_eq!(ingested, Ingested::default());
        assert_eq!(values(&buffer), before);
        assert_eq!(buffer.cursor(), Some("01A"));
    }

    #[tokio::test]
    async fn full_buffer_makes_room_for_one_new_unit() {
        let source = source(&[("01A", 0..100), ("01B", 100..110)]);
        let mut buffer = ReplayBuffer::new(100);
        buffer.ingest(&source, &names(&["01A"])).await.unwrap();
        assert_eq!(buffer.len(), 100);
        let ingested = buffer.ingest(&source, &names(&["01B"])).await.unwrap();
        assert_eq!(ingested.evicted, 10);
        assert_eq!(buffer.len(), 100);
        let window = values(&buffer);
        assert_eq!(window[90..], (100..110).collect::<Vec<_>>()[..]);
        assert_eq!(window[0], 10);
        assert!(!window.contains(&9));
    }

    #[tokio::test]
    async fn walk_visits_newest_first_and_commits_oldest_first() {
        let source = source(&[("01A", 0..50), ("01B", 50..110)]);
        let mut buffer = ReplayBuffer::new(100);
        let ingested = buffer.ingest(&source, &names(&["01A", "01B"])).await.unwrap();
        assert_eq!(ingested.visited, names(&["01B", "01A"]));
        assert_eq!(ingested.read, 110);
        assert_eq!(ingested.evicted, 0);
        assert_eq!(source.store().gets(), vec!["sample/01B.bz2", "sample/01A.bz2"]);
        assert_eq!(buffer.len(), 100);
        assert_eq!(values(&buffer), (10..110).collect::<Vec<_>>());
        assert_eq!(buffer.cursor(), Some("01B"));
    }

    #[tokio::test]
    async fn recruitment_stops_once_a_window_is_read() {
        let source = source(&[("01A", 0..40), ("01B", 40..80), ("01C", 80..120), ("01D", 120..160)]);
        let mut buffer = ReplayBuffer::new(70);
        let ingested = buffer
            .ingest(&source, &names(&["01A", "01B", "01C", "01D"]))
            .await
            .unwrap();
        assert_eq!(ingested.visited, names(&["01D", "01C"]));
        assert_eq!(values(&buffer), (90..160).collect::<Vec<_>>());
        assert_eq!(buffer.cursor(), Some("01D"));
    }

    #[tokio::test]
    async fn per_unit_eviction_can_overshoot_older_content() {
        // 6 kept + 4 + 4 new in a window of 10: each visited unit evicts its
        // own size from the front, so all 6 go and two slots stay empty.
        let source = source(&[("01A", 0..6), ("01B", 6..10), ("01C", 10..14)]);
        let mut buffer = ReplayBuffer::new(10);
        buffer.ingest(&source, &names(&["01A"])).await.unwrap();
        let ingested = buffer.ingest(&source, &names(&["01B", "01C"])).await.unwrap();
        assert_eq!(ingested.evicted, 6);
        assert_eq!(values(&buffer), (6..14).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn empty_units_still_advance_the_cursor() {
        let source = source(&[("01A", 0..3), ("01B", 0..0)]);
        let mut buffer = ReplayBuffer::new(10);
        buffer.ingest(&source, &names(&["01A", "01B"])).await.unwrap();
        assert_eq!(values(&buffer), vec![0, 1, 2]);
        assert_eq!(buffer.cursor(), Some("01B"));
    }

    #[tokio::test]
    async fn failed_fetch_leaves_the_buffer_untouched() {
        let source = source(&[("01A", 0..10), ("01B", 10..20), ("01C", 20..30), ("01D", 30..40)]);
        let mut buffer = ReplayBuffer::new(100);
        buffer.ingest(&source, &names(&["01A"])).await.unwrap();
        source.store().fail("sample/01C.bz2");
        let err = buffer
            .ingest(&source, &names(&["01B", "01C", "01D"]))
            .await
            .unwrap_err();
        match err {
            IngestError::Transfer { unit, source } => {
                assert_eq!(unit, "01C");
                assert!(matches!(source, TransferError::Remote { .. }));
            }
            other => panic!("expected transfer error, got {:?}", other),
        }
        assert_eq!(values(&buffer), (0..10).collect::<Vec<_>>());
        assert_eq!(buffer.cursor(), Some("01A"));
    }

    #[tokio::test]
    async fn malformed_unit_aborts_with_parse_error() {
        let source = source(&[("01A", 0..10)]);
        source
            .store()
            .insert("sample/01B.bz2", lrn_store::pack(b"1 2 3\n"));
        let mut buffer = ReplayBuffer::new(100);
        let err = buffer
            .ingest(&source, &names(&["01A", "01B"]))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Parse { ref unit, .. } if unit == "01B"));
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), None);
    }

    #[tokio::test]
    async fn invariants_hold_across_many_ingests() {
        let sizes = [7u32, 0, 13, 25, 1, 40, 3, 18, 9, 31, 2, 60];
        let mut units = Vec::new();
        let mut next = 0;
        for (i, size) in sizes.iter().enumerate() {
            units.push((format!("01{:02}", i), next..next + size));
            next += size;
        }
        let refs = units
            .iter()
            .map(|(n, r)| (n.as_str(), r.clone()))
            .collect::<Vec<_>>();
        let source = source(&refs);
        let mut buffer = ReplayBuffer::new(32);
        let mut last = None::<Name>;
        for chunk in units.chunks(3) {
            let listed = source.list_new(buffer.cursor()).await.unwrap();
            let expected = chunk.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>();
            assert_eq!(listed[..expected.len()], expected[..]);
            buffer.ingest(&source, &expected).await.unwrap();
            assert!(buffer.len() <= buffer.max_length());
            let cursor = buffer.cursor().map(str::to_string);
            assert!(cursor >= last);
            last = cursor;
        }
    }
}
