use lrn_replay::ReplayBuffer;

/// What an episode does after ingesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Fit the whole window and publish the result.
    Train,
    /// Nothing to train on and nothing published yet: publish the untrained model.
    Bootstrap,
    /// Nothing to train on and a model exists: wait for producers.
    Idle,
}

/// How much data the buffer must hold before an episode trains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TrainGate {
    /// Any sample at all.
    #[default]
    Any,
    /// A full window.
    Full,
}

impl TrainGate {
    pub fn admits(&self, buffer: &ReplayBuffer) -> bool {
        match self {
            Self::Any => !buffer.is_empty(),
            Self::Full => !buffer.is_empty() && buffer.is_full(),
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::Bootstrap => write!(f, "bootstrap"),
            Self::Idle => write!(f, "idle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrn_replay::Batch;
    use lrn_replay::Sample;

    fn buffer(len: usize, max_length: usize) -> ReplayBuffer {
        let mut buffer = ReplayBuffer::new(max_length);
        buffer.append(Batch::from(vec![Sample::default(); len]));
        buffer
    }

    #[test]
    fn any_gate_admits_a_single_sample() {
        assert!(!TrainGate::Any.admits(&buffer(0, 4)));
        assert!(TrainGate::Any.admits(&buffer(1, 4)));
    }

    #[test]
    fn full_gate_waits_for_capacity() {
        assert!(!TrainGate::Full.admits(&buffer(3, 4)));
        assert!(TrainGate::Full.admits(&buffer(4, 4)));
        assert!(!TrainGate::Full.admits(&buffer(0, 0)));
    }
}
