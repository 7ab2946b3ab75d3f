use super::*;
use lrn_replay::Sample;

/// Unified training interface.
/// Implementations own their model; the orchestrator only feeds samples
/// and collects servable artifacts.
pub trait Trainer: Send {
    /// Architecture tag recorded alongside each published artifact.
    fn kind(&self) -> &'static str;
    /// Fits the model to `samples` for `epochs` passes. Returns the losses of the last pass.
    fn train(&mut self, samples: &[Sample], epochs: usize) -> Losses;
    /// Current model, encoded for publication.
    fn servable(&self) -> Vec<u8>;
}

impl<T> Trainer for Box<T>
where
    T: Trainer + ?Sized,
{
    fn kind(&self) -> &'static str {
        self.as_ref().kind()
    }
    fn train(&mut self, samples: &[Sample], epochs: usize) -> Losses {
        self.as_mut().train(samples, epochs)
    }
    fn servable(&self) -> Vec<u8> {
        self.as_ref().servable()
    }
}
