use super::*;
use lrn_core::*;
use lrn_replay::Sample;
use rayon::prelude::*;

/// Policy weights, policy bias, value weights, value bias.
const POLICY_WEIGHTS: usize = ACTION_NUM * STATE_NUM;
const POLICY_BIAS: usize = POLICY_WEIGHTS;
const VALUE_WEIGHTS: usize = POLICY_BIAS + ACTION_NUM;
const VALUE_BIAS: usize = VALUE_WEIGHTS + STATE_NUM;
/// Number of trainable parameters.
pub const PARAMETERS: usize = VALUE_BIAS + 1;

/// Linear policy/value model over the raw state.
///
/// `policy = softmax(W s + b)`, `value = sigmoid(w · s + c)`.
/// Parameters live in one flat vector so that gradients can be summed
/// across threads without any per-head bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel(Vec<Scalar>);

impl Default for LinearModel {
    /// Zero weights: uniform policy and a value of one half.
    fn default() -> Self {
        Self(vec![0.; PARAMETERS])
    }
}

impl LinearModel {
    pub fn parameters(&self) -> &[Scalar] {
        &self.0
    }

    pub fn from_parameters(parameters: Vec<Scalar>) -> Option<Self> {
        (parameters.len() == PARAMETERS).then_some(Self(parameters))
    }

    /// Policy distribution and value for one state.
    pub fn predict(&self, state: &[Scalar; STATE_NUM]) -> ([Scalar; ACTION_NUM], Scalar) {
        let mut logits = [0.; ACTION_NUM];
        for (a, logit) in logits.iter_mut().enumerate() {
            let row = &self.0[a * STATE_NUM..(a + 1) * STATE_NUM];
            *logit = self.0[POLICY_BIAS + a] + dot(row, state);
        }
        let value = sigmoid(self.0[VALUE_BIAS] + dot(&self.0[VALUE_WEIGHTS..VALUE_BIAS], state));
        (softmax(logits), value)
    }

    /// Mean losses over `samples`.
    pub fn losses(&self, samples: &[Sample]) -> Losses {
        samples
            .par_iter()
            .map(|s| self.gradient(s).1)
            .reduce(Losses::default, |a, b| a + b)
            / samples.len()
    }

    /// Gradient of one sample's loss with respect to every parameter, and the loss itself.
    fn gradient(&self, sample: &Sample) -> (Vec<Scalar>, Losses) {
        let (policy, value) = self.predict(&sample.state);
        let mut grad = vec![0.; PARAMETERS];
        // d/dz of -Σ t log(p + ε) through the softmax
        let ratio: [Scalar; ACTION_NUM] = std::array::from_fn(|a| {
            sample.policy[a] * policy[a] / (policy[a] + POLICY_EPSILON)
        });
        let mass = ratio.iter().sum::<Scalar>();
        for a in 0..ACTION_NUM {
            let dz = policy[a] * mass - ratio[a];
            grad[POLICY_BIAS + a] = dz;
            for (g, x) in grad[a * STATE_NUM..(a + 1) * STATE_NUM]
                .iter_mut()
                .zip(sample.state.iter())
            {
                *g = dz * x;
            }
        }
        let error = value - sample.value;
        let du = 2. * error * value * (1. - value);
        grad[VALUE_BIAS] = du;
        for (g, x) in grad[VALUE_WEIGHTS..VALUE_BIAS]
            .iter_mut()
            .zip(sample.state.iter())
        {
            *g = du * x;
        }
        let losses = Losses {
            policy: -sample
                .policy
                .iter()
                .zip(policy.iter())
                .map(|(t, p)| (t * (p + POLICY_EPSILON).ln()) as Loss)
                .sum::<Loss>(),
            value: (error * error) as Loss,
        };
        (grad, losses)
    }

    /// One full-batch gradient descent step. Returns the losses before the step.
    pub fn step(&mut self, samples: &[Sample], learning_rate: Scalar, weight_decay: Scalar) -> Losses {
        if samples.is_empty() {
            return Losses::default();
        }
        let (grad, losses) = samples
            .par_iter()
            .map(|s| self.gradient(s))
            .reduce(
                || (vec![0.; PARAMETERS], Losses::default()),
                |(mut g, l), (h, m)| {
                    g.iter_mut().zip(h.iter()).for_each(|(g, h)| *g += h);
                    (g, l + m)
                },
            );
        let n = samples.len() as Scalar;
        for (w, g) in self.0.iter_mut().zip(grad.iter()) {
            *w -= learning_rate * (g / n + weight_decay * *w);
        }
        losses / samples.len()
    }
}

fn dot(a: &[Scalar], b: &[Scalar]) -> Scalar {
    a.iter().zip(b.iter()).map(|(a, b)| a * b).sum()
}

fn sigmoid(x: Scalar) -> Scalar {
    1. / (1. + (-x).exp())
}

fn softmax(logits: [Scalar; ACTION_NUM]) -> [Scalar; ACTION_NUM] {
    let max = logits.iter().cloned().fold(Scalar::NEG_INFINITY, Scalar::max);
    let exps = logits.map(|z| (z - max).exp());
    let sum = exps.iter().sum::<Scalar>();
    exps.map(|e| e / sum)
}

/// Reference [`Trainer`]: full-batch gradient descent on a [`LinearModel`].
#[derive(Debug, Clone)]
pub struct LinearTrainer {
    model: LinearModel,
    learning_rate: Scalar,
    weight_decay: Scalar,
}

impl Default for LinearTrainer {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE, DEFAULT_WEIGHT_DECAY)
    }
}

impl LinearTrainer {
    pub fn new(learning_rate: Scalar, weight_decay: Scalar) -> Self {
        Self::resume(LinearModel::default(), learning_rate, weight_decay)
    }
    /// Continues training from previously published weights.
    pub fn resume(model: LinearModel, learning_rate: Scalar, weight_decay: Scalar) -> Self {
        Self {
            model,
            learning_rate,
            weight_decay,
        }
    }
    pub fn model(&self) -> &LinearModel {
        &self.model
    }
}

impl Trainer for LinearTrainer {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn train(&mut self, samples: &[Sample], epochs: usize) -> Losses {
        log::info!("{:<32}{:<32}", "training on samples", commas(samples.len()));
        let start = std::time::Instant::now();
        let mut last = Losses::default();
        for epoch in 0..epochs {
            let tick = std::time::Instant::now();
            last = self.model.step(samples, self.learning_rate, self.weight_decay);
            log::debug!(
                "epoch {:4}  elapsed {:>6}ms  {}",
                epoch,
                tick.elapsed().as_millis(),
                last
            );
        }
        log::info!(
            "{:<32}{:<32}",
            format!("trained {} epochs", epochs),
            format!("{:.2?}  {}", start.elapsed(), last)
        );
        last
    }

    fn servable(&self) -> Vec<u8> {
        encode(&self.model)
    }
}
