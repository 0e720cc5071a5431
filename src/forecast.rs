use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub trait Forecaster: Send + Sync {
    /// Returns exactly `months_ahead` predicted values following `history`.
    fn forecast(&self, history: &[u64], months_ahead: usize) -> Vec<i64>;
}

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub window: usize,
    pub hidden: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Wall-clock cap on the training loop; checked after every epoch.
    pub budget: Duration,
    /// Fixed seed for weight init and shuffling. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            window: 3,
            hidden: 8,
            epochs: 500,
            learning_rate: 0.05,
            budget: Duration::from_millis(250),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WindowedRegressor {
    config: TrainingConfig,
}

impl WindowedRegressor {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }
}

impl Forecaster for WindowedRegressor {
    fn forecast(&self, history: &[u64], months_ahead: usize) -> Vec<i64> {
        let window = self.config.window.max(1);

        match history {
            [] => return vec![0; months_ahead],
            [only] => return vec![to_i64(*only); months_ahead],
            // Too short for a single window/target pair.
            _ if history.len() <= window => {
                let last = history.last().copied().unwrap_or(0);
                return vec![to_i64(last); months_ahead];
            }
            _ => {}
        }

        let scale = Scale::fit(history);
        let normalized: Vec<f64> = history.iter().map(|v| scale.normalize(*v)).collect();
        let samples: Vec<(&[f64], f64)> = normalized
            .windows(window + 1)
            .map(|pair| (&pair[..window], pair[window]))
            .collect();

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut net = Network::new(window, self.config.hidden.max(1), &mut rng);
        self.train(&mut net, samples, &mut rng);

        let mut recent: Vec<f64> = normalized[normalized.len() - window..].to_vec();
        let mut predicted = Vec::with_capacity(months_ahead);
        for _ in 0..months_ahead {
            let mut next = net.predict(&recent);
            if !next.is_finite() {
                next = 0.0;
            }
            predicted.push(scale.denormalize(next));
            recent.remove(0);
            recent.push(next);
        }
        predicted
    }
}

impl WindowedRegressor {
    fn train(&self, net: &mut Network, mut samples: Vec<(&[f64], f64)>, rng: &mut StdRng) {
        let started = Instant::now();
        let mut loss = 0.0;
        for epoch in 0..self.config.epochs {
            samples.shuffle(rng);
            loss = 0.0;
            for (input, target) in &samples {
                loss += net.step(input, *target, self.config.learning_rate);
            }
            loss /= samples.len() as f64;

            if started.elapsed() > self.config.budget {
                warn!(
                    epoch,
                    budget_ms = self.config.budget.as_millis() as u64,
                    "forecast training stopped at wall-clock budget"
                );
                return;
            }
        }
        debug!(epochs = self.config.epochs, samples = samples.len(), loss, "forecast training finished");
    }
}

/// Min-max scaling with the range floored at 1.
#[derive(Debug, Clone, Copy)]
struct Scale {
    min: f64,
    range: f64,
}

impl Scale {
    fn fit(values: &[u64]) -> Self {
        let min = values.iter().copied().min().unwrap_or(0) as f64;
        let max = values.iter().copied().max().unwrap_or(0) as f64;
        Self {
            min,
            range: (max - min).max(1.0),
        }
    }

    fn normalize(&self, value: u64) -> f64 {
        (value as f64 - self.min) / self.range
    }

    fn denormalize(&self, value: f64) -> i64 {
        let raw = value * self.range + self.min;
        if raw.is_finite() { raw.round() as i64 } else { 0 }
    }
}

/// `window` inputs → `hidden` tanh units → one linear output.
struct Network {
    input_weights: Vec<Vec<f64>>,
    hidden_bias: Vec<f64>,
    output_weights: Vec<f64>,
    output_bias: f64,
}

impl Network {
    fn new(inputs: usize, hidden: usize, rng: &mut StdRng) -> Self {
        let in_limit = (6.0 / (inputs + hidden) as f64).sqrt();
        let out_limit = (6.0 / (hidden + 1) as f64).sqrt();
        Self {
            input_weights: (0..hidden)
                .map(|_| (0..inputs).map(|_| rng.gen_range(-in_limit..in_limit)).collect())
                .collect(),
            hidden_bias: vec![0.0; hidden],
            output_weights: (0..hidden).map(|_| rng.gen_range(-out_limit..out_limit)).collect(),
            output_bias: 0.0,
        }
    }

    fn hidden(&self, input: &[f64]) -> Vec<f64> {
        self.input_weights
            .iter()
            .zip(&self.hidden_bias)
            .map(|(weights, bias)| {
                let sum: f64 = weights.iter().zip(input).map(|(w, x)| w * x).sum();
                (sum + bias).tanh()
            })
            .collect()
    }

    fn output(&self, hidden: &[f64]) -> f64 {
        let sum: f64 = self.output_weights.iter().zip(hidden).map(|(w, h)| w * h).sum();
        sum + self.output_bias
    }

    fn predict(&self, input: &[f64]) -> f64 {
        self.output(&self.hidden(input))
    }

    /// One gradient step on squared error; returns the loss before the update.
    fn step(&mut self, input: &[f64], target: f64, learning_rate: f64) -> f64 {
        let hidden = self.hidden(input);
        let error = self.output(&hidden) - target;

        for (j, h) in hidden.iter().enumerate() {
            let delta = error * self.output_weights[j] * (1.0 - h * h);
            self.output_weights[j] -= learning_rate * error * h;
            for (w, x) in self.input_weights[j].iter_mut().zip(input) {
                *w -= learning_rate * delta * x;
            }
            self.hidden_bias[j] -= learning_rate * delta;
        }
        self.output_bias -= learning_rate * error;

        error * error
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> WindowedRegressor {
        WindowedRegressor::new(TrainingConfig {
            seed: Some(7),
            budget: Duration::from_secs(5),
            ..TrainingConfig::default()
        })
    }

    #[test]
    fn empty_history_forecasts_zeros() {
        let model = seeded();
        assert_eq!(model.forecast(&[], 4), vec![0, 0, 0, 0]);
        assert!(model.forecast(&[], 0).is_empty());
    }

    #[test]
    fn single_point_is_repeated() {
        assert_eq!(seeded().forecast(&[12], 3), vec![12, 12, 12]);
    }

    #[test]
    fn history_shorter_than_a_window_pair_repeats_last_value() {
        let model = seeded();
        assert_eq!(model.forecast(&[4, 9], 2), vec![9, 9]);
        assert_eq!(model.forecast(&[4, 9, 1], 3), vec![1, 1, 1]);
    }

    #[test]
    fn all_zero_history_forecasts_zeros() {
        assert_eq!(seeded().forecast(&[0, 0, 0, 0], 3), vec![0, 0, 0]);
    }

    #[test]
    fn constant_history_stays_constant() {
        assert_eq!(seeded().forecast(&[7, 7, 7, 7, 7], 2), vec![7, 7]);
    }

    #[test]
    fn rising_history_keeps_rising() {
        let predicted = seeded().forecast(&[10, 20, 30, 40, 50], 2);
        assert_eq!(predicted.len(), 2);
        for value in predicted {
            assert!(value > 50, "prediction {value} not above last point");
            assert!(value <= 200, "prediction {value} out of band");
        }
    }

    #[test]
    fn zero_budget_still_returns_requested_length() {
        let model = WindowedRegressor::new(TrainingConfig {
            budget: Duration::ZERO,
            seed: Some(1),
            ..TrainingConfig::default()
        });
        assert_eq!(model.forecast(&[3, 1, 4, 1, 5, 9, 2, 6], 5).len(), 5);
    }

    #[test]
    fn scale_floors_range_and_guards_non_finite() {
        let scale = Scale::fit(&[5, 5, 5]);
        assert_eq!(scale.range, 1.0);
        assert_eq!(scale.normalize(5), 0.0);
        assert_eq!(scale.denormalize(f64::NAN), 0);
        assert_eq!(scale.denormalize(0.4), 5);
        assert_eq!(scale.denormalize(0.6), 6);
    }
}
