//! Column-wise bootstrap sampler.
//!
//! Each column is resampled independently from the values seen at fit time, and
//! numeric draws get Gaussian jitter proportional to the column's spread. Because
//! columns are drawn independently, cross-column rules are routinely broken in the
//! raw output, which is what the constraint repairs are for.
//!
//! Sampling is deterministic for a given seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, Value};
use crate::error::SynthError;
use crate::synth::Synthesizer;

/// Default seed, matching the CLI default.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapConfig {
    pub seed: u64,
    /// Jitter scale as a fraction of each numeric column's standard deviation.
    pub jitter: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            jitter: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
struct ColumnPool {
    values: Vec<Value>,
    /// Population standard deviation of the numeric values (0 for text columns).
    spread: f64,
}

impl ColumnPool {
    fn from_values(values: Vec<Value>) -> Self {
        let numeric: Vec<f64> = values
            .iter()
            .filter_map(Value::as_f64)
            .filter(|v| v.is_finite())
            .collect();
        let spread = if numeric.len() < 2 {
            0.0
        } else {
            let n = numeric.len() as f64;
            let mean = numeric.iter().sum::<f64>() / n;
            (numeric.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
        };
        Self { values, spread }
    }

    fn draw(&self, rng: &mut StdRng, noise: &Normal<f64>, jitter: f64) -> Value {
        let Some(value) = self.values.choose(rng) else {
            return Value::Null;
        };
        if jitter <= 0.0 || self.spread <= 0.0 {
            return value.clone();
        }

        let delta = noise.sample(rng) * jitter * self.spread;
        match value {
            Value::Float(f) => Value::Float(f + delta),
            Value::Int(i) => Value::Int(i.saturating_add(delta.round() as i64)),
            other => other.clone(),
        }
    }
}

/// Reference `Synthesizer` that resamples columns independently.
#[derive(Debug, Clone)]
pub struct ColumnBootstrap {
    config: BootstrapConfig,
    rng: StdRng,
    noise: Normal<f64>,
    columns: Vec<String>,
    pools: Vec<ColumnPool>,
}

impl ColumnBootstrap {
    pub fn new(config: BootstrapConfig) -> Result<Self, SynthError> {
        if !(config.jitter.is_finite() && config.jitter >= 0.0) {
            return Err(SynthError::model(format!(
                "jitter must be finite and >= 0, got {}",
                config.jitter
            )));
        }
        let noise = Normal::new(0.0, 1.0)
            .map_err(|e| SynthError::model(format!("Noise distribution error: {e}")))?;

        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(config.seed),
            noise,
            columns: Vec::new(),
            pools: Vec::new(),
        })
    }
}

impl Synthesizer for ColumnBootstrap {
    fn fit(&mut self, data: &Dataset) -> Result<(), SynthError> {
        if data.is_empty() {
            return Err(SynthError::model("cannot fit on an empty dataset"));
        }
        self.columns = data.columns().to_vec();
        self.pools = (0..self.columns.len())
            .map(|idx| ColumnPool::from_values(data.column(idx).cloned().collect()))
            .collect();
        Ok(())
    }

    fn sample(&mut self, rows: usize) -> Result<Dataset, SynthError> {
        if self.pools.is_empty() {
            return Err(SynthError::NotFitted);
        }

        let mut out = Dataset::new(self.columns.clone());
        for _ in 0..rows {
            let row = self
                .pools
                .iter()
                .map(|pool| pool.draw(&mut self.rng, &self.noise, self.config.jitter))
                .collect();
            out.push_row(row)?;
        }
        Ok(out)
    }
}
