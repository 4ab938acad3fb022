//! Empirical complexity sampling.
//!
//! The base word is enlarged by each scale factor (see [`crate::scale`]),
//! run through the unmodified engine under a per-scale guard, and the step
//! count (time) or peak word length (space) is recorded. A run that trips its
//! guard ends sampling; whatever was gathered before it is still classified.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::engine::{Engine, Halt, Limits};
use crate::error::Result;
use crate::growth::{Growth, Sample, classify_with};
use crate::rules::RuleSet;
use crate::scale;
use crate::settings::SamplingSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Steps taken by the run.
    Time,
    /// Peak word length reached by the run.
    Space,
}

/// Where and why sampling stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort {
    pub scale: usize,
    pub halt: Halt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityReport {
    pub metric: Metric,
    pub big_o: Growth,
    pub samples: Vec<Sample>,
    pub aborted: Option<Abort>,
}

pub struct Sampler<'r> {
    rules: &'r RuleSet,
    guard: Limits,
    max_scales: usize,
    tolerance: f64,
}

impl<'r> Sampler<'r> {
    pub fn new(rules: &'r RuleSet, settings: &SamplingSettings) -> Self {
        Self {
            rules,
            guard: settings.guard(),
            max_scales: settings.max_scales,
            tolerance: settings.tolerance,
        }
    }

    pub fn time(&self, word: &str, scales: &[usize]) -> Result<ComplexityReport> {
        self.sample(word, scales, Metric::Time)
    }

    pub fn space(&self, word: &str, scales: &[usize]) -> Result<ComplexityReport> {
        self.sample(word, scales, Metric::Space)
    }

    pub fn sample(&self, word: &str, scales: &[usize], metric: Metric) -> Result<ComplexityReport> {
        scale::validate(scales)?;
        let budget = scales.len().min(self.max_scales);
        if budget < scales.len() {
            warn!(requested = scales.len(), kept = budget, "scale budget exceeded, dropping larger scales");
        }

        let engine = Engine::new(self.rules, self.guard);
        let mut samples = Vec::with_capacity(budget);
        let mut aborted = None;
        let base_length = word.chars().count();
        for &k in &scales[..budget] {
            let oversized = match (base_length.checked_mul(k), self.guard.length_limit) {
                (Some(length), Some(limit)) => length > limit,
                (None, _) => true,
                (Some(_), None) => false,
            };
            if oversized {
                warn!(scale = k, gathered = samples.len(), "scaled word exceeds the length guard");
                aborted = Some(Abort { scale: k, halt: Halt::LengthLimit });
                break;
            }
            let scaled = scale::generate(word, k)?;
            let run = engine.measure(&scaled);
            if run.halt.is_truncation() {
                warn!(scale = k, halt = ?run.halt, gathered = samples.len(), "sampling guard tripped");
                aborted = Some(Abort { scale: k, halt: run.halt });
                break;
            }
            let value = match metric {
                Metric::Time => run.steps,
                Metric::Space => run.peak_length,
            };
            debug!(scale = k, ?metric, value, "sampled");
            samples.push(Sample::new(k, value));
        }

        let big_o = if samples.len() < 2 {
            Growth::Unknown
        } else {
            classify_with(&samples, self.tolerance)
        };
        info!(?metric, %big_o, samples = samples.len(), aborted = aborted.is_some(), "complexity estimated");
        Ok(ComplexityReport { metric, big_o, samples, aborted })
    }
}

/// Samples step counts with the default sampling guards.
pub fn time_complexity(word: &str, rules: &RuleSet, scales: &[usize]) -> Result<ComplexityReport> {
    Sampler::new(rules, &SamplingSettings::default()).time(word, scales)
}

/// Samples peak word lengths with the default sampling guards.
pub fn space_complexity(word: &str, rules: &RuleSet, scales: &[usize]) -> Result<ComplexityReport> {
    Sampler::new(rules, &SamplingSettings::default()).space(word, scales)
}
