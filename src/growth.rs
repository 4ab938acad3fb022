//! Growth classifier.
//!
//! A best-effort ratio test over a handful of `(scale, metric)` samples.
//! Every consecutive pair of samples is compared against the ratio each
//! growth family predicts for the same change of scale, and the family that
//! agrees with a strict majority of the pairs names the growth. This is a
//! heuristic over finite samples, nothing more.

use std::fmt;

use serde::Serialize;

pub const DEFAULT_TOLERANCE: f64 = 0.2;

/// A measured metric at scale factor `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub scale: usize,
    pub metric: usize,
}
impl Sample {
    pub fn new(scale: usize, metric: usize) -> Self {
        Self { scale, metric }
    }
}
impl From<(usize, usize)> for Sample {
    fn from((scale, metric): (usize, usize)) -> Self {
        Self { scale, metric }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    Constant,
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
    Exponential,
    Unknown,
}

impl Growth {
    /// Candidate families, slowest growing first. Ties resolve to the earlier one.
    pub const FAMILIES: [Growth; 6] = [
        Growth::Constant,
        Growth::Logarithmic,
        Growth::Linear,
        Growth::Linearithmic,
        Growth::Quadratic,
        Growth::Exponential,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Growth::Constant => "constant",
            Growth::Logarithmic => "logarithmic",
            Growth::Linear => "linear",
            Growth::Linearithmic => "linearithmic",
            Growth::Quadratic => "quadratic",
            Growth::Exponential => "exponential",
            Growth::Unknown => "unknown",
        }
    }

    pub fn notation(self) -> &'static str {
        match self {
            Growth::Constant => "O(1)",
            Growth::Logarithmic => "O(log n)",
            Growth::Linear => "O(n)",
            Growth::Linearithmic => "O(n log n)",
            Growth::Quadratic => "O(n^2)",
            Growth::Exponential => "O(c^n)",
            Growth::Unknown => "?",
        }
    }
}

impl fmt::Display for Growth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(samples: &[Sample]) -> Growth {
    classify_with(samples, DEFAULT_TOLERANCE)
}

pub fn classify_with(samples: &[Sample], tolerance: f64) -> Growth {
    if samples.len() < 2 || samples[0].scale == 0 {
        return Growth::Unknown;
    }
    if samples.windows(2).any(|pair| pair[0].scale >= pair[1].scale) {
        return Growth::Unknown;
    }
    if samples.iter().all(|s| s.metric == samples[0].metric) {
        return Growth::Constant;
    }

    let base = exponential_base(samples, tolerance);
    let pairs = samples.len() - 1;
    let mut best = (Growth::Unknown, 0);
    for family in Growth::FAMILIES {
        let matched = samples
            .windows(2)
            .filter(|pair| {
                let (Some(observed), Some(predicted)) =
                    (observed_ratio(&pair[0], &pair[1]), predicted_ratio(family, &pair[0], &pair[1], base))
                else {
                    return false;
                };
                within(observed, predicted, tolerance)
            })
            .count();
        if matched > best.1 {
            best = (family, matched);
        }
    }
    if best.1 * 2 > pairs { best.0 } else { Growth::Unknown }
}

// None flags growth out of a zero metric, which no ratio describes.
fn observed_ratio(from: &Sample, to: &Sample) -> Option<f64> {
    match (from.metric, to.metric) {
        (0, 0) => Some(1.0),
        (0, _) => None,
        (m0, m1) => Some(m1 as f64 / m0 as f64),
    }
}

fn predicted_ratio(family: Growth, from: &Sample, to: &Sample, base: Option<f64>) -> Option<f64> {
    let c = to.scale as f64 / from.scale as f64;
    let log_factor = log_term(to.scale) / log_term(from.scale);
    match family {
        Growth::Constant => Some(1.0),
        Growth::Logarithmic => Some(log_factor),
        Growth::Linear => Some(c),
        Growth::Linearithmic => Some(c * log_factor),
        Growth::Quadratic => Some(c * c),
        Growth::Exponential => base.map(|b| b.powf((to.scale - from.scale) as f64)),
        Growth::Unknown => None,
    }
}

fn log_term(scale: usize) -> f64 {
    (scale.max(2) as f64).log2()
}

// The per-unit growth factor implied by the first and last samples, if it
// is clearly above one.
fn exponential_base(samples: &[Sample], tolerance: f64) -> Option<f64> {
    let first = samples.first()?;
    let last = samples.last()?;
    if first.metric == 0 || last.metric <= first.metric {
        return None;
    }
    let span = (last.scale - first.scale) as f64;
    let base = (last.metric as f64 / first.metric as f64).powf(1.0 / span);
    (base > 1.0 + tolerance).then_some(base)
}

fn within(observed: f64, predicted: f64, tolerance: f64) -> bool {
    if !observed.is_finite() || !predicted.is_finite() || predicted <= 0.0 || observed <= 0.0 {
        return false;
    }
    observed.max(predicted) / observed.min(predicted) <= 1.0 + tolerance
}
