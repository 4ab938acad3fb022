//! The rewriting engine.
//!
//! A run owns one mutable word buffer. Every step scans the rule set in list
//! order, picks the first rule whose pattern occurs anywhere in the word, and
//! replaces the leftmost occurrence of that pattern. The run stops at a fixed
//! point (no pattern occurs), after a terminal rule, or when one of the
//! [`Limits`] is reached. Limits are checked on every step, so an explosive
//! rule set such as `a->ab` still halts.

use serde::Serialize;
use tracing::debug;

use crate::rules::{Rule, RuleSet};

pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// Ceilings for a single run. Word length is counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub step_limit: usize,
    pub length_limit: Option<usize>,
}
impl Limits {
    pub fn steps(step_limit: usize) -> Self {
        Self { step_limit, length_limit: None }
    }
}
impl Default for Limits {
    fn default() -> Self {
        Self::steps(DEFAULT_STEP_LIMIT)
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Halt {
    FixedPoint,
    TerminalRule,
    StepLimit,
    LengthLimit,
}
impl Halt {
    /// True when the run was cut short rather than finishing on its own.
    pub fn is_truncation(self) -> bool {
        matches!(self, Halt::StepLimit | Halt::LengthLimit)
    }
}

/// One applied step. `word` is the state after the replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub step: usize,
    pub word: String,
    pub rule: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub output: String,
    pub steps: usize,
    pub trace: Vec<TraceEntry>,
    pub truncated: bool,
    pub halt: Halt,
    /// Longest word (in chars) among the trace entries and the output.
    pub peak_length: usize,
}

impl RunResult {
    /// The first longest word of the run along with the step that produced
    /// it. Step 0 means the output of a run that applied no rule.
    pub fn longest(&self) -> (usize, &str) {
        let mut best = (0, self.output.as_str());
        let mut best_len = None;
        for entry in &self.trace {
            let len = entry.word.chars().count();
            if best_len.is_none_or(|b| len > b) {
                best = (entry.step, entry.word.as_str());
                best_len = Some(len);
            }
        }
        best
    }
}

/// Trace-free summary of a run, used where only the metrics matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub output: String,
    pub steps: usize,
    pub peak_length: usize,
    pub halt: Halt,
}

pub struct Engine<'r> {
    rules: &'r RuleSet,
    limits: Limits,
}

impl<'r> Engine<'r> {
    pub fn new(rules: &'r RuleSet, limits: Limits) -> Self {
        Self { rules, limits }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Runs `word` to completion, recording every step.
    pub fn run(&self, word: &str) -> RunResult {
        let mut trace = Vec::new();
        let summary = self.drive(word, |step, word, rule| {
            trace.push(TraceEntry { step, word: word.to_string(), rule });
        });
        RunResult {
            output: summary.output,
            steps: summary.steps,
            trace,
            truncated: summary.halt.is_truncation(),
            halt: summary.halt,
            peak_length: summary.peak_length,
        }
    }

    /// Runs `word` exactly like [`Engine::run`] without keeping the trace.
    pub fn measure(&self, word: &str) -> Measurement {
        self.drive(word, |_, _, _| ())
    }

    fn drive<F>(&self, word: &str, mut on_step: F) -> Measurement
    where
        F: FnMut(usize, &str, usize),
    {
        let mut word = word.to_string();
        let mut length = word.chars().count();
        // the input only counts when it is also the output
        let mut peak_length = length;
        let mut steps = 0;

        // an oversized input is refused even when no rule matches it
        let halt = if self.exceeds_length(length) {
            Halt::LengthLimit
        } else {
            loop {
                let Some((index, rule, at)) = self.first_match(&word) else {
                    break Halt::FixedPoint;
                };
                if self.exceeds_length(length) {
                    break Halt::LengthLimit;
                }
                if steps >= self.limits.step_limit {
                    break Halt::StepLimit;
                }
                word.replace_range(at..at + rule.pattern().len(), rule.replacement());
                length = length - rule.pattern_len() + rule.replacement_len();
                peak_length = if steps == 0 { length } else { peak_length.max(length) };
                steps += 1;
                on_step(steps, &word, index);
                if rule.is_terminal() {
                    break Halt::TerminalRule;
                }
            }
        };
        debug!(steps, peak_length, ?halt, "run halted");
        Measurement { output: word, steps, peak_length, halt }
    }

    fn exceeds_length(&self, length: usize) -> bool {
        self.limits.length_limit.is_some_and(|limit| length > limit)
    }

    // First rule by position, then the leftmost byte offset of its pattern.
    fn first_match(&self, word: &str) -> Option<(usize, &'r Rule, usize)> {
        self.rules
            .iter()
            .enumerate()
            .find_map(|(index, rule)| word.find(rule.pattern()).map(|at| (index, rule, at)))
    }
}

/// Applies `rules` to `word` for at most `step_limit` steps.
pub fn apply(word: &str, rules: &RuleSet, step_limit: usize) -> RunResult {
    Engine::new(rules, Limits::steps(step_limit)).run(word)
}
