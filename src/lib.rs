//! Markovian – a bounded string-rewriting simulator with empirical complexity estimates.
//!
//! A *rule set* is an ordered list of `pattern->replacement` rules. Running a
//! word through it repeatedly applies the first rule (by position) whose
//! pattern occurs in the word, replacing the leftmost occurrence, until no
//! pattern occurs any more, a terminal rule (`pattern->.replacement`) fires,
//! or a step/length limit is reached. Every step is traced.
//!
//! On top of the engine sit two samplers. They enlarge the input word by a
//! series of scale factors, run each enlarged word under its own guard, and
//! feed the observed step counts (time) or peak word lengths (space) to a
//! ratio-test classifier that names the growth family. The classifier is a
//! heuristic over a few samples and makes no claim of proof.
//!
//! ## Modules
//! * [`rules`] – Rule text compiler (pest grammar in `rules.pest`) and [`rules::RuleSet`].
//! * [`engine`] – The rewriting [`engine::Engine`], its [`engine::Limits`] and run traces.
//! * [`scale`] – The input scaling law shared by both samplers.
//! * [`sampler`] – Time and space sampling with per-scale guards.
//! * [`growth`] – The growth classifier over `(scale, metric)` samples.
//! * [`settings`] – File and environment configuration.
//! * [`server`] – The `/api/run`, `/api/time` and `/api/space` JSON endpoints.
//!
//! ## Quick Start
//! ```
//! use markovian::{engine::apply, rules::RuleSet};
//! let rules = RuleSet::compile("a->ab\nb->a").unwrap();
//! let run = apply("a", &rules, 5);
//! assert_eq!(run.steps, 5);
//! assert!(run.truncated);
//! assert_eq!(run.trace[0].word, "ab");
//! ```
//!
//! Every engine invocation owns its word and only borrows the immutable rule
//! set, so concurrent requests share nothing mutable.

pub mod engine;
pub mod error;
pub mod growth;
pub mod rules;
pub mod sampler;
pub mod scale;
pub mod server;
pub mod settings;
