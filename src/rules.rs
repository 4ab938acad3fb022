//! Rule compiler: turns rule text into an ordered [`RuleSet`].
//!
//! Rule text holds one rule per line, written `pattern->replacement`, or
//! `pattern->.replacement` for a terminal rule. Blank lines are skipped but
//! still counted, so errors always point at the line the user typed.
//! Surrounding whitespace is trimmed from the line, the pattern and the
//! replacement. The order of the lines is the priority order of the rules.

use std::fmt;
use std::str::FromStr;

use pest::Parser;
use pest::error::ErrorVariant;

use crate::error::{MarkovianError, Result};

mod grammar {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "rules.pest"]
    pub struct RuleParser;
}

use grammar::{RuleParser, Rule as Syntax};

pub const DELIMITER: &str = "->";
pub const TERMINAL_MARK: char = '.';

// ------------- Rule -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pattern: String,
    replacement: String,
    terminal: bool,
    // char counts, so the engine can track word length without rescanning
    pattern_len: usize,
    replacement_len: usize,
}

impl Rule {
    pub fn new(pattern: &str, replacement: &str, terminal: bool) -> Result<Self> {
        if pattern.is_empty() {
            return Err(MarkovianError::RuleSyntax {
                line: 0,
                message: "empty pattern would match everywhere".into(),
            });
        }
        if pattern.contains(DELIMITER) || replacement.contains(DELIMITER) {
            return Err(MarkovianError::RuleSyntax {
                line: 0,
                message: format!("pattern and replacement may not contain '{DELIMITER}'"),
            });
        }
        Ok(Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            terminal,
            pattern_len: pattern.chars().count(),
            replacement_len: replacement.chars().count(),
        })
    }
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
    pub(crate) fn pattern_len(&self) -> usize {
        self.pattern_len
    }
    pub(crate) fn replacement_len(&self) -> usize {
        self.replacement_len
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terminal {
            write!(f, "{}{}{}{}", self.pattern, DELIMITER, TERMINAL_MARK, self.replacement)
        } else {
            write!(f, "{}{}{}", self.pattern, DELIMITER, self.replacement)
        }
    }
}

// ------------- RuleSet -------------
/// An ordered, immutable list of rules. A rule's identity is its index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compiles rule text, failing on the first malformed line.
    pub fn compile(text: &str) -> Result<Self> {
        let mut rules = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            rules.push(compile_line(line, index + 1)?);
        }
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl FromStr for RuleSet {
    type Err = MarkovianError;
    fn from_str(text: &str) -> Result<Self> {
        Self::compile(text)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl<'r> IntoIterator for &'r RuleSet {
    type Item = &'r Rule;
    type IntoIter = std::slice::Iter<'r, Rule>;
    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn compile_line(line: &str, number: usize) -> Result<Rule> {
    let syntax_error = |message: String| MarkovianError::RuleSyntax { line: number, message };
    let parsed = RuleParser::parse(Syntax::rule, line)
        .map_err(|e| syntax_error(describe(&e)))?
        .next()
        .ok_or_else(|| syntax_error("empty rule".into()))?;

    let mut pattern = "";
    let mut replacement = "";
    let mut terminal = false;
    for part in parsed.into_inner() {
        match part.as_rule() {
            Syntax::pattern => pattern = part.as_str().trim(),
            Syntax::replacement => replacement = part.as_str().trim(),
            Syntax::terminal => terminal = true,
            _ => (),
        }
    }
    if pattern.is_empty() {
        return Err(syntax_error(format!(
            "empty pattern in '{line}' would match everywhere"
        )));
    }
    Rule::new(pattern, replacement, terminal).map_err(|e| match e {
        MarkovianError::RuleSyntax { message, .. } => syntax_error(message),
        other => other,
    })
}

fn describe(e: &pest::error::Error<Syntax>) -> String {
    match &e.variant {
        ErrorVariant::ParsingError { positives, .. } if positives.contains(&Syntax::arrow) => {
            format!("missing '{DELIMITER}' delimiter")
        }
        ErrorVariant::ParsingError { positives, .. } if positives.contains(&Syntax::EOI) => {
            format!("more than one '{DELIMITER}' delimiter")
        }
        _ => e.variant.message().into_owned(),
    }
}
