use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkovianError {
    #[error("Rule syntax error on line {line}: {message}")]
    RuleSyntax { line: usize, message: String },
    #[error("Invalid scale factor {0}: scale factors must be positive")]
    InvalidScale(usize),
    #[error("Invalid scales: {0}")]
    InvalidScales(String),
    #[error("word and rules required")]
    MissingInput,
    #[error("Config error: {0}")]
    Config(String),
    #[error("Request timed out after {0} ms")]
    Timeout(u64),
    #[error("Execution error: {0}")]
    Execution(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarkovianError>;

// Helper conversions
impl From<config::ConfigError> for MarkovianError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
