use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("bad state '{0}'")]
    BadState(String),

    #[error("unknown host '{0}'")]
    UnknownHost(String),

    #[error("unknown service '{service}' on host '{host}'")]
    UnknownService { host: String, service: String },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("script did not reduce to a single value ({0} items left)")]
    UnreducedScript(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("status source error: {0}")]
    Snapshot(String),
}
