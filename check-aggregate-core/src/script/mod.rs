pub mod evaluator;
pub mod functions;
pub mod resolver;
pub mod tokenizer;

use crate::config::schema::FilterConfig;
use crate::error::Result;
use crate::snapshot::{Hostgroups, StatusSnapshot};
use crate::status::StatusItem;

pub use evaluator::reduce;
pub use functions::Function;
pub use resolver::Resolver;
pub use tokenizer::{join_script_lines, tokenize, Lexeme};

/// Element of the flat sequence the reducer works on. Nesting lives only in
/// the order of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Function(String),
    Open,
    Close,
    Item(StatusItem),
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Function(name) => format!("function '{name}'"),
            Self::Open => "'('".to_owned(),
            Self::Close => "')'".to_owned(),
            Self::Item(item) => format!("value '{}'", item.formatted()),
        }
    }
}

/// Everything one evaluation reads. Built once per invocation.
pub struct EvaluationContext<'a> {
    pub snapshot: &'a dyn StatusSnapshot,
    pub hostgroups: &'a Hostgroups,
    pub filters: FilterConfig,
    pub line_separator: &'a str,
}

pub fn evaluate(script: &str, context: &EvaluationContext<'_>) -> Result<StatusItem> {
    let lexemes = tokenize(script);
    tracing::debug!(tokens = lexemes.len(), "tokenized script");

    let resolver = Resolver::new(context.snapshot, context.hostgroups, context.filters);
    let tokens = resolver.resolve(lexemes)?;
    reduce(tokens, context.line_separator)
}
