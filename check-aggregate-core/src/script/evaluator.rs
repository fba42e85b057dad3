use crate::error::{Error, Result};
use crate::script::functions::Function;
use crate::script::Token;
use crate::status::StatusItem;

/// Reduces a resolved token sequence to its single result.
///
/// The rightmost function application is always reduced first. By the time
/// an enclosing application is reached every call nested inside it has
/// already collapsed into one item, so its argument span holds no
/// parentheses and the first close paren after it is its own.
pub fn reduce(mut tokens: Vec<Token>, separator: &str) -> Result<StatusItem> {
    check_balance(&tokens)?;

    while let Some((position, name)) = last_function(&tokens) {
        if !matches!(tokens.get(position + 1), Some(Token::Open)) {
            return Err(Error::Syntax(format!(
                "missing opening parenthesis after '{name}'"
            )));
        }

        let args_start = position + 2;
        let Some(close) = tokens[args_start..]
            .iter()
            .position(|token| matches!(token, Token::Close))
            .map(|offset| args_start + offset)
        else {
            return Err(Error::Syntax(format!(
                "missing closing parenthesis for '{name}'"
            )));
        };

        let mut params = Vec::with_capacity(close - args_start);
        for token in &tokens[args_start..close] {
            match token {
                Token::Item(item) => params.push(item.clone()),
                other => {
                    return Err(Error::Syntax(format!(
                        "unexpected {} in parameters of '{name}'",
                        other.describe()
                    )));
                }
            }
        }

        let function =
            Function::from_name(&name).ok_or_else(|| Error::UnknownFunction(name.clone()))?;
        let result = function.apply(&params, separator);
        tracing::debug!(
            function = function.name(),
            params = params.len(),
            state = %result.state,
            "reduced function application"
        );

        tokens.drain(position + 1..=close);
        tokens[position] = Token::Item(result);
    }

    if tokens.len() != 1 {
        return Err(Error::UnreducedScript(tokens.len()));
    }
    match tokens.pop() {
        Some(Token::Item(item)) => Ok(item),
        Some(other) => Err(Error::Syntax(format!(
            "script reduced to {} instead of a value",
            other.describe()
        ))),
        None => Err(Error::UnreducedScript(0)),
    }
}

fn last_function(tokens: &[Token]) -> Option<(usize, String)> {
    tokens
        .iter()
        .enumerate()
        .rev()
        .find_map(|(position, token)| match token {
            Token::Function(name) => Some((position, name.clone())),
            _ => None,
        })
}

fn check_balance(tokens: &[Token]) -> Result<()> {
    let mut depth = 0usize;
    for token in tokens {
        match token {
            Token::Open => depth += 1,
            Token::Close => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::Syntax("closing parenthesis without opening one".to_owned())
                })?;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(Error::Syntax(format!(
            "unclosed parenthesis (depth {depth} at end of script)"
        )));
    }
    Ok(())
}
