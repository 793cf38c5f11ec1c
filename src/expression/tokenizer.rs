use super::notation::{is_identifier_char, Notation, OperatorRole};
use crate::core::errors::{CircuitError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    And,
    Or,
    Xor,
    Not,
    OpenParen,
    CloseParen,
    Input(String),
}

impl Token {
    fn from_role(role: OperatorRole) -> Option<Token> {
        match role {
            OperatorRole::And => Some(Token::And),
            OperatorRole::Or => Some(Token::Or),
            OperatorRole::Xor => Some(Token::Xor),
            OperatorRole::Not => Some(Token::Not),
            OperatorRole::OpenParen => Some(Token::OpenParen),
            OperatorRole::CloseParen => Some(Token::CloseParen),
            OperatorRole::Separator => None,
        }
    }
}

/// Split an expression into tokens.
///
/// Runs of identifier characters are either a word operator of the notation
/// or an input name. Everything else is matched against the punctuation
/// symbols, longest first. Whitespace and separators are dropped.
pub fn tokenize(expression: &str, notation: &Notation) -> Result<Vec<Token>> {
    notation.validate()?;

    let mut punctuation: Vec<(OperatorRole, &str)> = notation
        .symbols()
        .into_iter()
        .filter(|(_, symbol)| !symbol.chars().any(is_identifier_char))
        .collect();
    punctuation.sort_by(|(_, a), (_, b)| b.len().cmp(&a.len()));

    let mut tokens = Vec::new();
    let mut rest = expression;
    while let Some(c) = rest.chars().next() {
        if is_identifier_char(c) {
            let end = rest.find(|c: char| !is_identifier_char(c)).unwrap_or(rest.len());
            let word = &rest[..end];
            let operator = notation
                .symbols()
                .into_iter()
                .find(|(_, symbol)| *symbol == word)
                .and_then(|(role, _)| Token::from_role(role));
            tokens.push(operator.unwrap_or_else(|| Token::Input(word.to_string())));
            rest = &rest[end..];
            continue;
        }

        if let Some((role, symbol)) = punctuation
            .iter()
            .find(|(_, symbol)| rest.starts_with(*symbol))
        {
            tokens.extend(Token::from_role(*role));
            rest = &rest[symbol.len()..];
            continue;
        }

        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let position = expression.len() - rest.len();
        return Err(CircuitError::ParseError(format!(
            "Unrecognized symbol \"{}\" at position {}",
            c, position
        )));
    }
    Ok(tokens)
}

/// Input names in order of first appearance, without duplicates
pub fn input_names(tokens: &[Token]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in tokens {
        if let Token::Input(name) = token {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}
