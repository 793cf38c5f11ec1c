use crate::core::errors::{CircuitError, Result};
use serde::{Deserialize, Serialize};

/// Roles a symbol can play in an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorRole {
    And,
    Or,
    Xor,
    Not,
    OpenParen,
    CloseParen,
    Separator,
}

impl std::fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperatorRole::And => "AND",
            OperatorRole::Or => "OR",
            OperatorRole::Xor => "XOR",
            OperatorRole::Not => "NOT",
            OperatorRole::OpenParen => "(",
            OperatorRole::CloseParen => ")",
            OperatorRole::Separator => "Separator",
        };
        write!(f, "{}", name)
    }
}

/// Characters that may appear in an input name
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Symbol table mapping every operator role to the text that spells it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notation {
    pub label: String,
    pub and: String,
    pub or: String,
    pub xor: String,
    pub not: String,
    pub open_paren: String,
    pub close_paren: String,
    pub separator: String,
}

/// Keys of the built-in notations, in display order
pub const PRESET_KEYS: [&str; 5] = ["|", "||", "+", "OR", "or"];

impl Notation {
    /// Look up a built-in notation by its key
    pub fn preset(key: &str) -> Option<Notation> {
        let (label, and, or, xor, not) = match key {
            "|" => ("Programming 1 (&, |, ^, !)", "&", "|", "^", "!"),
            "||" => ("Programming 2 (&&, ||, ^, !)", "&&", "||", "^", "!"),
            "+" => ("Algebraic (*, +, ^, !)", "*", "+", "^", "!"),
            "OR" => ("Literal 1 (AND, OR, XOR, NOT)", "AND", "OR", "XOR", "NOT"),
            "or" => ("Literal 2 (and, or, xor, not)", "and", "or", "xor", "not"),
            _ => return None,
        };
        Some(Notation {
            label: label.to_string(),
            and: and.to_string(),
            or: or.to_string(),
            xor: xor.to_string(),
            not: not.to_string(),
            open_paren: "(".to_string(),
            close_paren: ")".to_string(),
            separator: " ".to_string(),
        })
    }

    /// Build and validate a custom notation
    pub fn custom(
        and: &str,
        or: &str,
        xor: &str,
        not: &str,
        open_paren: &str,
        close_paren: &str,
        separator: &str,
    ) -> Result<Notation> {
        let notation = Notation {
            label: "Custom".to_string(),
            and: and.to_string(),
            or: or.to_string(),
            xor: xor.to_string(),
            not: not.to_string(),
            open_paren: open_paren.to_string(),
            close_paren: close_paren.to_string(),
            separator: separator.to_string(),
        };
        notation.validate()?;
        Ok(notation)
    }

    pub fn symbol(&self, role: OperatorRole) -> &str {
        match role {
            OperatorRole::And => &self.and,
            OperatorRole::Or => &self.or,
            OperatorRole::Xor => &self.xor,
            OperatorRole::Not => &self.not,
            OperatorRole::OpenParen => &self.open_paren,
            OperatorRole::CloseParen => &self.close_paren,
            OperatorRole::Separator => &self.separator,
        }
    }

    /// Every role with its symbol
    pub fn symbols(&self) -> [(OperatorRole, &str); 7] {
        [
            (OperatorRole::And, self.and.as_str()),
            (OperatorRole::Or, self.or.as_str()),
            (OperatorRole::Xor, self.xor.as_str()),
            (OperatorRole::Not, self.not.as_str()),
            (OperatorRole::OpenParen, self.open_paren.as_str()),
            (OperatorRole::CloseParen, self.close_paren.as_str()),
            (OperatorRole::Separator, self.separator.as_str()),
        ]
    }

    /// Check that the symbols can be told apart while tokenizing.
    ///
    /// Every symbol must be non-empty and unique. A symbol is either a word
    /// (identifier characters only, matched as a whole word) or punctuation
    /// (no identifier characters); mixing the two is ambiguous. The separator
    /// must be punctuation or whitespace.
    pub fn validate(&self) -> Result<()> {
        let symbols = self.symbols();
        for (index, (role, symbol)) in symbols.iter().enumerate() {
            if symbol.is_empty() {
                return Err(CircuitError::ParseError(format!("Symbol for {} is empty", role)));
            }
            let word_chars = symbol.chars().filter(|c| is_identifier_char(*c)).count();
            if word_chars != 0 && word_chars != symbol.chars().count() {
                return Err(CircuitError::ParseError(format!(
                    "Symbol \"{}\" for {} mixes letters and punctuation",
                    symbol, role
                )));
            }
            if *role == OperatorRole::Separator && word_chars != 0 {
                return Err(CircuitError::ParseError(format!(
                    "Separator \"{}\" cannot contain letters or digits",
                    symbol
                )));
            }
            if let Some((other, _)) = symbols[..index].iter().find(|(_, s)| s == symbol) {
                return Err(CircuitError::ParseError(format!(
                    "Symbol \"{}\" is used for both {} and {}",
                    symbol, other, role
                )));
            }
        }
        Ok(())
    }
}

impl Default for Notation {
    fn default() -> Self {
        Self {
            label: "Programming 1 (&, |, ^, !)".to_string(),
            and: "&".to_string(),
            or: "|".to_string(),
            xor: "^".to_string(),
            not: "!".to_string(),
            open_paren: "(".to_string(),
            close_paren: ")".to_string(),
            separator: " ".to_string(),
        }
    }
}
