use super::tokenizer::Token;
use crate::core::components::ComponentKind;
use crate::core::errors::{CircuitError, Result};

/// Binary operators, each backed by a two-input gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn gate(&self) -> ComponentKind {
        match self {
            BinaryOp::And => ComponentKind::And,
            BinaryOp::Or => ComponentKind::Or,
            BinaryOp::Xor => ComponentKind::Xor,
        }
    }

    fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            BinaryOp::And => left && right,
            BinaryOp::Or => left || right,
            BinaryOp::Xor => left ^ right,
        }
    }
}

/// Parsed boolean expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Input(String),
    Not(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate directly, reading inputs through `value`
    pub fn evaluate(&self, value: &impl Fn(&str) -> bool) -> bool {
        match self {
            Expr::Input(name) => value(name),
            Expr::Not(inner) => !inner.evaluate(value),
            Expr::Binary(op, left, right) => op.apply(left.evaluate(value), right.evaluate(value)),
        }
    }

    /// Number of gates between the inputs and this node, inclusive
    pub fn depth(&self) -> usize {
        match self {
            Expr::Input(_) => 0,
            Expr::Not(inner) => inner.depth() + 1,
            Expr::Binary(_, left, right) => left.depth().max(right.depth()) + 1,
        }
    }
}

/// Deepest gate tree or bracket nesting accepted by [`parse`]
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parse tokens with precedence NOT > AND > XOR > OR; binary operators
/// associate to the left
pub fn parse(tokens: &[Token]) -> Result<Expr> {
    parse_with_depth(tokens, DEFAULT_MAX_DEPTH)
}

/// Parse with a custom limit on [`Expr::depth`] and on the nesting of
/// parentheses and NOT operators.
///
/// Expressions past the limit fail with a parse error instead of building a
/// tree that later recursive passes cannot walk.
pub fn parse_with_depth(tokens: &[Token], max_depth: usize) -> Result<Expr> {
    if tokens.is_empty() {
        return Err(CircuitError::ParseError("Expression is empty".to_string()));
    }
    let mut parser = Parser {
        tokens,
        position: 0,
        max_depth,
        nesting: 0,
    };
    let (expr, _) = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token::CloseParen) => Err(CircuitError::ParseError(format!(
            "Encountered unmatched closing parenthesis at token {}",
            parser.position
        ))),
        Some(token) => Err(CircuitError::ParseError(format!(
            "Missing operator before {} at token {}",
            describe(token),
            parser.position
        ))),
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::And => "AND".to_string(),
        Token::Or => "OR".to_string(),
        Token::Xor => "XOR".to_string(),
        Token::Not => "NOT".to_string(),
        Token::OpenParen => "opening parenthesis".to_string(),
        Token::CloseParen => "closing parenthesis".to_string(),
        Token::Input(name) => format!("input \"{}\"", name),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    max_depth: usize,
    /// Open parentheses and NOT operators around the current position
    nesting: usize,
}

/// A parsed subtree and its gate depth
type Parsed = (Expr, usize);

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        self.position += 1;
        token
    }

    fn too_deep(&self) -> CircuitError {
        CircuitError::ParseError(format!(
            "Expression nests deeper than {} levels at token {}",
            self.max_depth, self.position
        ))
    }

    /// Check the depth of a node about to be built
    fn check_depth(&self, depth: usize) -> Result<usize> {
        if depth > self.max_depth {
            return Err(self.too_deep());
        }
        Ok(depth)
    }

    /// Step into a parenthesis or NOT before recursing
    fn enter(&mut self) -> Result<()> {
        if self.nesting >= self.max_depth {
            return Err(self.too_deep());
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn binary(
        &mut self,
        operator: &Token,
        op: BinaryOp,
        operand: fn(&mut Self) -> Result<Parsed>,
    ) -> Result<Parsed> {
        let (mut left, mut depth) = operand(self)?;
        while self.peek() == Some(operator) {
            self.position += 1;
            let (right, right_depth) = operand(self)?;
            depth = self.check_depth(depth.max(right_depth) + 1)?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok((left, depth))
    }

    fn parse_or(&mut self) -> Result<Parsed> {
        self.binary(&Token::Or, BinaryOp::Or, Self::parse_xor)
    }

    fn parse_xor(&mut self) -> Result<Parsed> {
        self.binary(&Token::Xor, BinaryOp::Xor, Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Parsed> {
        self.binary(&Token::And, BinaryOp::And, Self::parse_not)
    }

    fn parse_not(&mut self) -> Result<Parsed> {
        if self.peek() == Some(&Token::Not) {
            self.position += 1;
            self.enter()?;
            let (inner, depth) = self.parse_not()?;
            self.leave();
            let depth = self.check_depth(depth + 1)?;
            return Ok((Expr::Not(Box::new(inner)), depth));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Parsed> {
        let position = self.position;
        match self.next() {
            Some(Token::Input(name)) => Ok((Expr::Input(name.clone()), 0)),
            Some(Token::OpenParen) => {
                if self.peek() == Some(&Token::CloseParen) {
                    return Err(CircuitError::ParseError(format!(
                        "Empty parentheses at token {}",
                        position
                    )));
                }
                self.enter()?;
                let inner = self.parse_or()?;
                self.leave();
                match self.next() {
                    Some(Token::CloseParen) => Ok(inner),
                    _ => Err(CircuitError::ParseError(format!(
                        "Missing closing parenthesis for the one opened at token {}",
                        position
                    ))),
                }
            }
            Some(token) => Err(CircuitError::ParseError(format!(
                "Missing operand before {} at token {}",
                describe(token),
                position
            ))),
            None => Err(CircuitError::ParseError(
                "Expression ends with an operator".to_string(),
            )),
        }
    }
}
