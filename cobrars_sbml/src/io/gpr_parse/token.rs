//! Tokens of a gene reaction rule

/// Represents Tokens in GPR
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum Token {
    /// Gene identifier, exactly as written in the rule
    Gene(String),
    And,
    Or,
    LeftParen,
    RightParen,
    Eof,
}

/// Token along with the range of characters it was read from
#[derive(Debug, PartialEq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}
