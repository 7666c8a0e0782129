use crate::io::gpr_parse::token::Token;
use crate::sbml::Association;

use thiserror::Error;
/*
GPR Grammar:
expression -> conjunction ( "OR" conjunction )* ;
conjunction -> primary ( "AND" primary )* ;
primary -> GENE | "(" expression ")" ;

e.g. ( Gene1 AND Gene2 ) OR Gene3
 */

static EOF: Token = Token::Eof;

/// GPR Parser
pub struct GPRParser {
    /// Vector of tokens from the GPR string
    tokens: Vec<Token>,
    /// Current token being processed
    current: usize,
}

impl GPRParser {
    /// Create a new GPRParser, `tokens` must end with [`Token::Eof`]
    pub fn new(tokens: Vec<Token>) -> GPRParser {
        GPRParser { tokens, current: 0 }
    }

    // region Parsing Functions

    /// Parse the token vector into an association tree
    pub fn parse(&mut self) -> Result<Association, ParseError> {
        let association = self.expression()?;
        if !self.is_at_end() {
            // If entire expression has not been parsed, and error has occured
            return Err(ParseError::EarlyTermination);
        }
        Ok(association)
    }

    fn expression(&mut self) -> Result<Association, ParseError> {
        let mut operands = vec![self.conjunction()?];
        while self.match_token(Token::Or) {
            operands.push(self.conjunction()?);
        }
        Ok(Self::combine(operands, Association::Or))
    }

    fn conjunction(&mut self) -> Result<Association, ParseError> {
        let mut operands = vec![self.primary()?];
        while self.match_token(Token::And) {
            operands.push(self.primary()?);
        }
        Ok(Self::combine(operands, Association::And))
    }

    fn primary(&mut self) -> Result<Association, ParseError> {
        if let Some(identifier) = self.match_identifier() {
            return Ok(Association::GeneProductRef(identifier));
        }

        if self.match_token(Token::LeftParen) {
            let expr = self.expression()?;
            self.consume(Token::RightParen, "Expect ')' after expression.")?;
            return Ok(expr);
        }

        Err(ParseError::ExpectedExpression)
    }

    /// A single operand stands on its own, more become an n-ary node
    fn combine(
        mut operands: Vec<Association>,
        operation: fn(Vec<Association>) -> Association,
    ) -> Association {
        if operands.len() == 1 {
            if let Some(operand) = operands.pop() {
                return operand;
            }
        }
        operation(operands)
    }

    // endregion Parsing Functions

    // region parsing helper functions

    /// Check whether the token at the current position matches `token`, if it does advance
    /// [`self.current`] and return true, otherwise return false
    fn match_token(&mut self, token: Token) -> bool {
        if self.check(&token) {
            self.advance();
            return true;
        }
        false
    }

    /// Similar to [`match_token`], but for matching an identifier token. If the current
    /// token is an identifier return `Some(GeneId)`, where GeneId is the gene's string identifier,
    /// otherwise return None
    fn match_identifier(&mut self) -> Option<String> {
        if let Token::Gene(id) = self.peek() {
            let id = id.clone();
            self.advance();
            return Some(id);
        }
        None
    }

    /// Check whether the current token matches the provided `token`
    fn check(&self, token: &Token) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek() == token
    }

    /// Advance `self.current` one position unless at end of the token Vec
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// Check whether the parser is at the end of the source Vec
    fn is_at_end(&self) -> bool {
        *self.peek() == Token::Eof
    }

    /// Get the current token, a missing `Eof` is treated as the end
    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&EOF)
    }

    /// Check whether the current token matches an input token, if it matches advance to the
    /// next token, and if it doesn't return an error. Used mainly for matching parenthesis in
    /// source GPR vec.
    fn consume(&mut self, token: Token, msg: &str) -> Result<(), ParseError> {
        if self.check(&token) {
            self.advance();
            return Ok(());
        }

        Err(ParseError::MissingToken(msg.to_string()))
    }

    // endregion parsing helper functions
}

/// Enum representing possible parse errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    /// Missing expected token (e.g. a right parenthesis)
    #[error("Missing expected token: {0}")]
    MissingToken(String),
    /// No expression found when one was expected
    #[error("No expression found, check that the GPR string is not empty")]
    ExpectedExpression,
    /// Expression was not completed when parsing terminated
    #[error("Parsing terminated early, check for an unmatched `)` or two adjacent gene identifiers")]
    EarlyTermination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::gpr_parse::lexer::Lexer;

    fn parse(input: &str) -> Result<Association, ParseError> {
        GPRParser::new(Lexer::new(input).scan_tokens()).parse()
    }

    fn gene(id: &str) -> Association {
        Association::GeneProductRef(id.to_string())
    }

    #[test]
    fn single_gene_parse() {
        match parse("Rv1304").unwrap() {
            Association::GeneProductRef(gene) => {
                if gene != "Rv1304" {
                    panic!("Wrong Gene");
                }
            }
            _ => panic!("Incorrect Parse Result (Should have been single gene)"),
        }
    }

    #[test]
    fn and_parse() {
        match parse("Rv1304 and Rv0023 AND Rv0024").unwrap() {
            Association::And(operands) => {
                assert_eq!(operands, vec![gene("Rv1304"), gene("Rv0023"), gene("Rv0024")]);
            }
            _ => panic!("Should have been an AND operation"),
        }
    }

    #[test]
    fn or_parse() {
        match parse("Rv1304 or Rv0023").unwrap() {
            Association::Or(operands) => {
                assert_eq!(operands, vec![gene("Rv1304"), gene("Rv0023")]);
            }
            _ => panic!("Should have been an OR operation"),
        }
    }

    #[test]
    fn precedence_parse() {
        // and binds tighter than or
        match parse("a or b and c").unwrap() {
            Association::Or(operands) => {
                assert_eq!(operands[0], gene("a"));
                assert_eq!(operands[1], Association::And(vec![gene("b"), gene("c")]));
            }
            _ => panic!("Should have been an OR operation"),
        }
    }

    #[test]
    fn grouping_parse() {
        match parse("(Rv3141 or Rv0023) and Rv018").unwrap() {
            Association::And(operands) => {
                assert_eq!(
                    operands[0],
                    Association::Or(vec![gene("Rv3141"), gene("Rv0023")])
                );
                assert_eq!(operands[1], gene("Rv018"));
            }
            _ => panic!("Should have parsed an AND operation"),
        }
    }

    #[test]
    fn redundant_parentheses() {
        assert_eq!(parse("((g1))").unwrap(), gene("g1"));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse(""), Err(ParseError::ExpectedExpression));
        assert_eq!(parse("a and"), Err(ParseError::ExpectedExpression));
        assert!(matches!(parse("(a or b"), Err(ParseError::MissingToken(_))));
        assert_eq!(parse("a b"), Err(ParseError::EarlyTermination));
        assert_eq!(parse("a)"), Err(ParseError::EarlyTermination));
    }
}
