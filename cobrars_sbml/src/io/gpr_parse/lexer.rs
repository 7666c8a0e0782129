//! Lex a GPR string into a series of tokens for later parsing
//!
//! Gene identifiers in SBML models contain all sorts of characters (`.`, `-`, `:`), so
//! everything that is not whitespace or a parenthesis is part of an identifier.

use crate::io::gpr_parse::token::{SpannedToken, Token};

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<SpannedToken>,
    start: usize,
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    /// Lex the source into tokens, ending with [`Token::Eof`]
    pub fn scan_tokens(mut self) -> Vec<Token> {
        self.scan();
        self.tokens.into_iter().map(|t| t.token).collect()
    }

    /// Lex the source, keeping the character range of each token (`Eof` is not included)
    pub fn scan_spanned(mut self) -> (Vec<char>, Vec<SpannedToken>) {
        self.scan();
        self.tokens.retain(|t| t.token != Token::Eof);
        (self.source, self.tokens)
    }

    fn scan(&mut self) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }
        self.start = self.current;
        self.add_token(Token::Eof);
    }

    fn scan_token(&mut self) {
        let c: char = self.advance();
        match c {
            // Single Character Tokens
            '(' => self.add_token(Token::LeftParen),
            ')' => self.add_token(Token::RightParen),
            // Whitespace
            c if c.is_whitespace() => {}
            // Identifiers and Operators
            _ => self.read_identifier(),
        }
    }

    fn advance(&mut self) -> char {
        let char_at_current = self.source[self.current];
        self.current += 1;
        char_at_current
    }

    fn read_identifier(&mut self) {
        while Lexer::is_identifier_char(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        if text.eq_ignore_ascii_case("and") {
            self.add_token(Token::And)
        } else if text.eq_ignore_ascii_case("or") {
            self.add_token(Token::Or)
        } else {
            self.add_token(Token::Gene(text))
        }
    }

    fn is_identifier_char(c: char) -> bool {
        !(c == '\0' || c == '(' || c == ')' || c.is_whitespace())
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.source[self.current]
    }

    fn add_token(&mut self, token: Token) {
        self.tokens.push(SpannedToken {
            token,
            start: self.start,
            end: self.current,
        });
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::io::gpr_parse::lexer::Lexer;
    use crate::io::gpr_parse::token::Token;

    #[test]
    fn test_single_gene() {
        let tokens = Lexer::new("Rv0023").scan_tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::Gene(String::from("Rv0023")));
        assert_eq!(tokens[1], Token::Eof);
    }

    #[test]
    fn test_grouping() {
        let tokens = Lexer::new("(Rv0023 OR Rv0123)").scan_tokens();
        let expected_tokens = vec![
            Token::LeftParen,
            Token::Gene(String::from("Rv0023")),
            Token::Or,
            Token::Gene(String::from("Rv0123")),
            Token::RightParen,
            Token::Eof,
        ];
        assert_eq!(tokens, expected_tokens);
    }

    #[test]
    fn test_unusual_identifiers() {
        let tokens = Lexer::new("b0001.1 and(G_x-2:y)").scan_tokens();
        assert_eq!(
            tokens,
            vec![
                Token::Gene(String::from("b0001.1")),
                Token::And,
                Token::LeftParen,
                Token::Gene(String::from("G_x-2:y")),
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_inside_identifiers() {
        let tokens = Lexer::new("band ore").scan_tokens();
        assert_eq!(tokens[0], Token::Gene(String::from("band")));
        assert_eq!(tokens[1], Token::Gene(String::from("ore")));
    }

    #[test]
    fn test_spans() {
        let (source, tokens) = Lexer::new("(a or bc)").scan_spanned();
        assert_eq!(tokens.len(), 5);
        let span = &tokens[3];
        assert_eq!(span.token, Token::Gene(String::from("bc")));
        let text: String = source[span.start..span.end].iter().collect();
        assert_eq!(text, "bc");
    }
}
