//! Module for parsing Gene Protein Reaction strings into association trees

use crate::io::gpr_parse::parser::ParseError;
use crate::sbml::Association;
use thiserror::Error;

mod lexer;
pub mod parser;
mod token;

use token::Token;

/// Parse a Gene Protein Reaction string into an association tree
///
/// # Parameters
/// - `input`: &str representing the gene protein reaction rule, using `and`, `or` and
///   parentheses (keywords are case-insensitive, `and` binds tighter than `or`)
///
/// # Returns
/// Parse result which is
/// - `Ok`: The root node of the association tree
/// - `Err`: Returns the GprParseError describing the issue with the GPR rule which
///     was being parsed.
///
/// # Examples
/// ```rust
/// use cobrars_sbml::io::gpr_parse::parse_gpr;
/// use cobrars_sbml::sbml::Association;
/// let gpr_tree = parse_gpr("Rv0001 and Rv0002").unwrap();
/// assert!(matches!(gpr_tree, Association::And(_)));
/// ```
pub fn parse_gpr(input: &str) -> Result<Association, GprParseError> {
    // Convert the GPR string into tokens
    let tokens = lexer::Lexer::new(input).scan_tokens();

    // Now parse those tokens into an association tree
    let mut parser = parser::GPRParser::new(tokens);
    Ok(parser.parse()?)
}

/// Gene identifiers appearing in a GPR string, in order of first appearance
///
/// This does not require the rule to be well formed.
pub fn gene_ids(input: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for token in lexer::Lexer::new(input).scan_tokens() {
        if let Token::Gene(id) = token {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Rewrite every gene identifier of a GPR string with `rewrite`
///
/// Keywords, parentheses and whitespace are kept exactly as they are.
pub fn rewrite_gene_ids<F>(input: &str, rewrite: F) -> String
where
    F: Fn(&str) -> String,
{
    let (source, tokens) = lexer::Lexer::new(input).scan_spanned();
    let mut output = String::with_capacity(input.len());
    let mut position = 0;
    for spanned in tokens {
        output.extend(&source[position..spanned.start]);
        let text: String = source[spanned.start..spanned.end].iter().collect();
        match spanned.token {
            Token::Gene(_) => output.push_str(&rewrite(&text)),
            _ => output.push_str(&text),
        }
        position = spanned.end;
    }
    output.extend(&source[position..]);
    output
}

/// Enum representing possible GPR parse errors
#[derive(Debug, Error)]
pub enum GprParseError {
    /// Parsing Error
    #[error("Error occurred during parsing (conversion of tokens to GPR tree)")]
    ParsingError(#[from] ParseError),
}
