//! Joos Language Parser
//!
//! Lexer, token stream, and recursive-descent parser producing the Joos AST.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser};
pub use span::{FileId, SourceManager, Span};
pub use token::Token;

/// Parse a single source file into a [`ast::CompilationUnit`]. Convenience
/// wrapper combining lexing and parsing for callers (the CLI, tests) that
/// don't need the two stages separately.
pub fn parse_file(file: FileId, source: &str) -> Result<ast::CompilationUnit, Vec<ParseError>> {
    let parser = Parser::new(file, source).map_err(|lex_errors| {
        lex_errors
            .into_iter()
            .map(|e| ParseError::UnexpectedToken {
                expected: "valid token".to_string(),
                found: e.to_string(),
                span: match e {
                    LexError::NonAscii { span, .. }
                    | LexError::UnrecognizedToken { span }
                    | LexError::UnterminatedComment { span } => span,
                },
            })
            .collect::<Vec<_>>()
    })?;
    parser.parse_compilation_unit()
}
