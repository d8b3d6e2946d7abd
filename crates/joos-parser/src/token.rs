//! Token kinds produced by the lexer.

use crate::span::Span;
use logos::Logos;

/// A lexical token, paired with its source span by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64),
    CharLiteral(char),
    StringLiteral(String),
    BoolLiteral(bool),
    NullLiteral,

    // Identifier
    Identifier(String),

    // Keywords
    Abstract,
    Boolean,
    Break,
    Byte,
    Char,
    Class,
    Continue,
    Do,
    Else,
    Extends,
    Final,
    For,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Native,
    New,
    Package,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Super,
    This,
    Void,
    While,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AmpAmp,
    PipePipe,
    Amp,
    Pipe,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    Eof,
}

impl Token {
    /// Human-readable name, used in parse-error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::IntLiteral(n) => format!("integer literal `{n}`"),
            Token::CharLiteral(c) => format!("character literal `{c}`"),
            Token::StringLiteral(s) => format!("string literal {s:?}"),
            Token::BoolLiteral(b) => format!("`{b}`"),
            Token::NullLiteral => "`null`".to_string(),
            Token::Identifier(name) => format!("identifier `{name}`"),
            Token::Eof => "end of file".to_string(),
            other => format!("`{other:?}`"),
        }
    }
}

/// Internal logos-driven token enum; converted to [`Token`] after lexing so
/// the rest of the compiler never depends on logos directly.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub(crate) enum LogosToken {
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,

    #[token("abstract")]
    Abstract,
    #[token("boolean")]
    Boolean,
    #[token("break")]
    Break,
    #[token("byte")]
    Byte,
    #[token("char")]
    Char,
    #[token("class")]
    Class,
    #[token("continue")]
    Continue,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("extends")]
    Extends,
    #[token("final")]
    Final,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("implements")]
    Implements,
    #[token("import")]
    Import,
    #[token("instanceof")]
    Instanceof,
    #[token("int")]
    Int,
    #[token("interface")]
    Interface,
    #[token("native")]
    Native,
    #[token("new")]
    New,
    #[token("package")]
    Package,
    #[token("protected")]
    Protected,
    #[token("public")]
    Public,
    #[token("return")]
    Return,
    #[token("short")]
    Short,
    #[token("static")]
    Static,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("void")]
    Void,
    #[token("while")]
    While,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    IntLiteral(i64),

    #[regex(r#"'([^'\\\n]|\\[btnfr\\'\"0]|\\u[0-9a-fA-F]{4})'"#, parse_char)]
    CharLiteral(char),

    #[regex(r#""([^"\\\n]|\\[btnfr\\'"0]|\\u[0-9a-fA-F]{4})*""#, parse_string)]
    StringLiteral(String),

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
}

fn parse_char(lex: &logos::Lexer<LogosToken>) -> Option<char> {
    let inner = &lex.slice()[1..lex.slice().len() - 1];
    unescape(inner).and_then(|s| s.chars().next())
}

fn parse_string(lex: &logos::Lexer<LogosToken>) -> Option<String> {
    let inner = &lex.slice()[1..lex.slice().len() - 1];
    unescape(inner)
}

fn unescape(s: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'b' => out.push('\u{8}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'f' => out.push('\u{c}'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '0' => out.push('\0'),
            'u' => {
                let hex: String = (&mut chars).take(4).collect();
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

pub(crate) fn keyword_or_ident(t: LogosToken) -> Token {
    match t {
        LogosToken::Abstract => Token::Abstract,
        LogosToken::Boolean => Token::Boolean,
        LogosToken::Break => Token::Break,
        LogosToken::Byte => Token::Byte,
        LogosToken::Char => Token::Char,
        LogosToken::Class => Token::Class,
        LogosToken::Continue => Token::Continue,
        LogosToken::Do => Token::Do,
        LogosToken::Else => Token::Else,
        LogosToken::Extends => Token::Extends,
        LogosToken::Final => Token::Final,
        LogosToken::For => Token::For,
        LogosToken::If => Token::If,
        LogosToken::Implements => Token::Implements,
        LogosToken::Import => Token::Import,
        LogosToken::Instanceof => Token::Instanceof,
        LogosToken::Int => Token::Int,
        LogosToken::Interface => Token::Interface,
        LogosToken::Native => Token::Native,
        LogosToken::New => Token::New,
        LogosToken::Package => Token::Package,
        LogosToken::Protected => Token::Protected,
        LogosToken::Public => Token::Public,
        LogosToken::Return => Token::Return,
        LogosToken::Short => Token::Short,
        LogosToken::Static => Token::Static,
        LogosToken::Super => Token::Super,
        LogosToken::This => Token::This,
        LogosToken::Void => Token::Void,
        LogosToken::While => Token::While,
        LogosToken::True => Token::BoolLiteral(true),
        LogosToken::False => Token::BoolLiteral(false),
        LogosToken::Null => Token::NullLiteral,
        LogosToken::Identifier(s) => Token::Identifier(s),
        LogosToken::IntLiteral(n) => Token::IntLiteral(n),
        LogosToken::CharLiteral(c) => Token::CharLiteral(c),
        LogosToken::StringLiteral(s) => Token::StringLiteral(s),
        LogosToken::LParen => Token::LParen,
        LogosToken::RParen => Token::RParen,
        LogosToken::LBrace => Token::LBrace,
        LogosToken::RBrace => Token::RBrace,
        LogosToken::LBracket => Token::LBracket,
        LogosToken::RBracket => Token::RBracket,
        LogosToken::Semicolon => Token::Semicolon,
        LogosToken::Comma => Token::Comma,
        LogosToken::Dot => Token::Dot,
        LogosToken::AmpAmp => Token::AmpAmp,
        LogosToken::PipePipe => Token::PipePipe,
        LogosToken::EqualEqual => Token::EqualEqual,
        LogosToken::BangEqual => Token::BangEqual,
        LogosToken::LessEqual => Token::LessEqual,
        LogosToken::GreaterEqual => Token::GreaterEqual,
        LogosToken::Assign => Token::Assign,
        LogosToken::Plus => Token::Plus,
        LogosToken::Minus => Token::Minus,
        LogosToken::Star => Token::Star,
        LogosToken::Slash => Token::Slash,
        LogosToken::Percent => Token::Percent,
        LogosToken::Bang => Token::Bang,
        LogosToken::Amp => Token::Amp,
        LogosToken::Pipe => Token::Pipe,
        LogosToken::Less => Token::Less,
        LogosToken::Greater => Token::Greater,
        LogosToken::Newline => unreachable!("newlines are filtered by the lexer driver"),
        LogosToken::LineComment | LogosToken::BlockComment => {
            unreachable!("comments are skipped by the lexer")
        }
    }
}
