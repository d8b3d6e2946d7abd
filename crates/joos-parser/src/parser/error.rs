//! Parse errors.

use crate::span::Span;
use crate::token::Token;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ParseError {
    #[error("expected {expected} but found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("expected an expression at {span}")]
    ExpectedExpression { span: Span },

    #[error("expected a type at {span}")]
    ExpectedType { span: Span },

    #[error("expected a statement at {span}")]
    ExpectedStatement { span: Span },

    #[error("a file must declare exactly one top-level class or interface ({span})")]
    NoTopLevelType { span: Span },

    #[error("array type brackets must immediately follow the element type or name at {span}")]
    MalformedArrayType { span: Span },
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, found: &Token, span: Span) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.describe(),
            span,
        }
    }
}
