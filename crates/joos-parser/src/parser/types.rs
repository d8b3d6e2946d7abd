//! Type-reference parsing: primitives, named types, and array brackets.

use super::error::ParseError;
use super::Parser;
use crate::ast::{PrimitiveTypeName, TypeName, TypeRef};
use crate::token::Token;

impl Parser {
    /// Parses a type reference, then greedily consumes trailing `[]` pairs —
    /// spec §3 models arrays as a `TypeRef` wrapper, not a separate grammar
    /// production, so `int[]`, `String[]`, and `int[][]` all fall out of one
    /// loop here.
    pub(crate) fn parse_type_ref(&mut self) -> Result<TypeRef, ParseError> {
        let mut ty = self.parse_unqualified_type_ref()?;
        while self.check(&Token::LBracket) {
            let start = ty.span();
            self.advance();
            let end = self.current_span();
            self.expect(&Token::RBracket)
                .map_err(|_| ParseError::MalformedArrayType { span: start.merge(&end) })?;
            ty = TypeRef::Array(Box::new(ty), start.merge(&end));
        }
        Ok(ty)
    }

    fn parse_unqualified_type_ref(&mut self) -> Result<TypeRef, ParseError> {
        let span = self.current_span();
        let prim = match self.current() {
            Token::Boolean => Some(PrimitiveTypeName::Boolean),
            Token::Byte => Some(PrimitiveTypeName::Byte),
            Token::Short => Some(PrimitiveTypeName::Short),
            Token::Int => Some(PrimitiveTypeName::Int),
            Token::Char => Some(PrimitiveTypeName::Char),
            _ => None,
        };
        if let Some(p) = prim {
            self.advance();
            return Ok(TypeRef::Primitive(p, span));
        }
        if self.check(&Token::Void) {
            self.advance();
            return Ok(TypeRef::Void(span));
        }
        Ok(TypeRef::Named(self.parse_type_name()?))
    }

    pub(crate) fn parse_type_name(&mut self) -> Result<TypeName, ParseError> {
        let first = self.parse_ident()?;
        let start = first.span;
        let mut segments = vec![first];
        while self.check(&Token::Dot) {
            self.advance();
            segments.push(self.parse_ident()?);
        }
        let end = segments.last().unwrap().span;
        Ok(TypeName { id: self.next_id(), segments, span: start.merge(&end) })
    }
}
