//! Expression parsing: precedence climbing over the binary operator table in
//! `precedence.rs`, plus the classic Java/Joos `(Type)expr` vs `(expr)`
//! lookahead disambiguation.

use super::error::ParseError;
use super::precedence::{self, Precedence};
use super::Parser;
use crate::ast::*;
use crate::token::Token;

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_binary(Precedence::None)?;
        if self.check(&Token::Assign) {
            self.advance();
            let value = Box::new(self.parse_assignment()?);
            let span = target.span().merge(&value.span());
            Ok(Expr::Assign { id: self.next_id(), target: Box::new(target), value, span })
        } else {
            Ok(target)
        }
    }

    /// Precedence climbing; `instanceof` is spliced in at relational
    /// precedence since its right side is a type, not an operand the table
    /// in `precedence.rs` can describe.
    fn parse_binary(&mut self, min_prec: Precedence) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            if matches!(self.current(), Token::Instanceof) && min_prec <= Precedence::Relational {
                self.advance();
                let target_type = self.parse_type_ref()?;
                let span = left.span().merge(&target_type.span());
                left = Expr::InstanceOf {
                    id: self.next_id(),
                    expr: Box::new(left),
                    target_type,
                    span,
                };
                continue;
            }
            let Some((op, prec)) = precedence::binary_op(self.current()) else { break };
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_binary(prec.next())?;
            let span = left.span().merge(&right.span());
            left = Expr::Binary { id: self.next_id(), op, left: Box::new(left), right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        match self.current() {
            Token::Bang => {
                self.advance();
                let operand = Box::new(self.parse_unary()?);
                let span = start.merge(&operand.span());
                Ok(Expr::Unary { id: self.next_id(), op: UnaryOp::Not, operand, span })
            }
            Token::Minus => {
                self.advance();
                let operand = Box::new(self.parse_unary()?);
                let span = start.merge(&operand.span());
                Ok(Expr::Unary { id: self.next_id(), op: UnaryOp::Neg, operand, span })
            }
            Token::LParen if self.looks_like_cast() => {
                self.advance();
                let target_type = self.parse_type_ref()?;
                self.expect(&Token::RParen)?;
                let operand = Box::new(self.parse_unary()?);
                let span = start.merge(&operand.span());
                Ok(Expr::Cast { id: self.next_id(), target_type, expr: operand, span })
            }
            _ => self.parse_postfix(),
        }
    }

    /// `(` is already positioned at `current()`. Distinguishes a cast from a
    /// parenthesized expression by looking past the matching `)`: a
    /// primitive type always casts; a named type casts only when followed by
    /// something that can start a unary expression other than `+`/`-`, which
    /// the Java grammar reserves for the parenthesized-expression reading.
    fn looks_like_cast(&self) -> bool {
        match self.peek_at(1) {
            Token::Boolean | Token::Byte | Token::Short | Token::Int | Token::Char => true,
            Token::Identifier(_) => {
                let mut offset = 2;
                while matches!(self.peek_at(offset), Token::Dot)
                    && matches!(self.peek_at(offset + 1), Token::Identifier(_))
                {
                    offset += 2;
                }
                while matches!(self.peek_at(offset), Token::LBracket)
                    && matches!(self.peek_at(offset + 1), Token::RBracket)
                {
                    offset += 2;
                }
                if !matches!(self.peek_at(offset), Token::RParen) {
                    return false;
                }
                matches!(
                    self.peek_at(offset + 1),
                    Token::Identifier(_)
                        | Token::This
                        | Token::New
                        | Token::Bang
                        | Token::LParen
                        | Token::IntLiteral(_)
                        | Token::CharLiteral(_)
                        | Token::StringLiteral(_)
                        | Token::BoolLiteral(_)
                        | Token::NullLiteral
                )
            }
            _ => false,
        }
    }

    /// Primary expression plus the postfix chain of `.name`, `.name(args)`,
    /// `[index]`, and unqualified `(args)` calls.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current() {
                Token::Dot => {
                    self.advance();
                    let name = self.parse_ident()?;
                    if self.check(&Token::LParen) {
                        let args = self.parse_args()?;
                        let span = expr.span().merge(&self.previous_span());
                        expr = Expr::MethodCall {
                            id: self.next_id(),
                            target: Some(Box::new(expr)),
                            method: name,
                            args,
                            span,
                        };
                    } else {
                        let span = expr.span().merge(&name.span);
                        expr = Expr::FieldAccess { id: self.next_id(), target: Box::new(expr), name, span };
                    }
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    let end = self.current_span();
                    self.expect(&Token::RBracket)?;
                    let span = expr.span().merge(&end);
                    expr = Expr::ArrayAccess { id: self.next_id(), array: Box::new(expr), index: Box::new(index), span };
                }
                Token::LParen if matches!(expr, Expr::Name(_)) => {
                    let Expr::Name(name) = expr else { unreachable!() };
                    let args = self.parse_args()?;
                    let end = self.previous_span();
                    let (target, method) = if name.segments.len() > 1 {
                        let mut prefix = name.segments;
                        let method = prefix.pop().unwrap();
                        let prefix_span = prefix[0].span.merge(&prefix.last().unwrap().span);
                        (
                            Some(Box::new(Expr::Name(Name { id: self.next_id(), segments: prefix, span: prefix_span }))),
                            method,
                        )
                    } else {
                        (None, name.segments.into_iter().next().unwrap())
                    };
                    expr = Expr::MethodCall { id: self.next_id(), target, method, args, span: name.span.merge(&end) };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        match self.current().clone() {
            Token::IntLiteral(n) => {
                self.advance();
                Ok(Expr::Literal { id: self.next_id(), value: Literal::Int(n), span })
            }
            Token::CharLiteral(c) => {
                self.advance();
                Ok(Expr::Literal { id: self.next_id(), value: Literal::Char(c), span })
            }
            Token::StringLiteral(s) => {
                self.advance();
                Ok(Expr::Literal { id: self.next_id(), value: Literal::Str(s), span })
            }
            Token::BoolLiteral(b) => {
                self.advance();
                Ok(Expr::Literal { id: self.next_id(), value: Literal::Bool(b), span })
            }
            Token::NullLiteral => {
                self.advance();
                Ok(Expr::Literal { id: self.next_id(), value: Literal::Null, span })
            }
            Token::This => {
                self.advance();
                Ok(Expr::This { id: self.next_id(), span })
            }
            Token::New => self.parse_new(),
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Identifier(_) => self.parse_name().map(Expr::Name),
            _ => Err(ParseError::ExpectedExpression { span }),
        }
    }

    fn parse_name(&mut self) -> Result<Name, ParseError> {
        let first = self.parse_ident()?;
        let start = first.span;
        let mut segments = vec![first];
        while self.check(&Token::Dot) && matches!(self.peek(), Some(Token::Identifier(_))) {
            self.advance();
            segments.push(self.parse_ident()?);
        }
        let end = segments.last().unwrap().span;
        Ok(Name { id: self.next_id(), segments, span: start.merge(&end) })
    }

    fn parse_new(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        self.expect(&Token::New)?;
        let base_span = self.current_span();
        let base_ty = match self.current() {
            Token::Boolean => { self.advance(); TypeRef::Primitive(PrimitiveTypeName::Boolean, base_span) }
            Token::Byte => { self.advance(); TypeRef::Primitive(PrimitiveTypeName::Byte, base_span) }
            Token::Short => { self.advance(); TypeRef::Primitive(PrimitiveTypeName::Short, base_span) }
            Token::Int => { self.advance(); TypeRef::Primitive(PrimitiveTypeName::Int, base_span) }
            Token::Char => { self.advance(); TypeRef::Primitive(PrimitiveTypeName::Char, base_span) }
            _ => TypeRef::Named(self.parse_type_name()?),
        };
        if self.check(&Token::LBracket) {
            self.advance();
            let size = self.parse_expr()?;
            let end = self.current_span();
            self.expect(&Token::RBracket)?;
            Ok(Expr::NewArray { id: self.next_id(), element_type: base_ty, size: Box::new(size), span: start.merge(&end) })
        } else {
            let args = self.parse_args()?;
            let end = self.previous_span();
            Ok(Expr::NewObject { id: self.next_id(), class: base_ty, args, span: start.merge(&end) })
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            args.push(self.parse_expr()?);
            while self.check(&Token::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }
}
