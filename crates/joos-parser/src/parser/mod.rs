//! Recursive-descent parser for Joos.
//!
//! Spec §1 treats "the lexer and LALR parser that produce the parse tree" and
//! "the parse-tree-to-AST visitor" as an external collaborator not redesigned
//! by this specification — this parser plays that role directly, producing
//! the AST in one pass instead of going through an intermediate parse tree.
//! Structure (token-stream-with-lookahead, `expect`/`check` helpers, error
//! accumulation with statement-boundary recovery) follows the teacher's
//! `raya_parser::parser::Parser`.

pub mod error;
pub mod expr;
pub mod precedence;
pub mod stmt;
pub mod types;

use crate::ast::*;
use crate::lexer::Lexer;
use crate::span::{FileId, Span};
use crate::token::Token;

pub use error::ParseError;

pub struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    errors: Vec<ParseError>,
    ids: NodeIdGen,
    file: FileId,
}

impl Parser {
    pub fn new(file: FileId, source: &str) -> Result<Self, Vec<crate::lexer::LexError>> {
        let tokens = Lexer::new(file, source).tokenize()?;
        Ok(Parser {
            tokens,
            pos: 0,
            errors: Vec::new(),
            ids: NodeIdGen::new(),
            file,
        })
    }

    /// Parse one source file into a [`CompilationUnit`] (spec §3 "program"
    /// node). Collects every parse error it can before failing, per §7.
    pub fn parse_compilation_unit(mut self) -> Result<CompilationUnit, Vec<ParseError>> {
        let package = if self.check(&Token::Package) {
            match self.parse_package_decl() {
                Ok(p) => Some(p),
                Err(e) => {
                    self.errors.push(e);
                    None
                }
            }
        } else {
            None
        };

        let mut imports = Vec::new();
        while self.check(&Token::Import) {
            match self.parse_import_decl() {
                Ok(i) => imports.push(i),
                Err(e) => {
                    self.errors.push(e);
                    self.sync_to_semicolon();
                }
            }
        }

        let type_decl = match self.parse_type_decl() {
            Ok(t) => Some(t),
            Err(e) => {
                self.errors.push(e);
                None
            }
        };

        if !self.at_eof() {
            let span = self.current_span();
            self.errors.push(ParseError::unexpected("end of file", self.current(), span));
        }

        match (type_decl, self.errors.is_empty()) {
            (Some(type_decl), true) => Ok(CompilationUnit { file: self.file, package, imports, type_decl }),
            _ => Err(self.errors),
        }
    }

    fn parse_package_decl(&mut self) -> Result<PackageDecl, ParseError> {
        let start = self.current_span();
        self.expect(&Token::Package)?;
        let path = self.parse_name_path()?;
        self.expect(&Token::Semicolon)?;
        Ok(PackageDecl { span: start.merge(&path.last().unwrap().span), path })
    }

    fn parse_import_decl(&mut self) -> Result<ImportDecl, ParseError> {
        let start = self.current_span();
        self.expect(&Token::Import)?;
        let path = self.parse_name_path()?;
        // `import a.b.*;` — parse_name_path stops just before `.` `*`, so a
        // dangling `.` here means an on-demand import.
        let on_demand = if self.check(&Token::Dot) {
            self.advance();
            self.expect(&Token::Star)?;
            true
        } else {
            false
        };
        let end = self.current_span();
        self.expect(&Token::Semicolon)?;
        Ok(ImportDecl { span: start.merge(&end), path, on_demand })
    }

    /// Parses `a.b.c` or, when followed by `.` `*`, `a.b` with `on_demand`
    /// signalled to the caller via the trailing star token.
    fn parse_name_path(&mut self) -> Result<Vec<Ident>, ParseError> {
        let mut segments = vec![self.parse_ident()?];
        while self.check(&Token::Dot) {
            if matches!(self.peek(), Some(Token::Star)) {
                break;
            }
            self.advance();
            segments.push(self.parse_ident()?);
        }
        Ok(segments)
    }

    fn parse_type_decl(&mut self) -> Result<TypeDecl, ParseError> {
        let modifiers = self.parse_modifiers()?;
        match self.current() {
            Token::Class => self.parse_class_decl(modifiers).map(TypeDecl::Class),
            Token::Interface => self.parse_interface_decl(modifiers).map(TypeDecl::Interface),
            _ => {
                let span = self.current_span();
                Err(ParseError::unexpected("`class` or `interface`", self.current(), span))
            }
        }
    }

    fn parse_modifiers(&mut self) -> Result<Modifiers, ParseError> {
        let mut m = Modifiers::default();
        loop {
            match self.current() {
                Token::Public => { m.public = true; self.advance(); }
                Token::Protected => { m.protected = true; self.advance(); }
                Token::Static => { m.is_static = true; self.advance(); }
                Token::Abstract => { m.abstract_ = true; self.advance(); }
                Token::Final => { m.final_ = true; self.advance(); }
                Token::Native => { m.native = true; self.advance(); }
                _ => break,
            }
        }
        Ok(m)
    }

    fn parse_class_decl(&mut self, modifiers: Modifiers) -> Result<ClassDecl, ParseError> {
        let start = self.current_span();
        self.expect(&Token::Class)?;
        let name = self.parse_ident()?;
        let super_class = if self.check(&Token::Extends) {
            self.advance();
            Some(self.parse_type_name()?)
        } else {
            None
        };
        let mut interfaces = Vec::new();
        if self.check(&Token::Implements) {
            self.advance();
            interfaces.push(self.parse_type_name()?);
            while self.check(&Token::Comma) {
                self.advance();
                interfaces.push(self.parse_type_name()?);
            }
        }
        self.expect(&Token::LBrace)?;
        let mut fields = Vec::new();
        let mut constructors = Vec::new();
        let mut methods = Vec::new();
        while !self.check(&Token::RBrace) && !self.at_eof() {
            self.parse_class_member(&name, &mut fields, &mut constructors, &mut methods)?;
        }
        let end = self.current_span();
        self.expect(&Token::RBrace)?;
        Ok(ClassDecl {
            id: self.ids.next(),
            modifiers,
            name,
            super_class,
            interfaces,
            fields,
            constructors,
            methods,
            span: start.merge(&end),
        })
    }

    fn parse_interface_decl(&mut self, modifiers: Modifiers) -> Result<InterfaceDecl, ParseError> {
        let start = self.current_span();
        self.expect(&Token::Interface)?;
        let name = self.parse_ident()?;
        let mut extends = Vec::new();
        if self.check(&Token::Extends) {
            self.advance();
            extends.push(self.parse_type_name()?);
            while self.check(&Token::Comma) {
                self.advance();
                extends.push(self.parse_type_name()?);
            }
        }
        self.expect(&Token::LBrace)?;
        let mut methods = Vec::new();
        while !self.check(&Token::RBrace) && !self.at_eof() {
            let method_modifiers = self.parse_modifiers()?;
            let return_type = Some(self.parse_return_type()?);
            let method_name = self.parse_ident()?;
            let params = self.parse_param_list()?;
            self.expect(&Token::Semicolon)?;
            let span = method_name.span;
            methods.push(MethodDecl {
                id: self.ids.next(),
                modifiers: method_modifiers,
                is_constructor: false,
                return_type,
                name: method_name,
                params,
                body: None,
                span,
            });
        }
        let end = self.current_span();
        self.expect(&Token::RBrace)?;
        Ok(InterfaceDecl { id: self.ids.next(), modifiers, name, extends, methods, span: start.merge(&end) })
    }

    fn parse_class_member(
        &mut self,
        class_name: &Ident,
        fields: &mut Vec<FieldDecl>,
        constructors: &mut Vec<MethodDecl>,
        methods: &mut Vec<MethodDecl>,
    ) -> Result<(), ParseError> {
        let start = self.current_span();
        let modifiers = self.parse_modifiers()?;

        // Constructor: `Name(...)`.
        if matches!(self.current(), Token::Identifier(n) if n == &class_name.name)
            && matches!(self.peek(), Some(Token::LParen))
        {
            let name = self.parse_ident()?;
            let params = self.parse_param_list()?;
            let body = Some(self.parse_block()?);
            constructors.push(MethodDecl {
                id: self.ids.next(),
                modifiers,
                is_constructor: true,
                return_type: None,
                name,
                params,
                body,
                span: start.merge(&self.previous_span()),
            });
            return Ok(());
        }

        // `void` can only start a method declaration, never a field.
        if self.check(&Token::Void) {
            let return_type = self.parse_return_type()?;
            let name = self.parse_ident()?;
            let params = self.parse_param_list()?;
            let body = if self.check(&Token::Semicolon) {
                self.advance();
                None
            } else {
                Some(self.parse_block()?)
            };
            methods.push(MethodDecl {
                id: self.ids.next(),
                modifiers,
                is_constructor: false,
                return_type: Some(return_type),
                name,
                params,
                body,
                span: start.merge(&self.previous_span()),
            });
            return Ok(());
        }

        let ty = self.parse_type_ref()?;
        let name = self.parse_ident()?;

        if self.check(&Token::LParen) {
            let params = self.parse_param_list()?;
            let body = if self.check(&Token::Semicolon) {
                self.advance();
                None
            } else {
                Some(self.parse_block()?)
            };
            methods.push(MethodDecl {
                id: self.ids.next(),
                modifiers,
                is_constructor: false,
                return_type: Some(ty),
                name,
                params,
                body,
                span: start.merge(&self.previous_span()),
            });
        } else {
            let initializer = if self.check(&Token::Assign) {
                self.advance();
                Some(self.parse_expr()?)
            } else {
                None
            };
            let end = self.current_span();
            self.expect(&Token::Semicolon)?;
            fields.push(FieldDecl {
                id: self.ids.next(),
                modifiers,
                ty,
                name,
                initializer,
                span: start.merge(&end),
            });
        }
        Ok(())
    }

    fn parse_return_type(&mut self) -> Result<TypeRef, ParseError> {
        if self.check(&Token::Void) {
            let span = self.current_span();
            self.advance();
            Ok(TypeRef::Void(span))
        } else {
            self.parse_type_ref()
        }
    }

    fn parse_param_list(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            params.push(self.parse_param()?);
            while self.check(&Token::Comma) {
                self.advance();
                params.push(self.parse_param()?);
            }
        }
        self.expect(&Token::RParen)?;
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let ty = self.parse_type_ref()?;
        let name = self.parse_ident()?;
        let span = ty.span().merge(&name.span);
        Ok(Param { id: self.ids.next(), ty, name, span })
    }

    fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        let span = self.current_span();
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(Ident { name, span })
            }
            other => Err(ParseError::unexpected("identifier", &other, span)),
        }
    }

    // -- token-stream plumbing, mirroring the teacher's Parser ------------

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(t, _)| t)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .map(|(t, _)| t)
            .unwrap_or(&Token::Eof)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].1
    }

    pub(crate) fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn expect(&mut self, expected: &Token) -> Result<Token, ParseError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            let span = self.current_span();
            Err(ParseError::unexpected(format!("{expected:?}"), self.current(), span))
        }
    }

    pub(crate) fn next_id(&self) -> NodeId {
        self.ids.next()
    }

    /// Error-recovery: skip to the next `;` or EOF, so a malformed import
    /// doesn't cascade into spurious errors for the rest of the file.
    fn sync_to_semicolon(&mut self) {
        while !self.at_eof() && !self.check(&Token::Semicolon) {
            self.advance();
        }
        if self.check(&Token::Semicolon) {
            self.advance();
        }
    }
}
