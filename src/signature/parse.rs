// src/signature/parse.rs
//
// Recursive-descent parser for alternative signature text:
//
//   signature  := 'fun' name typeParams? '(' valueParams? ')' (':' type)?
//   typeParams := '<' typeParam (',' typeParam)* '>'
//   typeParam  := name (':' type)?
//   valueParam := 'vararg'? name ':' type
//   type       := name ('.' name)* typeArgs? '?'?
//   typeArgs   := '<' projection (',' projection)* '>'
//   projection := '*' | ('in' | 'out')? type
//
// A parse failure is the syntax mismatch condition: nothing past it runs.

use crate::errors::SignatureMismatch;
use crate::signature::ast::{
    ProjectionAst, SignatureAst, TypeAst, TypeParameterAst, ValueParameterAst,
};
use crate::signature::lexer::Lexer;
use crate::signature::token::{Token, TokenType};
use crate::types::Variance;

pub fn parse_signature(text: &str) -> Result<SignatureAst, SignatureMismatch> {
    let mut parser = Parser::new(text);
    let signature = parser.signature()?;
    parser.consume(TokenType::Eof, "expected end of signature")?;
    Ok(signature)
}

struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token<'src>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Advance to the next token, returning the one just passed
    fn advance(&mut self) -> Token<'src> {
        std::mem::replace(&mut self.current, self.lexer.next_token())
    }

    fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given type, or fail with a syntax condition
    fn consume(&mut self, ty: TokenType, msg: &str) -> Result<Token<'src>, SignatureMismatch> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn error_here(&self, msg: &str) -> SignatureMismatch {
        SignatureMismatch::Syntax {
            message: format!("{}, found '{}'", msg, self.current.ty.as_str()),
            span: self.current.span.into(),
        }
    }

    fn signature(&mut self) -> Result<SignatureAst, SignatureMismatch> {
        self.consume(TokenType::KwFun, "expected 'fun'")?;
        let name_token = self.consume(TokenType::Identifier, "expected function name")?;

        let mut type_parameters = Vec::new();
        if self.match_token(TokenType::Lt) {
            loop {
                type_parameters.push(self.type_parameter()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
            self.consume(TokenType::Gt, "expected '>' after type parameters")?;
        }

        self.consume(TokenType::LParen, "expected '(' before value parameters")?;
        let mut value_parameters = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                value_parameters.push(self.value_parameter()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen, "expected ')' after value parameters")?;

        let return_type = if self.match_token(TokenType::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        Ok(SignatureAst {
            name: name_token.lexeme.to_string(),
            name_span: name_token.span,
            type_parameters,
            value_parameters,
            return_type,
        })
    }

    fn type_parameter(&mut self) -> Result<TypeParameterAst, SignatureMismatch> {
        let name_token = self.consume(TokenType::Identifier, "expected type parameter name")?;

        let mut bounds = Vec::new();
        if self.match_token(TokenType::Colon) {
            bounds.push(self.parse_type()?);
        }

        Ok(TypeParameterAst {
            name: name_token.lexeme.to_string(),
            span: name_token.span,
            bounds,
        })
    }

    fn value_parameter(&mut self) -> Result<ValueParameterAst, SignatureMismatch> {
        let is_vararg = self.match_token(TokenType::KwVararg);
        let name_token = self.consume(TokenType::Identifier, "expected parameter name")?;
        self.consume(TokenType::Colon, "expected ':' after parameter name")?;
        let ty = self.parse_type()?;
        let span = name_token.span.merge(ty.span);

        Ok(ValueParameterAst {
            name: name_token.lexeme.to_string(),
            is_vararg,
            ty,
            span,
        })
    }

    fn parse_type(&mut self) -> Result<TypeAst, SignatureMismatch> {
        let first = self.consume(TokenType::Identifier, "expected type name")?;
        let mut name = first.lexeme.to_string();
        let mut span = first.span;

        while self.match_token(TokenType::Dot) {
            let segment = self.consume(TokenType::Identifier, "expected name after '.'")?;
            name.push('.');
            name.push_str(segment.lexeme);
            span = span.merge(segment.span);
        }

        let mut arguments = Vec::new();
        if self.match_token(TokenType::Lt) {
            loop {
                arguments.push(self.projection()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
            let close = self.consume(TokenType::Gt, "expected '>' after type arguments")?;
            span = span.merge(close.span);
        }

        let nullable = if self.check(TokenType::Question) {
            let question = self.advance();
            span = span.merge(question.span);
            true
        } else {
            false
        };

        Ok(TypeAst {
            name,
            arguments,
            nullable,
            span,
        })
    }

    fn projection(&mut self) -> Result<ProjectionAst, SignatureMismatch> {
        if self.match_token(TokenType::Star) {
            return Ok(ProjectionAst::Star);
        }
        let variance = if self.match_token(TokenType::KwIn) {
            Variance::In
        } else if self.match_token(TokenType::KwOut) {
            Variance::Out
        } else {
            Variance::Invariant
        };
        Ok(ProjectionAst::Argument(variance, self.parse_type()?))
    }
}
