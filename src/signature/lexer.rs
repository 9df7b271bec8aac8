// src/signature/lexer.rs

use crate::signature::token::{Span, Token, TokenType};

pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
        }
    }

    /// Get the next token from the annotation text
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();

        self.start = self.current;

        let Some(c) = self.advance() else {
            return self.make_token(TokenType::Eof);
        };

        match c {
            '<' => self.make_token(TokenType::Lt),
            '>' => self.make_token(TokenType::Gt),
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            ',' => self.make_token(TokenType::Comma),
            ':' => self.make_token(TokenType::Colon),
            '?' => self.make_token(TokenType::Question),
            '*' => self.make_token(TokenType::Star),
            '.' => self.make_token(TokenType::Dot),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            _ => self.make_token(TokenType::Error),
        }
    }

    fn identifier(&mut self) -> Token<'src> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let ty = match &self.source[self.start..self.current] {
            "fun" => TokenType::KwFun,
            "vararg" => TokenType::KwVararg,
            "in" => TokenType::KwIn,
            "out" => TokenType::KwOut,
            _ => TokenType::Identifier,
        };
        self.make_token(ty)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (index, c) = self.chars.next()?;
        self.current = index + c.len_utf8();
        Some(c)
    }

    fn make_token(&self, ty: TokenType) -> Token<'src> {
        Token::new(
            ty,
            &self.source[self.start..self.current],
            Span::new(self.start, self.current),
        )
    }
}
