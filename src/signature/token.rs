// src/signature/token.rs

/// Token types of the alternative-signature annotation grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Identifier,

    // Keywords
    KwFun,
    KwVararg,
    KwIn,
    KwOut,

    // Delimiters
    Lt,
    Gt,
    LParen,
    RParen,
    Comma,
    Colon,
    Question,
    Star,
    Dot,

    // Special
    Eof,
    Error,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::KwFun => "fun",
            Self::KwVararg => "vararg",
            Self::KwIn => "in",
            Self::KwOut => "out",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Question => "?",
            Self::Star => "*",
            Self::Dot => ".",
            Self::Eof => "end of signature",
            Self::Error => "invalid character",
        }
    }
}

/// Byte range within the annotation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Token<'src> {
    pub ty: TokenType,
    pub lexeme: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(ty: TokenType, lexeme: &'src str, span: Span) -> Self {
        Self { ty, lexeme, span }
    }
}
