#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Equals,
    IsEqual,
    NotEqual,

    /// Digits only; the sign is a separate `Minus` token.
    Integer(String),
    String(String),
    Identifier(String),

    Unknown(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, start_byte: usize, end_byte: usize) -> Self {
        Self {
            token_type,
            span: Span {
                start_byte,
                end_byte,
            },
        }
    }
}
