use crate::token::{Token, TokenType};

/// Turns expression text into a flat token stream.
///
/// Scanning never fails: characters outside the expression language become
/// `TokenType::Unknown` so the evaluator can report them as bad operands.
pub struct Scanner<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            tokens: vec![],
        }
    }

    pub fn scan(mut self) -> Vec<Token> {
        while !self.is_at_eof() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '+' => self.add_token(TokenType::Plus),
            '-' => self.add_token(TokenType::Minus),
            '*' => self.add_token(TokenType::Asterisk),
            '/' => self.add_token(TokenType::Slash),
            '%' => self.add_token(TokenType::Percent),
            '<' => {
                let token_type = if self.match_token('=') {
                    TokenType::LessThanEqual
                } else {
                    TokenType::LessThan
                };
                self.add_token(token_type)
            }
            '>' => {
                let token_type = if self.match_token('=') {
                    TokenType::GreaterThanEqual
                } else {
                    TokenType::GreaterThan
                };
                self.add_token(token_type)
            }
            '!' => {
                let token_type = if self.match_token('=') {
                    TokenType::NotEqual
                } else {
                    TokenType::Unknown('!')
                };
                self.add_token(token_type)
            }
            '=' => {
                let token_type = if self.match_token('=') {
                    TokenType::IsEqual
                } else {
                    TokenType::Equals
                };
                self.add_token(token_type)
            }
            '"' => self.string(),
            c if c.is_whitespace() => {}
            c if c.is_ascii_digit() => {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
                let digits = self.source[self.start..self.current].to_string();
                self.add_token(TokenType::Integer(digits))
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    self.advance();
                }
                let identifier = self.source[self.start..self.current].to_string();
                self.add_token(TokenType::Identifier(identifier))
            }
            other => self.add_token(TokenType::Unknown(other)),
        }
    }

    fn string(&mut self) {
        let body_start = self.current;
        while self.peek().is_some_and(|c| c != '"') {
            self.advance();
        }

        if self.is_at_eof() {
            // Unterminated: report the quote alone and rescan what follows it.
            self.current = body_start;
            self.add_token(TokenType::Unknown('"'));
            return;
        }

        let string = self.source[body_start..self.current].to_string();
        self.advance();
        self.add_token(TokenType::String(string))
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.tokens
            .push(Token::new(token_type, self.start, self.current))
    }

    fn advance(&mut self) -> char {
        let ch = self.source[self.current..].chars().next().unwrap_or('\0');
        self.current += ch.len_utf8();
        ch
    }

    fn match_token(&mut self, expected: char) -> bool {
        if self.peek() != Some(expected) {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    fn is_at_eof(&self) -> bool {
        self.current >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }
}

pub fn scan(source: &str) -> Vec<Token> {
    Scanner::new(source).scan()
}
