//! Tokenization of CO source text.

mod cursor;
mod token;

pub use token::{Token, TokenKind};

use co_core::{Issue, IssueKind, Span};

use cursor::Cursor;

/// Tokenize a source string.
///
/// Never fails: unknown characters and malformed numbers produce issues and
/// are skipped, so the parser always receives a well-formed token stream
/// terminated by [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> (Vec<Token<'_>>, Vec<Issue>) {
    let mut lexer = Lexer::new(source);
    lexer.run();
    (lexer.tokens, lexer.issues)
}

struct Lexer<'src> {
    cursor: Cursor<'src>,
    tokens: Vec<Token<'src>>,
    issues: Vec<Issue>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn run(&mut self) {
        loop {
            self.skip_trivia();
            let start = self.cursor.position();
            let Some(ch) = self.cursor.peek() else {
                let end = self.cursor.position();
                self.tokens
                    .push(Token::new(TokenKind::Eof, "", Span::point(end.0, end.1)));
                break;
            };

            match ch {
                c if c.is_ascii_digit() => self.lex_number(start),
                c if c == '_' || c.is_ascii_alphabetic() => self.lex_word(start),
                _ => self.lex_punct(start, ch),
            }
        }
    }

    /// Skip whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.bump();
                }
                Some('/') if self.cursor.peek_second() == Some('/') => {
                    while let Some(c) = self.cursor.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.cursor.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_number(&mut self, start: (u32, u32)) {
        let offset = self.cursor.offset();
        let mut is_double = false;

        self.cursor.eat_while(|c| c.is_ascii_digit());

        // Fractional part; a lone '.' is member access, not a fraction.
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_second().is_some_and(|c| c.is_ascii_digit())
        {
            is_double = true;
            self.cursor.bump();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let mut malformed = false;
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            is_double = true;
            self.cursor.bump();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.bump();
            }
            if !self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
                malformed = true;
            }
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        // Trailing identifier characters make the whole literal malformed
        // ("12ab" is one bad number, not a number and a name).
        if self.cursor.peek().is_some_and(|c| c == '_' || c.is_ascii_alphanumeric()) {
            malformed = true;
            self.cursor.eat_while(|c| c == '_' || c.is_ascii_alphanumeric());
        }

        let lexeme = self.cursor.slice_from(offset);
        let span = self.cursor.span_from(start);

        if malformed {
            self.issues.push(Issue::new(
                IssueKind::MalformedNumber {
                    literal: lexeme.to_string(),
                },
                span,
            ));
            return;
        }

        let kind = if is_double {
            TokenKind::DoubleLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn lex_word(&mut self, start: (u32, u32)) {
        let offset = self.cursor.offset();
        self.cursor.eat_while(|c| c == '_' || c.is_ascii_alphanumeric());
        let lexeme = self.cursor.slice_from(offset);
        let span = self.cursor.span_from(start);
        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn lex_punct(&mut self, start: (u32, u32), ch: char) {
        let offset = self.cursor.offset();
        self.cursor.bump();

        let kind = match ch {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ',' => Some(TokenKind::Comma),
            ';' => Some(TokenKind::Semicolon),
            '.' => Some(TokenKind::Dot),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '&' => {
                if self.cursor.peek() == Some('&') {
                    self.cursor.bump();
                    Some(TokenKind::AndAnd)
                } else {
                    Some(TokenKind::Amp)
                }
            }
            '|' => {
                if self.cursor.peek() == Some('|') {
                    self.cursor.bump();
                    Some(TokenKind::OrOr)
                } else {
                    None
                }
            }
            '=' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    Some(TokenKind::EqualEqual)
                } else {
                    Some(TokenKind::Assign)
                }
            }
            '!' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    Some(TokenKind::NotEqual)
                } else {
                    Some(TokenKind::Bang)
                }
            }
            '<' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    Some(TokenKind::LessEqual)
                } else {
                    Some(TokenKind::Less)
                }
            }
            '>' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.bump();
                    Some(TokenKind::GreaterEqual)
                } else {
                    Some(TokenKind::Greater)
                }
            }
            _ => None,
        };

        let span = self.cursor.span_from(start);
        match kind {
            Some(kind) => {
                let lexeme = self.cursor.slice_from(offset);
                self.tokens.push(Token::new(kind, lexeme, span));
            }
            None => self
                .issues
                .push(Issue::new(IssueKind::UnknownCharacter { ch }, span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, issues) = tokenize(source);
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        use TokenKind::*;
        assert_eq!(
            kinds("class native if else while return this true false foo"),
            vec![
                Class, Native, If, Else, While, Return, This, True, False, Identifier, Eof
            ]
        );
    }

    #[test]
    fn numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("0 42 3.25 1e9 2.5e-3"),
            vec![
                IntLiteral,
                IntLiteral,
                DoubleLiteral,
                DoubleLiteral,
                DoubleLiteral,
                Eof
            ]
        );
    }

    #[test]
    fn member_access_is_not_a_fraction() {
        use TokenKind::*;
        assert_eq!(
            kinds("v.x"),
            vec![Identifier, Dot, Identifier, Eof]
        );
    }

    #[test]
    fn compound_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("< <= > >= == != && || ! = &"),
            vec![
                Less, LessEqual, Greater, GreaterEqual, EqualEqual, NotEqual, AndAnd, OrOr,
                Bang, Assign, Amp, Eof
            ]
        );
    }

    #[test]
    fn line_comments_are_trivia() {
        use TokenKind::*;
        assert_eq!(kinds("1 // comment\n2"), vec![IntLiteral, IntLiteral, Eof]);
    }

    #[test]
    fn malformed_exponent() {
        let (tokens, issues) = tokenize("1e+");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), "E0003");
    }

    #[test]
    fn malformed_number_with_suffix() {
        let (_, issues) = tokenize("12ab");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), "E0003");
    }

    #[test]
    fn unknown_character() {
        let (tokens, issues) = tokenize("a $ b");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), "E0004");
        // The bad character is skipped, both identifiers survive.
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let (tokens, _) = tokenize("ab\n  cd");
        assert_eq!(tokens[0].span, Span::new(1, 1, 1, 3));
        assert_eq!(tokens[1].span, Span::new(2, 3, 2, 5));
    }
}
