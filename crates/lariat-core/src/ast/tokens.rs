use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Number(String),
    Str(String),
    /// A template literal, pre-split into raw segments and the token streams
    /// of its interpolations.
    Template(Vec<RawTemplatePart>),
    /// '=='
    EqEq,
    /// '==='
    EqEqEq,
    /// '!='
    BangEq,
    /// '!=='
    BangEqEq,
    /// '<'
    Lt,
    /// '<='
    LtEq,
    /// '>'
    Gt,
    /// '>='
    GtEq,
    /// '+'
    Plus,
    /// '-'
    Minus,
    /// '*'
    Star,
    /// '/'
    Slash,
    /// '%'
    Percent,
    /// '&&'
    AmpAmp,
    /// '||'
    PipePipe,
    /// '!'
    Bang,
    /// '=>'
    Arrow,
    /// '('
    LeftParen,
    /// ')'
    RightParen,
    /// '{'
    LeftBrace,
    /// '}'
    RightBrace,
    /// '['
    LeftBracket,
    /// ']'
    RightBracket,
    /// ','
    Comma,
    /// '.'
    Period,
    /// ':'
    Colon,
    /// ';'
    Semicolon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawTemplatePart {
    Str(String),
    Tokens(Vec<Token>),
}

#[derive(Debug)]
struct State<'a> {
    source: &'a str,
    idx: usize,
}

impl<'a> State<'a> {
    fn peek(&self) -> Option<char> {
        self.source[self.idx..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let mut chars = self.source[self.idx..].char_indices();
        match chars.next() {
            Some((_, c)) => {
                match chars.next() {
                    Some((next_idx, _)) => self.idx += next_idx,
                    None => self.idx = self.source.len(),
                }
                Some(c)
            }
            None => None,
        }
    }

    /// Take a slice of the source using the given predicate.
    fn take_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> &'a str {
        let mut end_idx = self.idx;

        let mut chars = self.source[self.idx..].char_indices();
        loop {
            match chars.next() {
                Some((char_idx, c)) => {
                    end_idx = char_idx + self.idx;
                    if !predicate(c) {
                        break;
                    }
                }
                None => {
                    end_idx = self.source.len();
                    break;
                }
            }
        }

        let result = &self.source[self.idx..end_idx];
        self.idx = end_idx;
        result
    }
}

#[derive(Debug)]
pub struct Tokenizer<'a> {
    state: State<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            state: State { source, idx: 0 },
        }
    }

    /// Generate tokens for the configured source.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        // Skip over whitespace.
        self.state.take_while(|c| c.is_whitespace());

        let c = match self.state.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        Ok(Some(match c {
            '(' => {
                self.state.next();
                Token::LeftParen
            }
            ')' => {
                self.state.next();
                Token::RightParen
            }
            '{' => {
                self.state.next();
                Token::LeftBrace
            }
            '}' => {
                self.state.next();
                Token::RightBrace
            }
            '[' => {
                self.state.next();
                Token::LeftBracket
            }
            ']' => {
                self.state.next();
                Token::RightBracket
            }
            ',' => {
                self.state.next();
                Token::Comma
            }
            ':' => {
                self.state.next();
                Token::Colon
            }
            ';' => {
                self.state.next();
                Token::Semicolon
            }
            '+' => {
                self.state.next();
                Token::Plus
            }
            '-' => {
                self.state.next();
                Token::Minus
            }
            '*' => {
                self.state.next();
                Token::Star
            }
            '/' => {
                self.state.next();
                Token::Slash
            }
            '%' => {
                self.state.next();
                Token::Percent
            }
            '<' => {
                self.state.next();
                match self.state.peek() {
                    Some('=') => {
                        self.state.next();
                        Token::LtEq
                    }
                    _ => Token::Lt,
                }
            }
            '>' => {
                self.state.next();
                match self.state.peek() {
                    Some('=') => {
                        self.state.next();
                        Token::GtEq
                    }
                    _ => Token::Gt,
                }
            }
            '=' => {
                self.state.next();
                match self.state.peek() {
                    Some('>') => {
                        self.state.next();
                        Token::Arrow
                    }
                    Some('=') => {
                        self.state.next();
                        match self.state.peek() {
                            Some('=') => {
                                self.state.next();
                                Token::EqEqEq
                            }
                            _ => Token::EqEq,
                        }
                    }
                    _ => {
                        return Err(Error::translation(
                            "assignment is not supported in callbacks",
                        ))
                    }
                }
            }
            '!' => {
                self.state.next();
                match self.state.peek() {
                    Some('=') => {
                        self.state.next();
                        match self.state.peek() {
                            Some('=') => {
                                self.state.next();
                                Token::BangEqEq
                            }
                            _ => Token::BangEq,
                        }
                    }
                    _ => Token::Bang,
                }
            }
            '&' => {
                self.state.next();
                match self.state.peek() {
                    Some('&') => {
                        self.state.next();
                        Token::AmpAmp
                    }
                    _ => return Err(Error::translation("unsupported operator `&`")),
                }
            }
            '|' => {
                self.state.next();
                match self.state.peek() {
                    Some('|') => {
                        self.state.next();
                        Token::PipePipe
                    }
                    _ => return Err(Error::translation("unsupported operator `|`")),
                }
            }
            // Strings
            '\'' | '"' => {
                let quote = c;
                self.state.next();
                let s = self.take_quoted_string(quote)?;
                Token::Str(s)
            }
            // Template literals
            '`' => {
                self.state.next();
                self.take_template()?
            }
            // Numbers
            '0'..='9' => {
                let mut period_found = false;
                let s = self.state.take_while(|c| {
                    if c.is_ascii_digit() {
                        return true;
                    }
                    if period_found {
                        return false;
                    }
                    if c == '.' {
                        period_found = true;
                        return true;
                    }
                    false
                });
                Token::Number(s.to_string())
            }
            '.' => {
                self.state.next();
                Token::Period
            }
            c if is_identifier_start(c) => {
                let s = self
                    .state
                    .take_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                Token::Ident(s.to_string())
            }
            c => return Err(Error::translation(format!("unexpected character `{c}`"))),
        }))
    }

    fn take_quoted_string(&mut self, quote: char) -> Result<String> {
        let mut s = String::new();
        loop {
            match self.state.next() {
                Some('\\') => match self.state.next() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(c) => s.push(c),
                    None => return Err(Error::translation("unterminated string literal")),
                },
                Some(c) if c == quote => return Ok(s),
                Some(c) => s.push(c),
                None => return Err(Error::translation("unterminated string literal")),
            }
        }
    }

    /// Lexes a template literal body. Interpolations are tokenized in place,
    /// tracking brace depth so `${` / `}` pairs nest correctly.
    fn take_template(&mut self) -> Result<Token> {
        let mut parts = Vec::new();
        let mut segment = String::new();

        loop {
            match self.state.next() {
                Some('`') => {
                    if !segment.is_empty() {
                        parts.push(RawTemplatePart::Str(segment));
                    }
                    return Ok(Token::Template(parts));
                }
                Some('$') if self.state.peek() == Some('{') => {
                    self.state.next();
                    if !segment.is_empty() {
                        parts.push(RawTemplatePart::Str(std::mem::take(&mut segment)));
                    }

                    let mut depth = 1usize;
                    let inner = self.state.take_while(|c| {
                        match c {
                            '{' => depth += 1,
                            '}' => depth -= 1,
                            _ => {}
                        }
                        depth > 0
                    });
                    if self.state.next() != Some('}') {
                        return Err(Error::translation("unterminated template interpolation"));
                    }

                    let tokens = Tokenizer::new(inner).tokenize()?;
                    parts.push(RawTemplatePart::Tokens(tokens));
                }
                Some('\\') => match self.state.next() {
                    Some(c) => segment.push(c),
                    None => return Err(Error::translation("unterminated template literal")),
                },
                Some(c) => segment.push(c),
                None => return Err(Error::translation("unterminated template literal")),
            }
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<Token> {
        Tokenizer::new(source).tokenize().unwrap()
    }

    #[test]
    fn arrow_and_comparison() {
        assert_eq!(
            tokenize("u => u.id > 10"),
            vec![
                Token::Ident("u".into()),
                Token::Arrow,
                Token::Ident("u".into()),
                Token::Period,
                Token::Ident("id".into()),
                Token::Gt,
                Token::Number("10".into()),
            ]
        );
    }

    #[test]
    fn equality_flavors() {
        assert_eq!(
            tokenize("a == b === c != d !== e"),
            vec![
                Token::Ident("a".into()),
                Token::EqEq,
                Token::Ident("b".into()),
                Token::EqEqEq,
                Token::Ident("c".into()),
                Token::BangEq,
                Token::Ident("d".into()),
                Token::BangEqEq,
                Token::Ident("e".into()),
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            tokenize(r#"'it\'s' "a\"b""#),
            vec![Token::Str("it's".into()), Token::Str("a\"b".into())]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokenize("1 2.5"),
            vec![Token::Number("1".into()), Token::Number("2.5".into())]
        );
    }

    #[test]
    fn template_literal() {
        let tokens = tokenize("`Hi ${u.name}!`");
        assert_eq!(
            tokens,
            vec![Token::Template(vec![
                RawTemplatePart::Str("Hi ".into()),
                RawTemplatePart::Tokens(vec![
                    Token::Ident("u".into()),
                    Token::Period,
                    Token::Ident("name".into()),
                ]),
                RawTemplatePart::Str("!".into()),
            ])]
        );
    }

    #[test]
    fn lone_ampersand_rejected() {
        assert!(Tokenizer::new("a & b").tokenize().is_err());
    }

    #[test]
    fn assignment_rejected() {
        assert!(Tokenizer::new("a = b").tokenize().is_err());
    }
}
