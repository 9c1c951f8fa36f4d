use super::expr::{Arrow, BinaryOp, Expr, Literal, LogicalOp, TemplatePart, UnaryOp};
use super::tokens::{RawTemplatePart, Token, Tokenizer};
use crate::{Error, Result};

/// Parses arrow-function source text, e.g. `"u => u.id > 10"`.
///
/// The body may be a bare expression or a block containing exactly one
/// `return` statement.
pub fn parse_arrow(source: &str) -> Result<Arrow> {
    let tokens = Tokenizer::new(source).tokenize()?;
    let mut parser = Parser::new(tokens);
    let arrow = parser.parse_arrow()?;
    parser.expect_eof()?;
    Ok(arrow)
}

#[derive(Debug)]
struct Parser {
    tokens: Vec<Token>,
    idx: usize,
}

impl Parser {
    // Precedences, ordered low to high.
    const PREC_OR: u8 = 10;
    const PREC_AND: u8 = 20;
    const PREC_EQUALITY: u8 = 30;
    const PREC_COMPARISON: u8 = 40;
    const PREC_ADD_SUB: u8 = 50;
    const PREC_MUL_DIV_MOD: u8 = 60;
    const PREC_UNARY: u8 = 70;
    const PREC_POSTFIX: u8 = 80;

    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, idx: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.idx)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.idx + n)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.idx).cloned();
        if token.is_some() {
            self.idx += 1;
        }
        token
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.idx += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<()> {
        if self.consume(token) {
            Ok(())
        } else {
            Err(Error::translation(format!(
                "expected {token:?}, found {:?}",
                self.peek()
            )))
        }
    }

    fn expect_eof(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(Error::translation(format!(
                "unexpected trailing input at {token:?}"
            ))),
        }
    }

    fn parse_arrow(&mut self) -> Result<Arrow> {
        let param = match self.next() {
            Some(Token::Ident(name)) => name,
            Some(Token::LeftParen) => {
                let name = match self.next() {
                    Some(Token::Ident(name)) => name,
                    other => {
                        return Err(Error::translation(format!(
                            "expected a single parameter, found {other:?}"
                        )))
                    }
                };
                self.expect(&Token::RightParen)?;
                name
            }
            other => {
                return Err(Error::translation(format!(
                    "expected an arrow function, found {other:?}"
                )))
            }
        };

        self.expect(&Token::Arrow)?;

        let body = if self.consume(&Token::LeftBrace) {
            // Block bodies must be a single return statement.
            match self.next() {
                Some(Token::Ident(word)) if word == "return" => {}
                other => {
                    return Err(Error::translation(format!(
                        "block body must start with `return`, found {other:?}"
                    )))
                }
            }
            let body = self.parse_expr()?;
            self.consume(&Token::Semicolon);
            self.expect(&Token::RightBrace)?;
            body
        } else {
            self.parse_expr()?
        };

        Ok(Arrow { param, body })
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        if self.at_arrow() {
            let arrow = self.parse_arrow()?;
            return Ok(Expr::Arrow(Box::new(arrow)));
        }
        self.parse_subexpr(0)
    }

    /// True when the upcoming tokens form an arrow head: `x =>` or `(x) =>`.
    fn at_arrow(&self) -> bool {
        match (self.peek(), self.peek_nth(1)) {
            (Some(Token::Ident(_)), Some(Token::Arrow)) => true,
            (Some(Token::LeftParen), Some(Token::Ident(_))) => matches!(
                (self.peek_nth(2), self.peek_nth(3)),
                (Some(Token::RightParen), Some(Token::Arrow))
            ),
            _ => false,
        }
    }

    fn parse_subexpr(&mut self, precedence: u8) -> Result<Expr> {
        let mut expr = self.parse_prefix()?;

        loop {
            let next_precedence = self.infix_precedence();
            if precedence >= next_precedence {
                break;
            }
            expr = self.parse_infix(expr, next_precedence)?;
        }

        Ok(expr)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        let token = match self.next() {
            Some(token) => token,
            None => {
                return Err(Error::translation(
                    "expected an expression, found end of input",
                ))
            }
        };

        let expr = match token {
            Token::Ident(word) => match word.as_str() {
                "true" => Expr::Literal(Literal::Bool(true)),
                "false" => Expr::Literal(Literal::Bool(false)),
                "null" | "undefined" => Expr::Literal(Literal::Null),
                _ => Expr::Ident(word),
            },
            Token::Number(raw) => Expr::Literal(parse_number(&raw)?),
            Token::Str(s) => Expr::Literal(Literal::Str(s)),
            Token::Template(raw_parts) => {
                let mut parts = Vec::with_capacity(raw_parts.len());
                for part in raw_parts {
                    parts.push(match part {
                        RawTemplatePart::Str(s) => TemplatePart::Str(s),
                        RawTemplatePart::Tokens(tokens) => {
                            let mut sub = Parser::new(tokens);
                            let expr = sub.parse_expr()?;
                            sub.expect_eof()?;
                            TemplatePart::Expr(expr)
                        }
                    });
                }
                Expr::Template { parts }
            }
            Token::Minus => {
                // Fold a negative numeric literal directly.
                match self.parse_subexpr(Self::PREC_UNARY)? {
                    Expr::Literal(Literal::Int(value)) => Expr::Literal(Literal::Int(-value)),
                    Expr::Literal(Literal::Float(value)) => Expr::Literal(Literal::Float(-value)),
                    operand => Expr::Unary {
                        op: UnaryOp::Neg,
                        operand: Box::new(operand),
                    },
                }
            }
            Token::Bang => Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(self.parse_subexpr(Self::PREC_UNARY)?),
            },
            Token::LeftParen => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RightParen)?;
                expr
            }
            Token::LeftBrace => self.parse_object()?,
            Token::LeftBracket => self.parse_array()?,
            token => {
                return Err(Error::translation(format!(
                    "unexpected token {token:?} in expression"
                )))
            }
        };

        self.parse_postfix(expr)
    }

    /// Member access and method calls bind tighter than any operator.
    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr> {
        loop {
            if self.consume(&Token::Period) {
                let property = match self.next() {
                    Some(Token::Ident(name)) => name,
                    other => {
                        return Err(Error::translation(format!(
                            "expected a property name after `.`, found {other:?}"
                        )))
                    }
                };

                if self.consume(&Token::LeftParen) {
                    let args = self.parse_call_args()?;
                    expr = Expr::Call {
                        object: Box::new(expr),
                        method: property,
                        args,
                    };
                } else {
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                    };
                }
            } else if self.peek() == Some(&Token::LeftParen) {
                return Err(Error::translation(
                    "only method calls on a member are supported",
                ));
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.consume(&Token::RightParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightParen)?;
        Ok(args)
    }

    fn parse_object(&mut self) -> Result<Expr> {
        let mut entries = Vec::new();
        if self.consume(&Token::RightBrace) {
            return Ok(Expr::Object(entries));
        }
        loop {
            let key = match self.next() {
                Some(Token::Ident(name)) => name,
                Some(Token::Str(name)) => name,
                other => {
                    return Err(Error::translation(format!(
                        "expected an object key, found {other:?}"
                    )))
                }
            };
            self.expect(&Token::Colon)?;
            entries.push((key, self.parse_expr()?));
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightBrace)?;
        Ok(Expr::Object(entries))
    }

    fn parse_array(&mut self) -> Result<Expr> {
        let mut items = Vec::new();
        if self.consume(&Token::RightBracket) {
            return Ok(Expr::Array(items));
        }
        loop {
            items.push(self.parse_expr()?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightBracket)?;
        Ok(Expr::Array(items))
    }

    /// The relative precedence of the upcoming infix operator, or 0.
    fn infix_precedence(&self) -> u8 {
        match self.peek() {
            Some(Token::PipePipe) => Self::PREC_OR,
            Some(Token::AmpAmp) => Self::PREC_AND,
            Some(Token::EqEq | Token::EqEqEq | Token::BangEq | Token::BangEqEq) => {
                Self::PREC_EQUALITY
            }
            Some(Token::Lt | Token::LtEq | Token::Gt | Token::GtEq) => Self::PREC_COMPARISON,
            Some(Token::Plus | Token::Minus) => Self::PREC_ADD_SUB,
            Some(Token::Star | Token::Slash | Token::Percent) => Self::PREC_MUL_DIV_MOD,
            _ => 0,
        }
    }

    fn parse_infix(&mut self, lhs: Expr, precedence: u8) -> Result<Expr> {
        let token = self.next().expect("infix operator");

        let logical = match token {
            Token::AmpAmp => Some(LogicalOp::And),
            Token::PipePipe => Some(LogicalOp::Or),
            _ => None,
        };
        if let Some(op) = logical {
            return Ok(Expr::Logical {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(self.parse_subexpr(precedence)?),
            });
        }

        let op = match token {
            Token::EqEq | Token::EqEqEq => BinaryOp::Eq,
            Token::BangEq | Token::BangEqEq => BinaryOp::Ne,
            Token::Lt => BinaryOp::Lt,
            Token::LtEq => BinaryOp::Le,
            Token::Gt => BinaryOp::Gt,
            Token::GtEq => BinaryOp::Ge,
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::Percent => BinaryOp::Rem,
            token => {
                return Err(Error::translation(format!(
                    "unsupported operator {token:?}"
                )))
            }
        };

        Ok(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(self.parse_subexpr(precedence)?),
        })
    }
}

fn parse_number(raw: &str) -> Result<Literal> {
    if raw.contains('.') {
        raw.parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| Error::translation(format!("invalid number literal `{raw}`")))
    } else {
        raw.parse::<i64>()
            .map(Literal::Int)
            .map_err(|_| Error::translation(format!("invalid number literal `{raw}`")))
    }
}
