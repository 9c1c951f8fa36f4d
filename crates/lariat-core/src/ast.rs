//! Lexer, parser, and node tree for the arrow-function callback language.
//!
//! Callbacks arrive as source text (`"u => u.id > 10"`). The tokenizer and
//! recursive-descent parser here turn that text into an [`Arrow`] whose body
//! the SQL translator walks. The accepted grammar is the expression subset
//! the translator knows how to emit; anything else fails at parse time.

mod expr;
pub use expr::{Arrow, BinaryOp, Expr, Literal, LogicalOp, TemplatePart, UnaryOp};

mod parser;
pub use parser::parse_arrow;

mod tokens;
pub use tokens::{RawTemplatePart, Token, Tokenizer};
