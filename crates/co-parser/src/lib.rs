//! Lexer, raw AST and parser for the CO language.
//!
//! The raw tree is lossless with respect to the analysed program: every node
//! carries a [`co_core::Span`], absent operands are kept as explicit
//! `Missing` placeholders, and neither the lexer nor the parser ever aborts —
//! both push [`co_core::Issue`]s and recover.
//!
//! AST nodes are allocated in a caller-provided [`bumpalo::Bump`] arena and
//! borrow from it (`'ast`), so the whole tree is freed in one deallocation.

pub mod ast;
pub mod lexer;
mod parser;

pub use parser::{parse, Parser};
