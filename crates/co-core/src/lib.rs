//! Shared foundation for the CO compiler.
//!
//! This crate holds everything the other compiler crates agree on:
//!
//! - [`Span`]: half-open source regions attached to every AST node and
//!   diagnostic
//! - [`Issue`] / [`IssueKind`]: the structured diagnostic stream with stable
//!   `E00NN` codes
//! - [`Locale`] and the message catalogue that renders every diagnostic in
//!   English, Belarusian and Russian

mod issue;
mod locale;
mod messages;
mod span;
mod term;

pub use issue::{Issue, IssueKind, Note, NoteText, RenderedIssue, RenderedNote, Severity};
pub use locale::Locale;
pub use span::Span;
pub use term::{ApplicableKind, ConditionContext, SymbolDescription};
