//! The structured diagnostic stream.
//!
//! Analysers never fail; they push [`Issue`] values and keep going. An issue
//! pairs a data-only [`IssueKind`] (typed payloads, no prose) with a severity,
//! a primary [`Span`] and optional [`Note`]s. Prose is produced on demand by
//! the message catalogue in [`crate::messages`], keyed on (code, locale).

use std::fmt;

use serde::Serialize;

use crate::locale::Locale;
use crate::messages;
use crate::span::Span;
use crate::term::{ApplicableKind, ConditionContext, SymbolDescription};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

/// An attached note: extra context, usually pointing at another location.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub span: Option<Span>,
    pub text: NoteText,
}

/// Data for a note; rendered by the catalogue like the primary message.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteText {
    /// Points at the first definition in a duplicate-definition diagnostic.
    FirstDefinitionHere,
    /// One per candidate in an ambiguity diagnostic.
    Candidate { signature: String },
}

/// The data of a diagnostic, without any prose.
///
/// Payload strings are already rendered where they describe program entities
/// (type names such as `int&`, argument-type lists); everything else stays
/// typed so the catalogue can decline nouns per locale.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    // Lexical
    NumericLiteralTooBig { literal: String, target: String },
    NumericLiteralTooSmall { literal: String, target: String },
    MalformedNumber { literal: String },
    UnknownCharacter { ch: char },

    // Parser
    MissingVariableInitializer,
    MissingRightOperand { operator: String },
    MissingTypeSpecifier,
    MissingClosingParenthesis,
    MissingClosingBrace,
    KeywordAsIdentifier { keyword: String },
    ExpectedDefinition,
    ExpectedExpression,

    // Expressions
    InvalidCallArguments { applicable: ApplicableKind, name: String, arguments: String },
    ExpressionIsNotCallable,
    AmbiguousOverloadedCall { applicable: ApplicableKind, name: String },
    InvalidReferenceAsExpression { name: String, description: SymbolDescription },
    UnknownName { name: String },
    ThisReferenceOutsideMethod,
    UndefinedOperator { operator: String, operand_type: String },
    UnknownObjectMember { name: String, type_name: String },
    UnknownStaticMemberName { name: String, type_name: String },
    ReferenceMethodAccessFromNonReference { name: String, type_name: String },
    NonTypeExpressionAsCastTarget,
    NoTypeConversionFunction { from: String, to: String },
    InvalidConversionFunctionReturnType { expected: String, actual: String },
    AmbiguousTypeConversion { from: String, to: String },

    // Declarations and statements
    EntityNameTaken { name: String },
    UnreachableCode,
    MissingReturnStatement { applicable: ApplicableKind, name: String },
    ReturnWithoutValue { expected: String },
    IncompatibleReturnType { expected: String, actual: String },
    ReturnFromConstructor,
    InvalidConditionType { context: ConditionContext, actual: String },
    IncompatibleVariableInitializer { name: String, type_name: String, actual: String },
    NonPlainVariableWithoutInitializer { name: String, type_name: String },
    MissingMainFunction,
    MainIsNotFunction,
    InvalidMainFunctionSignature,
    DuplicateFunctionDefinition { name: String },
    DuplicateMethodDefinition { name: String, type_name: String },
    DuplicateConstructorDefinition { type_name: String },
    CopyConstructorDefinition { type_name: String },
    ReferenceMarkerInFunctionDefinition { name: String },
    NativeFunctionWithBody { name: String },
    NativeMethodWithBody { name: String },
    NativeConstructorWithBody { type_name: String },
    FunctionDefinitionWithoutBody { name: String },
    MethodDefinitionWithoutBody { name: String },
    ConstructorDefinitionWithoutBody { type_name: String },
    InvalidReferenceAsType { name: String, description: SymbolDescription },
    OverreferencedType { type_name: String },
}

impl IssueKind {
    /// The stable diagnostic code.
    pub fn code(&self) -> &'static str {
        use IssueKind::*;
        match self {
            NumericLiteralTooBig { .. } => "E0001",
            NumericLiteralTooSmall { .. } => "E0002",
            MalformedNumber { .. } => "E0003",
            UnknownCharacter { .. } => "E0004",
            MissingVariableInitializer => "E0005",
            MissingRightOperand { .. } => "E0006",
            MissingTypeSpecifier => "E0007",
            MissingClosingParenthesis => "E0008",
            MissingClosingBrace => "E0009",
            KeywordAsIdentifier { .. } => "E0010",
            ExpectedDefinition => "E0011",
            ExpectedExpression => "E0012",
            InvalidCallArguments { .. } => "E0013",
            ExpressionIsNotCallable => "E0014",
            AmbiguousOverloadedCall { .. } => "E0015",
            InvalidReferenceAsExpression { .. } => "E0016",
            UnknownName { .. } => "E0017",
            EntityNameTaken { .. } => "E0018",
            UnreachableCode => "E0019",
            MissingReturnStatement { .. } => "E0020",
            ReturnWithoutValue { .. } => "E0021",
            IncompatibleReturnType { .. } => "E0022",
            ReturnFromConstructor => "E0023",
            InvalidConditionType { .. } => "E0024",
            IncompatibleVariableInitializer { .. } => "E0025",
            NonPlainVariableWithoutInitializer { .. } => "E0026",
            MissingMainFunction => "E0027",
            MainIsNotFunction => "E0028",
            InvalidMainFunctionSignature => "E0029",
            DuplicateFunctionDefinition { .. } => "E0030",
            DuplicateMethodDefinition { .. } => "E0031",
            DuplicateConstructorDefinition { .. } => "E0032",
            CopyConstructorDefinition { .. } => "E0033",
            ReferenceMarkerInFunctionDefinition { .. } => "E0034",
            NativeFunctionWithBody { .. } => "E0035",
            NativeMethodWithBody { .. } => "E0036",
            NativeConstructorWithBody { .. } => "E0037",
            FunctionDefinitionWithoutBody { .. } => "E0038",
            MethodDefinitionWithoutBody { .. } => "E0039",
            ConstructorDefinitionWithoutBody { .. } => "E0040",
            InvalidReferenceAsType { .. } => "E0041",
            OverreferencedType { .. } => "E0042",
            ThisReferenceOutsideMethod => "E0043",
            UndefinedOperator { .. } => "E0044",
            UnknownObjectMember { .. } => "E0045",
            UnknownStaticMemberName { .. } => "E0046",
            ReferenceMethodAccessFromNonReference { .. } => "E0047",
            NonTypeExpressionAsCastTarget => "E0051",
            NoTypeConversionFunction { .. } => "E0052",
            InvalidConversionFunctionReturnType { .. } => "E0053",
            AmbiguousTypeConversion { .. } => "E0054",
        }
    }

    /// Default severity of the kind.
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::UnreachableCode => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub span: Span,
    pub notes: Vec<Note>,
}

impl Issue {
    /// Build an issue with the kind's default severity and no notes.
    pub fn new(kind: IssueKind, span: Span) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            span,
            notes: Vec::new(),
        }
    }

    /// Attach a note.
    pub fn with_note(mut self, span: Option<Span>, text: NoteText) -> Self {
        self.notes.push(Note { span, text });
        self
    }

    /// The stable `E00NN` code.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Render the message in the given locale.
    pub fn message(&self, locale: Locale) -> String {
        messages::render(&self.kind, locale)
    }

    /// Render the issue into a display/serialization-friendly form.
    pub fn render(&self, locale: Locale) -> RenderedIssue {
        RenderedIssue {
            severity: self.severity,
            code: self.code(),
            span: self.span,
            message: self.message(locale),
            notes: self
                .notes
                .iter()
                .map(|note| RenderedNote {
                    span: note.span,
                    text: messages::render_note(&note.text, locale),
                })
                .collect(),
        }
    }
}

/// An issue with its prose materialized; this is what the CLI prints and
/// serializes.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub span: Span,
    pub message: String,
    pub notes: Vec<RenderedNote>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedNote {
    pub span: Option<Span>,
    pub text: String,
}

impl fmt::Display for RenderedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        write!(
            f,
            "{}[{}] at {}: {}",
            label, self.code, self.span, self.message
        )?;
        for note in &self.notes {
            match note.span {
                Some(span) => write!(f, "\n  note at {}: {}", span, note.text)?,
                None => write!(f, "\n  note: {}", note.text)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let kind = IssueKind::UnknownName { name: "y".into() };
        assert_eq!(kind.code(), "E0017");
        assert_eq!(
            IssueKind::DuplicateFunctionDefinition { name: "foo".into() }.code(),
            "E0030"
        );
        assert_eq!(
            IssueKind::MissingReturnStatement {
                applicable: ApplicableKind::Function,
                name: "f".into()
            }
            .code(),
            "E0020"
        );
    }

    #[test]
    fn unreachable_code_is_a_warning() {
        let issue = Issue::new(IssueKind::UnreachableCode, Span::point(4, 5));
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.code(), "E0019");
    }

    #[test]
    fn rendered_display_format() {
        let issue = Issue::new(
            IssueKind::UnknownName { name: "y".into() },
            Span::new(1, 22, 1, 23),
        );
        let rendered = issue.render(Locale::En);
        let text = rendered.to_string();
        assert!(text.starts_with("error[E0017] at 1:22:"), "{text}");
        assert!(text.contains('y'), "{text}");
    }

    #[test]
    fn notes_render_with_spans() {
        let issue = Issue::new(
            IssueKind::DuplicateFunctionDefinition { name: "foo".into() },
            Span::new(3, 1, 3, 10),
        )
        .with_note(Some(Span::new(1, 1, 1, 10)), NoteText::FirstDefinitionHere);
        let rendered = issue.render(Locale::En);
        assert_eq!(rendered.notes.len(), 1);
        assert!(rendered.to_string().contains("note at 1:1"));
    }
}
