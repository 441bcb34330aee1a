//! Grammatical building blocks for diagnostic messages.
//!
//! Messages are rendered in three locales, two of which decline nouns by
//! case. Every entity noun therefore carries its case forms, and the message
//! catalogue picks the form the sentence needs instead of concatenating
//! dictionary forms. English keeps its determiner variants for the same
//! reason.

/// Case forms of a noun in a declining language (Belarusian, Russian).
#[derive(Debug, Clone, Copy)]
pub struct CaseForms {
    pub nominative: &'static str,
    pub genitive: &'static str,
    pub accusative: &'static str,
    pub instrumental: &'static str,
}

/// A noun with all the forms the message catalogue templates over.
#[derive(Debug, Clone, Copy)]
pub struct Noun {
    /// English without a determiner: "function".
    pub en: &'static str,
    /// English with an indefinite determiner: "a function".
    pub en_indefinite: &'static str,
    /// English with a definite determiner: "the function".
    pub en_definite: &'static str,
    pub be: CaseForms,
    pub ru: CaseForms,
}

macro_rules! noun {
    ($en:literal, $en_a:literal, $en_the:literal,
     be: [$be_n:literal, $be_g:literal, $be_a:literal, $be_i:literal],
     ru: [$ru_n:literal, $ru_g:literal, $ru_a:literal, $ru_i:literal]) => {
        Noun {
            en: $en,
            en_indefinite: $en_a,
            en_definite: $en_the,
            be: CaseForms {
                nominative: $be_n,
                genitive: $be_g,
                accusative: $be_a,
                instrumental: $be_i,
            },
            ru: CaseForms {
                nominative: $ru_n,
                genitive: $ru_g,
                accusative: $ru_a,
                instrumental: $ru_i,
            },
        }
    };
}

pub(crate) const FUNCTION: Noun = noun!(
    "function", "a function", "the function",
    be: ["функцыя", "функцыі", "функцыю", "функцыяй"],
    ru: ["функция", "функции", "функцию", "функцией"]
);

pub(crate) const OVERLOADED_FUNCTION: Noun = noun!(
    "overloaded function", "an overloaded function", "the overloaded function",
    be: ["перагружаная функцыя", "перагружанай функцыі", "перагружаную функцыю", "перагружанай функцыяй"],
    ru: ["перегруженная функция", "перегруженной функции", "перегруженную функцию", "перегруженной функцией"]
);

pub(crate) const METHOD: Noun = noun!(
    "method", "a method", "the method",
    be: ["метад", "метаду", "метад", "метадам"],
    ru: ["метод", "метода", "метод", "методом"]
);

pub(crate) const CONSTRUCTOR: Noun = noun!(
    "constructor", "a constructor", "the constructor",
    be: ["канструктар", "канструктара", "канструктар", "канструктарам"],
    ru: ["конструктор", "конструктора", "конструктор", "конструктором"]
);

pub(crate) const TYPE: Noun = noun!(
    "type", "a type", "the type",
    be: ["тып", "тыпу", "тып", "тыпам"],
    ru: ["тип", "типа", "тип", "типом"]
);

pub(crate) const VARIABLE: Noun = noun!(
    "variable", "a variable", "the variable",
    be: ["зменная", "зменнай", "зменную", "зменнай"],
    ru: ["переменная", "переменной", "переменную", "переменной"]
);

pub(crate) const NAMESPACE: Noun = noun!(
    "namespace", "a namespace", "the namespace",
    be: ["прастора імёнаў", "прасторы імёнаў", "прастору імёнаў", "прасторай імёнаў"],
    ru: ["пространство имён", "пространства имён", "пространство имён", "пространством имён"]
);

/// The kind of callable a body or call diagnostic talks about.
///
/// Carried by the analyser's local context so that one template can say
/// "the function 'f'", "the method 'f'" or "the constructor" as appropriate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicableKind {
    Function,
    Method,
    Constructor,
}

impl ApplicableKind {
    pub(crate) fn noun(self) -> &'static Noun {
        match self {
            ApplicableKind::Function => &FUNCTION,
            ApplicableKind::Method => &METHOD,
            ApplicableKind::Constructor => &CONSTRUCTOR,
        }
    }
}

/// What kind of entity a symbol is, for diagnostics that name one
/// ("'x' is a type and cannot be used here").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolDescription {
    Variable,
    Function,
    OverloadedFunction,
    Method,
    Constructor,
    Type,
    Namespace,
}

impl SymbolDescription {
    pub(crate) fn noun(self) -> &'static Noun {
        match self {
            SymbolDescription::Variable => &VARIABLE,
            SymbolDescription::Function => &FUNCTION,
            SymbolDescription::OverloadedFunction => &OVERLOADED_FUNCTION,
            SymbolDescription::Method => &METHOD,
            SymbolDescription::Constructor => &CONSTRUCTOR,
            SymbolDescription::Type => &TYPE,
            SymbolDescription::Namespace => &NAMESPACE,
        }
    }
}

/// Which conditional construct an `InvalidConditionType` issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionContext {
    If,
    While,
}

impl ConditionContext {
    /// The source keyword, quoted verbatim in every locale.
    pub fn keyword(self) -> &'static str {
        match self {
            ConditionContext::If => "if",
            ConditionContext::While => "while",
        }
    }
}
