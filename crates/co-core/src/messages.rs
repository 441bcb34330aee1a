//! The localized message catalogue.
//!
//! One entry per (issue code, locale): a function from the issue's typed
//! payload to the formatted string. Nouns come from [`crate::term`] with
//! their case forms, so Belarusian and Russian sentences decline instead of
//! gluing dictionary forms together.
//!
//! Keeping the catalogue in one file makes it easy to audit that every code
//! renders in every locale; `tests::every_kind_renders_in_every_locale`
//! checks the property mechanically.

use crate::issue::{IssueKind, NoteText};
use crate::locale::Locale;

/// Render the primary message of an issue.
pub(crate) fn render(kind: &IssueKind, locale: Locale) -> String {
    use IssueKind::*;
    use Locale::*;

    match kind {
        NumericLiteralTooBig { literal, target } => match locale {
            En => format!("numeric literal '{literal}' is too big for the type '{target}'"),
            Be => format!("лікавы літарал '{literal}' занадта вялікі для тыпу '{target}'"),
            Ru => format!("числовой литерал '{literal}' слишком велик для типа '{target}'"),
        },
        NumericLiteralTooSmall { literal, target } => match locale {
            En => format!("numeric literal '{literal}' is too small for the type '{target}'"),
            Be => format!("лікавы літарал '{literal}' занадта малы для тыпу '{target}'"),
            Ru => format!("числовой литерал '{literal}' слишком мал для типа '{target}'"),
        },
        MalformedNumber { literal } => match locale {
            En => format!("malformed numeric literal '{literal}'"),
            Be => format!("няправільны лікавы літарал '{literal}'"),
            Ru => format!("некорректный числовой литерал '{literal}'"),
        },
        UnknownCharacter { ch } => match locale {
            En => format!("unknown character '{ch}'"),
            Be => format!("невядомы сімвал '{ch}'"),
            Ru => format!("неизвестный символ '{ch}'"),
        },

        MissingVariableInitializer => match locale {
            En => "missing initializer after '='".to_string(),
            Be => "прапушчана пачатковае значэнне пасля '='".to_string(),
            Ru => "пропущено начальное значение после '='".to_string(),
        },
        MissingRightOperand { operator } => match locale {
            En => format!("missing right operand of '{operator}'"),
            Be => format!("прапушчаны правы аперанд аператара '{operator}'"),
            Ru => format!("пропущен правый операнд оператора '{operator}'"),
        },
        MissingTypeSpecifier => match locale {
            En => "expected a type".to_string(),
            Be => "чакаецца тып".to_string(),
            Ru => "ожидается тип".to_string(),
        },
        MissingClosingParenthesis => match locale {
            En => "missing closing ')'".to_string(),
            Be => "прапушчана закрывальная дужка ')'".to_string(),
            Ru => "пропущена закрывающая скобка ')'".to_string(),
        },
        MissingClosingBrace => match locale {
            En => "missing closing '}'".to_string(),
            Be => "прапушчана закрывальная дужка '}'".to_string(),
            Ru => "пропущена закрывающая скобка '}'".to_string(),
        },
        KeywordAsIdentifier { keyword } => match locale {
            En => format!("keyword '{keyword}' cannot be used as an identifier"),
            Be => format!("ключавое слова '{keyword}' не можа быць ідэнтыфікатарам"),
            Ru => format!("ключевое слово '{keyword}' не может быть идентификатором"),
        },
        ExpectedDefinition => match locale {
            En => "expected a type, function or variable definition".to_string(),
            Be => "чакаецца азначэнне тыпу, функцыі або зменнай".to_string(),
            Ru => "ожидается определение типа, функции или переменной".to_string(),
        },
        ExpectedExpression => match locale {
            En => "expected an expression".to_string(),
            Be => "чакаецца выраз".to_string(),
            Ru => "ожидается выражение".to_string(),
        },

        InvalidCallArguments {
            applicable,
            name,
            arguments,
        } => {
            let noun = applicable.noun();
            match locale {
                En => format!(
                    "{} '{name}' cannot be called with arguments ({arguments})",
                    noun.en_definite
                ),
                Be => format!(
                    "немагчыма выклікаць {} '{name}' з аргументамі ({arguments})",
                    noun.be.accusative
                ),
                Ru => format!(
                    "невозможно вызвать {} '{name}' с аргументами ({arguments})",
                    noun.ru.accusative
                ),
            }
        }
        ExpressionIsNotCallable => match locale {
            En => "this expression is not callable".to_string(),
            Be => "гэты выраз нельга выклікаць".to_string(),
            Ru => "это выражение нельзя вызвать".to_string(),
        },
        AmbiguousOverloadedCall { applicable, name } => {
            let noun = applicable.noun();
            match locale {
                En => format!("ambiguous call of {} '{name}'", noun.en_definite),
                Be => format!("неадназначны выклік {} '{name}'", noun.be.genitive),
                Ru => format!("неоднозначный вызов {} '{name}'", noun.ru.genitive),
            }
        }
        InvalidReferenceAsExpression { name, description } => {
            let noun = description.noun();
            match locale {
                En => format!(
                    "'{name}' is {} and cannot be used as an expression",
                    noun.en_indefinite
                ),
                Be => format!("'{name}' — гэта {}, а не выраз", noun.be.nominative),
                Ru => format!("'{name}' — это {}, а не выражение", noun.ru.nominative),
            }
        }
        UnknownName { name } => match locale {
            En => format!("unknown name '{name}'"),
            Be => format!("невядомае імя '{name}'"),
            Ru => format!("неизвестное имя '{name}'"),
        },
        ThisReferenceOutsideMethod => match locale {
            En => "'this' can only be used inside a method".to_string(),
            Be => "'this' можна выкарыстоўваць толькі ўнутры метаду".to_string(),
            Ru => "'this' можно использовать только внутри метода".to_string(),
        },
        UndefinedOperator {
            operator,
            operand_type,
        } => match locale {
            En => format!("operator '{operator}' is not defined for the type '{operand_type}'"),
            Be => format!("аператар '{operator}' не вызначаны для тыпу '{operand_type}'"),
            Ru => format!("оператор '{operator}' не определён для типа '{operand_type}'"),
        },
        UnknownObjectMember { name, type_name } => match locale {
            En => format!("the type '{type_name}' has no member '{name}'"),
            Be => format!("тып '{type_name}' не мае члена '{name}'"),
            Ru => format!("тип '{type_name}' не имеет члена '{name}'"),
        },
        UnknownStaticMemberName { name, type_name } => match locale {
            En => format!("the type '{type_name}' has no static member '{name}'"),
            Be => format!("тып '{type_name}' не мае статычнага члена '{name}'"),
            Ru => format!("тип '{type_name}' не имеет статического члена '{name}'"),
        },
        ReferenceMethodAccessFromNonReference { name, type_name } => match locale {
            En => format!("the method '{name}' is defined only on the reference type '{type_name}'"),
            Be => format!("метад '{name}' вызначаны толькі для спасылачнага тыпу '{type_name}'"),
            Ru => format!("метод '{name}' определён только для ссылочного типа '{type_name}'"),
        },
        NonTypeExpressionAsCastTarget => match locale {
            En => "cast target must be a type".to_string(),
            Be => "мэта пераўтварэння павінна быць тыпам".to_string(),
            Ru => "цель преобразования должна быть типом".to_string(),
        },
        NoTypeConversionFunction { from, to } => match locale {
            En => format!("no conversion from '{from}' to '{to}'"),
            Be => format!("няма пераўтварэння з '{from}' у '{to}'"),
            Ru => format!("нет преобразования из '{from}' в '{to}'"),
        },
        InvalidConversionFunctionReturnType { expected, actual } => match locale {
            En => format!("the conversion function returns '{actual}' instead of '{expected}'"),
            Be => format!("функцыя пераўтварэння вяртае '{actual}' замест '{expected}'"),
            Ru => format!("функция преобразования возвращает '{actual}' вместо '{expected}'"),
        },
        AmbiguousTypeConversion { from, to } => match locale {
            En => format!("ambiguous conversion from '{from}' to '{to}'"),
            Be => format!("неадназначнае пераўтварэнне з '{from}' у '{to}'"),
            Ru => format!("неоднозначное преобразование из '{from}' в '{to}'"),
        },

        EntityNameTaken { name } => match locale {
            En => format!("the name '{name}' is already taken in this scope"),
            Be => format!("імя '{name}' ужо занята ў гэтай вобласці бачнасці"),
            Ru => format!("имя '{name}' уже занято в этой области видимости"),
        },
        UnreachableCode => match locale {
            En => "unreachable code".to_string(),
            Be => "недасяжны код".to_string(),
            Ru => "недостижимый код".to_string(),
        },
        MissingReturnStatement { applicable, name } => {
            let noun = applicable.noun();
            match locale {
                En => format!(
                    "not all paths of {} '{name}' return a value",
                    noun.en_definite
                ),
                Be => format!(
                    "не ўсе шляхі {} '{name}' вяртаюць значэнне",
                    noun.be.genitive
                ),
                Ru => format!(
                    "не все пути {} '{name}' возвращают значение",
                    noun.ru.genitive
                ),
            }
        }
        ReturnWithoutValue { expected } => match locale {
            En => format!("'return' without a value in a function returning '{expected}'"),
            Be => format!("'return' без значэння ў функцыі, якая вяртае '{expected}'"),
            Ru => format!("'return' без значения в функции, возвращающей '{expected}'"),
        },
        IncompatibleReturnType { expected, actual } => match locale {
            En => format!("cannot return '{actual}' from a function returning '{expected}'"),
            Be => format!("немагчыма вярнуць '{actual}' з функцыі, якая вяртае '{expected}'"),
            Ru => format!("невозможно вернуть '{actual}' из функции, возвращающей '{expected}'"),
        },
        ReturnFromConstructor => match locale {
            En => "'return' is not allowed inside a constructor".to_string(),
            Be => "'return' нельга выкарыстоўваць унутры канструктара".to_string(),
            Ru => "'return' нельзя использовать внутри конструктора".to_string(),
        },
        InvalidConditionType { context, actual } => {
            let kw = context.keyword();
            match locale {
                En => format!("the condition of '{kw}' must be 'bool', got '{actual}'"),
                Be => format!("умова '{kw}' павінна мець тып 'bool', а не '{actual}'"),
                Ru => format!("условие '{kw}' должно иметь тип 'bool', а не '{actual}'"),
            }
        }
        IncompatibleVariableInitializer {
            name,
            type_name,
            actual,
        } => match locale {
            En => format!(
                "cannot initialize the variable '{name}' of type '{type_name}' with a value of type '{actual}'"
            ),
            Be => format!(
                "немагчыма ініцыялізаваць зменную '{name}' тыпу '{type_name}' значэннем тыпу '{actual}'"
            ),
            Ru => format!(
                "невозможно инициализировать переменную '{name}' типа '{type_name}' значением типа '{actual}'"
            ),
        },
        NonPlainVariableWithoutInitializer { name, type_name } => match locale {
            En => format!(
                "the variable '{name}' of type '{type_name}' requires an initializer: the type has no default constructor"
            ),
            Be => format!(
                "зменная '{name}' тыпу '{type_name}' патрабуе пачатковага значэння: тып не мае канструктара па змаўчанні"
            ),
            Ru => format!(
                "переменная '{name}' типа '{type_name}' требует начального значения: тип не имеет конструктора по умолчанию"
            ),
        },
        MissingMainFunction => match locale {
            En => "the program has no 'main' function".to_string(),
            Be => "праграма не мае функцыі 'main'".to_string(),
            Ru => "программа не имеет функции 'main'".to_string(),
        },
        MainIsNotFunction => match locale {
            En => "'main' must be a function".to_string(),
            Be => "'main' павінна быць функцыяй".to_string(),
            Ru => "'main' должно быть функцией".to_string(),
        },
        InvalidMainFunctionSignature => match locale {
            En => "the 'main' function must take no parameters and return 'void'".to_string(),
            Be => "функцыя 'main' не павінна мець параметраў і павінна вяртаць 'void'".to_string(),
            Ru => "функция 'main' не должна иметь параметров и должна возвращать 'void'".to_string(),
        },
        DuplicateFunctionDefinition { name } => match locale {
            En => format!("duplicate definition of the function '{name}'"),
            Be => format!("паўторнае азначэнне функцыі '{name}'"),
            Ru => format!("повторное определение функции '{name}'"),
        },
        DuplicateMethodDefinition { name, type_name } => match locale {
            En => format!("duplicate definition of the method '{name}' in the type '{type_name}'"),
            Be => format!("паўторнае азначэнне метаду '{name}' у тыпе '{type_name}'"),
            Ru => format!("повторное определение метода '{name}' в типе '{type_name}'"),
        },
        DuplicateConstructorDefinition { type_name } => match locale {
            En => format!("duplicate constructor definition in the type '{type_name}'"),
            Be => format!("паўторнае азначэнне канструктара ў тыпе '{type_name}'"),
            Ru => format!("повторное определение конструктора в типе '{type_name}'"),
        },
        CopyConstructorDefinition { type_name } => match locale {
            En => format!(
                "the copy constructor of '{type_name}' is defined implicitly and cannot be redefined"
            ),
            Be => format!(
                "канструктар капіявання тыпу '{type_name}' вызначаецца няяўна і не можа быць перавызначаны"
            ),
            Ru => format!(
                "конструктор копирования типа '{type_name}' определяется неявно и не может быть переопределён"
            ),
        },
        ReferenceMarkerInFunctionDefinition { name } => match locale {
            En => format!("the function '{name}' cannot carry a reference marker '&'"),
            Be => format!("функцыя '{name}' не можа мець пазнаку спасылкі '&'"),
            Ru => format!("функция '{name}' не может иметь пометку ссылки '&'"),
        },
        NativeFunctionWithBody { name } => match locale {
            En => format!("the native function '{name}' cannot have a body"),
            Be => format!("убудаваная функцыя '{name}' не можа мець цела"),
            Ru => format!("встроенная функция '{name}' не может иметь тела"),
        },
        NativeMethodWithBody { name } => match locale {
            En => format!("the native method '{name}' cannot have a body"),
            Be => format!("убудаваны метад '{name}' не можа мець цела"),
            Ru => format!("встроенный метод '{name}' не может иметь тела"),
        },
        NativeConstructorWithBody { type_name } => match locale {
            En => format!("the native constructor of '{type_name}' cannot have a body"),
            Be => format!("убудаваны канструктар тыпу '{type_name}' не можа мець цела"),
            Ru => format!("встроенный конструктор типа '{type_name}' не может иметь тела"),
        },
        FunctionDefinitionWithoutBody { name } => match locale {
            En => format!("the function '{name}' must have a body"),
            Be => format!("функцыя '{name}' павінна мець цела"),
            Ru => format!("функция '{name}' должна иметь тело"),
        },
        MethodDefinitionWithoutBody { name } => match locale {
            En => format!("the method '{name}' must have a body"),
            Be => format!("метад '{name}' павінен мець цела"),
            Ru => format!("метод '{name}' должен иметь тело"),
        },
        ConstructorDefinitionWithoutBody { type_name } => match locale {
            En => format!("the constructor of '{type_name}' must have a body"),
            Be => format!("канструктар тыпу '{type_name}' павінен мець цела"),
            Ru => format!("конструктор типа '{type_name}' должен иметь тело"),
        },
        InvalidReferenceAsType { name, description } => {
            let noun = description.noun();
            match locale {
                En => format!(
                    "'{name}' is {} and cannot be used as a type",
                    noun.en_indefinite
                ),
                Be => format!("'{name}' — гэта {}, а не тып", noun.be.nominative),
                Ru => format!("'{name}' — это {}, а не тип", noun.ru.nominative),
            }
        }
        OverreferencedType { type_name } => match locale {
            En => format!("cannot form a reference to the reference type '{type_name}'"),
            Be => format!("немагчыма стварыць спасылку на спасылачны тып '{type_name}'"),
            Ru => format!("невозможно создать ссылку на ссылочный тип '{type_name}'"),
        },
    }
}

/// Render a note's text.
pub(crate) fn render_note(text: &NoteText, locale: Locale) -> String {
    use Locale::*;
    match text {
        NoteText::FirstDefinitionHere => match locale {
            En => "the first definition is here".to_string(),
            Be => "першае азначэнне знаходзіцца тут".to_string(),
            Ru => "первое определение находится здесь".to_string(),
        },
        NoteText::Candidate { signature } => match locale {
            En => format!("candidate: {signature}"),
            Be => format!("кандыдат: {signature}"),
            Ru => format!("кандидат: {signature}"),
        },
    }
}
