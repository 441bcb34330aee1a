//! C identifier generation.
//!
//! Every emitted entity gets a stable name `co_<sanitised qualified name>`,
//! with a `_N` suffix whenever sanitisation or overloading collides. Local
//! variables keep their source names (C block scoping matches CO block
//! scoping), adjusted only to dodge C keywords and the `co_`/`_` helper
//! prefixes.

use rustc_hash::FxHashMap;

/// Allocates unique C identifiers from qualified names.
#[derive(Debug, Default)]
pub struct NameGenerator {
    used: FxHashMap<String, u32>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `co_<sanitised>` with a collision counter.
    pub fn global(&mut self, qualified: &str) -> String {
        let base = format!("co_{}", sanitize(qualified));
        self.unique(base)
    }

    /// A local/parameter/field name: source name, keyword-safe, unique
    /// within the generator.
    pub fn local(&mut self, name: &str) -> String {
        let mut base = sanitize(name);
        if is_c_keyword(&base) || base.starts_with("co_") || base.starts_with('_') {
            base.push('_');
        }
        self.unique(base)
    }

    fn unique(&mut self, base: String) -> String {
        match self.used.get_mut(&base) {
            None => {
                self.used.insert(base.clone(), 0);
                base
            }
            Some(count) => {
                *count += 1;
                format!("{base}_{count}")
            }
        }
    }
}

fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn is_c_keyword(word: &str) -> bool {
    matches!(
        word,
        "auto" | "break" | "case" | "char" | "const" | "continue" | "default" | "do" | "double"
            | "else" | "enum" | "extern" | "float" | "for" | "goto" | "if" | "inline" | "int"
            | "long" | "register" | "restrict" | "return" | "short" | "signed" | "sizeof"
            | "static" | "struct" | "switch" | "typedef" | "union" | "unsigned" | "void"
            | "volatile" | "while" | "main"
    )
}
