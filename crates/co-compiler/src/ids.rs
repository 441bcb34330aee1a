//! Stable handles into the symbol registry's arenas.
//!
//! Entities reference each other through these indices instead of owning
//! pointers, which makes cyclic symbol graphs (a type whose method takes the
//! type itself, mutually recursive functions) a non-issue.

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// A type in the registry.
    TypeId
);
define_id!(
    /// A function, method or constructor in the registry.
    FuncId
);
define_id!(
    /// A variable: global, field, parameter or local.
    VarId
);
define_id!(
    /// A lookup scope.
    ScopeId
);
