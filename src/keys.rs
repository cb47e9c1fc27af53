//! # keys.rs
//!
//! The function keys of the calculator and how each one edits the buffer.
//!
//! Keys fall into four groups:
//! - calls, which open a function call (`sin(`); some of them insert an implicit
//!   `*` after a number or `)`
//! - constants, which insert a decimal number (`pi`, `e`, `ans`, `rand`)
//! - whole-buffer edits (`fact`, `inv`, `toggle-sign`)
//! - `pow`, which appends the power operator

use crate::error::Error;

/// How a function key edits the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Appends `name(`, after an implicit `*` if `implicit_mul` is set and the
    /// buffer ends in a digit or `)`.
    Call { implicit_mul: bool },
    /// Appends the decimal representation of a value.
    Constant,
    /// Rewrites the whole buffer.
    Postfix,
}

#[doc(hidden)]
/// Internal macro to define all function keys.
///
/// This macro is **not intended for public use**.
/// It generates the [`KeyFunction`] enum together with its name lookup,
/// its [`KeyAction`] and `Display`.
macro_rules! key_functions {
    ($( $variant:ident => { name: $name:literal, action: $action:expr }, )*) => {
        /// A function key on the calculator keypad.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum KeyFunction {
            $( $variant, )*
        }

        impl KeyFunction {
            /// Returns the key's name, as sent by the keypad.
            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            /// Returns how the key edits the buffer.
            pub fn action(&self) -> KeyAction {
                match self {
                    $( Self::$variant => $action, )*
                }
            }

            /// Returns a list of all key names.
            pub fn names() -> Vec<&'static str> {
                vec![$($name),*]
            }
        }

        impl std::str::FromStr for KeyFunction {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(Self::$variant), )*
                    _ => Err(Error::UnknownKeyFunction(s.to_string())),
                }
            }
        }

        impl std::fmt::Display for KeyFunction {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

key_functions! {
    Sin         => { name: "sin",         action: KeyAction::Call { implicit_mul: true } },
    Cos         => { name: "cos",         action: KeyAction::Call { implicit_mul: true } },
    Tan         => { name: "tan",         action: KeyAction::Call { implicit_mul: true } },
    Log         => { name: "log",         action: KeyAction::Call { implicit_mul: true } },
    Sqrt        => { name: "sqrt",        action: KeyAction::Call { implicit_mul: true } },
    Ln          => { name: "ln",          action: KeyAction::Call { implicit_mul: false } },
    Abs         => { name: "abs",         action: KeyAction::Call { implicit_mul: false } },
    Exp         => { name: "exp",         action: KeyAction::Call { implicit_mul: false } },
    Pi          => { name: "pi",          action: KeyAction::Constant },
    E           => { name: "e",           action: KeyAction::Constant },
    Ans         => { name: "ans",         action: KeyAction::Constant },
    Rand        => { name: "rand",        action: KeyAction::Constant },
    Fact        => { name: "fact",        action: KeyAction::Postfix },
    Inv         => { name: "inv",         action: KeyAction::Postfix },
    ToggleSign  => { name: "toggle-sign", action: KeyAction::Postfix },
    Pow         => { name: "pow",         action: KeyAction::Postfix },
}
