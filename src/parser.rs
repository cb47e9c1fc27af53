//! # parser.rs
//!
//! This module parses canonical calculator expressions into an Abstract Syntax Tree (AST)
//! and evaluates them to a real number.
//!
//! It supports:
//! - Decimal and scientific literals
//! - Unary `+`/`-` and the binary operators `+ - * / **` (`^` is read as `**`)
//! - A fixed whitelist of one-argument functions (sin, cos, tan, log10, ln, sqrt, abs, exp)
//! - Parentheses
//!
//! Nothing outside this whitelist is reachable from an input string: there are no
//! variables, no user-defined functions and no code execution.
//!
//! # Notes
//! - `**` is right-associative and binds tighter than unary minus (`-2**2 == -4`).
//! - Unary and binary operators sharing symbols (`-` for negation and subtraction) are
//!   disambiguated based on whether the previous token finished a value.
//! - Parentheses must already be balanced; `normalize` closes the open ones.

use crate::error::EvalError;
use crate::lexer::{self, Lexeme, POWER_OPERATOR};

macro_rules! lexeme_name_with_range {
    ($lexeme: expr) => {
        format!("{name} at {start}..{end}", name=$lexeme.text(), start=$lexeme.start(), end=$lexeme.end())
    };
}

/// Alternative spelling of [`POWER_OPERATOR`] accepted in typed input.
const POWER_ALIAS: &str = "^";

/// Precedence of prefix operators: above `*` and `/`, below `**`.
const UNARY_PRECEDENCE: u8 = 2;

#[doc(hidden)]
/// Internal macro to define all unary operators.
///
/// This macro is **not intended for public use**.
/// It centralizes the enum variants, string representation, and apply logic for unary operators.
macro_rules! unary_operator_kind {
    ($($name:ident => { symbol: $symbol:literal, apply: $apply:expr }),* $(,)?) => {
        /// Represents a unary operator in a calculator expression.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum UnaryOperatorKind {
            $($name),*
        }

        impl UnaryOperatorKind {
            /// Converts a string representation to a `UnaryOperatorKind`.
            pub fn from(s: &str) -> Option<Self> {
                match s {
                    $( $symbol => Some(Self::$name), )*
                    _ => None,
                }
            }

            /// Applies the unary operator to a number.
            pub fn apply(&self, x: f64) -> f64 {
                match self {
                    $( Self::$name => $apply(x), )*
                }
            }
        }

        impl std::fmt::Display for UnaryOperatorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $( Self::$name => $symbol, )*
                };
                write!(f, "{}", s)
            }
        }
    };
}

unary_operator_kind! {
    Positive => { symbol: "+", apply: |x: f64| x },
    Negative => { symbol: "-", apply: |x: f64| -x },
}

/// Information about a binary operator in a calculator expression.
///
/// Contains the operator's precedence and associativity, which are used
/// when parsing expressions to determine the order of operations.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperatorInfo {
    /// Operator precedence (higher value means higher precedence).
    pub precedence: u8,

    /// Whether the operator is left-associative.
    pub is_left_assoc: bool,
}

#[doc(hidden)]
/// Internal macro to define all binary operators.
///
/// This macro is **not intended for public use**.
/// It centralizes the enum variants, string representation, precedence, associativity, and apply logic.
macro_rules! binary_operators {
    ($($name:ident => {
        symbol: $symbol:literal,
        precedence: $prec:expr,
        left_assoc: $assoc:expr,
        apply: $apply:expr
    }),* $(,)?) => {
        /// Represents a binary operator in a calculator expression.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum BinaryOperatorKind {
            $($name),*
        }

        impl BinaryOperatorKind {
            /// Returns operator precedence and associativity.
            pub fn info(&self) -> BinaryOperatorInfo {
                match self {
                    $(Self::$name => BinaryOperatorInfo { precedence: $prec, is_left_assoc: $assoc },)*
                }
            }

            /// Converts a string to the corresponding operator.
            pub fn from(s: &str) -> Option<Self> {
                match s {
                    $($symbol => Some(Self::$name),)*
                    _ => None,
                }
            }

            /// Applies the operator to two numbers.
            pub fn apply(&self, l: f64, r: f64) -> f64 {
                match self {
                    $(Self::$name => $apply(l, r),)*
                }
            }
        }

        impl std::fmt::Display for BinaryOperatorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $(Self::$name => $symbol,)*
                };
                write!(f, "{}", s)
            }
        }
    };
}

binary_operators! {
    Add => { symbol: "+",  precedence: 0, left_assoc: true,  apply: |l: f64, r: f64| l + r },
    Sub => { symbol: "-",  precedence: 0, left_assoc: true,  apply: |l: f64, r: f64| l - r },
    Mul => { symbol: "*",  precedence: 1, left_assoc: true,  apply: |l: f64, r: f64| l * r },
    Div => { symbol: "/",  precedence: 1, left_assoc: true,  apply: |l: f64, r: f64| l / r },
    Pow => { symbol: "**", precedence: 3, left_assoc: false, apply: |l: f64, r: f64| l.powf(r) },
}

#[doc(hidden)]
/// Internal macro for defining the whitelisted functions.
///
/// This macro is **not intended for public use**.
/// Each entry declares the enum variant, its canonical name as it appears in a
/// normalized expression, and how it is applied to its single argument.
/// To add or remove a function, update the list inside this macro and the
/// display-name table in `normalize`.
macro_rules! functions {
    ($( $variant: ident => { name: $name:literal, apply: $apply:expr }, )*) => {
        /// A whitelisted one-argument mathematical function.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum FunctionKind {
            $( $variant, )*
        }

        impl FunctionKind {
            /// Converts a canonical function name into a `FunctionKind`.
            ///
            /// Returns `None` if the string does not match any supported function.
            pub fn from(s: &str) -> Option<Self> {
                match s {
                    $( $name => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// Returns a list of all canonical function names.
            pub fn names() -> Vec<&'static str> {
                vec![$($name),*]
            }

            /// Applies the function to its argument.
            pub fn apply(&self, x: f64) -> f64 {
                match self {
                    $( Self::$variant => $apply(x), )*
                }
            }
        }

        impl std::fmt::Display for FunctionKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $( Self::$variant => $name, )*
                };
                write!(f, "{}", s)
            }
        }
    };
}

functions! {
    Sin     => { name: "sin",   apply: f64::sin },
    Cos     => { name: "cos",   apply: f64::cos },
    Tan     => { name: "tan",   apply: f64::tan },
    Log10   => { name: "log10", apply: f64::log10 },
    Ln      => { name: "ln",    apply: f64::ln },
    Sqrt    => { name: "sqrt",  apply: f64::sqrt },
    Abs     => { name: "abs",   apply: f64::abs },
    Exp     => { name: "exp",   apply: f64::exp },
}

/// Represents a parsed token in a canonical expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal.
    Number(f64),

    /// Operator whose arity is not known yet, holding the original lexeme.
    Operator(Lexeme),

    /// Unary operator token (`+`, `-`).
    UnaryOperator(UnaryOperatorKind),

    /// Binary operator token (`+`, `-`, `*`, `/`, `**`).
    BinaryOperator(BinaryOperatorKind),

    /// Whitelisted function token (e.g. `sin`, `log10`).
    Function(FunctionKind),

    /// Left parenthesis `'('`.
    LParen(Lexeme),

    /// Right parenthesis `')'`.
    RParen(Lexeme),
}

impl Token {
    /// Converts a lexeme into a corresponding `Token`.
    ///
    /// Only lexemes starting with a digit or `.` are read as numbers, so words such
    /// as `inf` or `NaN` are unknown tokens rather than floating-point specials.
    pub fn from(lexeme: &Lexeme) -> Result<Self, EvalError> {
        let text = lexeme.text();

        if text.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return text.parse::<f64>()
                .map(Token::Number)
                .map_err(|_| EvalError::Syntax(format!("Malformed number {}", lexeme_name_with_range!(lexeme))));
        }

        /* We can't know whether the text is unary operator or binary operator
         * because some operator's strings are the same.
         * So we register only its lexeme. */
        let text = if text == POWER_ALIAS { POWER_OPERATOR } else { text };
        if UnaryOperatorKind::from(text).is_some() || BinaryOperatorKind::from(text).is_some() {
            return Ok(Token::Operator(Lexeme::new(text, lexeme.start()..lexeme.end())));
        }

        if let Some(func_kind) = FunctionKind::from(text) {
            return Ok(Token::Function(func_kind));
        }

        match text {
            "(" => Ok(Token::LParen(lexeme.clone())),
            ")" => Ok(Token::RParen(lexeme.clone())),
            _ => Err(EvalError::UnknownToken(lexeme_name_with_range!(lexeme))),
        }
    }
}

/// Abstract Syntax Tree (AST) node representing a calculator expression.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal.
    Number(f64),

    /// Unary operator applied to an expression.
    UnaryOperator {
        kind: UnaryOperatorKind,
        expr: Box<AstNode>,
    },

    /// Binary operator applied to left and right expressions.
    BinaryOperator {
        kind: BinaryOperatorKind,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },

    /// Function call on a single argument expression.
    FunctionCall {
        kind: FunctionKind,
        arg: Box<AstNode>,
    },
}

/// Deepest tree [`AstNode::from`] builds.
///
/// Evaluating and dropping a tree both recurse once per level.
pub const MAX_DEPTH: usize = 2048;

/// Node on the parser's output stack, paired with the depth of its tree.
type Operand = (AstNode, usize);

/// AstNode impl `from` and its helper impls
impl AstNode {
    /// Parses a slice of lexemes into an AST node.
    ///
    /// Implements a shunting-yard parser handling numbers, unary/binary operators,
    /// function calls and parentheses.
    ///
    /// # Returns
    /// - `Ok(AstNode)` representing the root of the parsed AST.
    /// - `Err(EvalError)` if parsing fails due to invalid syntax or unknown tokens,
    ///   or if the tree would be deeper than [`MAX_DEPTH`].
    pub fn from(lexemes: &[Lexeme]) -> Result<Self, EvalError> {
        let mut ast_nodes: Vec<Operand> = Vec::new();
        let mut token_stack: Vec<Token> = Vec::new();
        // number of AST nodes when each open parenthesis was pushed
        let mut paren_bases: Vec<usize> = Vec::new();
        // record whether the previous token is finished by value or not to evaluate the token is unary operator or binary operator.
        let mut prev_is_value = false;
        let mut pending_function: Option<FunctionKind> = None;

        for lexeme in lexemes {
            let token = Token::from(lexeme)?;

            if let Some(func) = pending_function.take() {
                if !matches!(token, Token::LParen(_)) {
                    return Err(EvalError::Syntax(format!(
                        "Expected ( after {func}, found {}", lexeme_name_with_range!(lexeme)
                    )));
                }
            }

            match token {
                Token::Number(val) => {
                    Self::ensure_operator_before(prev_is_value, lexeme)?;
                    ast_nodes.push((Self::Number(val), 1));
                    prev_is_value = true;
                },
                Token::Operator(lexeme) => {
                    match prev_is_value {
                        true => Self::parse_in_binary_operator(&mut ast_nodes, &mut token_stack, &lexeme)?,
                        false => Self::parse_in_unary_operator(&mut token_stack, &lexeme)?,
                    };
                    prev_is_value = false;
                },
                Token::Function(func) => {
                    Self::ensure_operator_before(prev_is_value, lexeme)?;
                    token_stack.push(token);
                    pending_function = Some(func);
                    prev_is_value = false;
                },
                Token::LParen(_) => {
                    Self::ensure_operator_before(prev_is_value, lexeme)?;
                    token_stack.push(token);
                    paren_bases.push(ast_nodes.len());
                    prev_is_value = false; // The operator next to LParen is unary operator; ex) cos(-x), 3 * (-2)
                },
                Token::RParen(_) => {
                    Self::parse_in_right_paren(&mut ast_nodes, &mut token_stack, &mut paren_bases, lexeme)?;
                    prev_is_value = true; // The operator next to RParen is binary operator; ex) sin(x) + 2, (x+2)/(x-3)
                },
                _ => return Err(EvalError::Syntax(format!("Invalid token kind made from {}", lexeme_name_with_range!(lexeme)))),
            }
        }

        if let Some(func) = pending_function {
            return Err(EvalError::Syntax(format!("Missing argument list for {func}")));
        }

        while let Some(token) = token_stack.pop() {
            match token {
                Token::LParen(lexeme) => {
                    return Err(EvalError::Syntax(format!("Unclosed parenthesis {}", lexeme_name_with_range!(lexeme))));
                },
                token => Self::reduce(&mut ast_nodes, token)?,
            }
        }

        let (ret, _) = ast_nodes.pop()
            .ok_or(EvalError::Empty)?;

        if !ast_nodes.is_empty() {
            return Err(EvalError::Syntax("Fail to parse to AST. There are too AST node remaining.".into()));
        }
        Ok(ret)
    }

    /// Rejects a value that directly follows another value, as in `2 3` or `2(3)`.
    fn ensure_operator_before(prev_is_value: bool, lexeme: &Lexeme) -> Result<(), EvalError> {
        if prev_is_value {
            return Err(EvalError::Syntax(format!("Missing operator before {}", lexeme_name_with_range!(lexeme))));
        }
        Ok(())
    }

    /// Pops a single operator or function off the stack into the AST.
    fn reduce(ast_nodes: &mut Vec<Operand>, token: Token) -> Result<(), EvalError> {
        match token {
            Token::UnaryOperator(oper) => Self::from_unary(ast_nodes, oper),
            Token::BinaryOperator(oper) => Self::from_binary(ast_nodes, oper),
            Token::Function(func) => Self::from_function(ast_nodes, func),
            other => Err(EvalError::Syntax(format!("Unexpected token in stack: {:?}", other))),
        }
    }

    /// Parses tokens in a subexpression until the matching left parenthesis.
    ///
    /// Pops tokens from `token_stack` and constructs AST nodes into `ast_nodes`.
    /// If a function is waiting directly before the parenthesis, it is applied to the
    /// enclosed value.
    ///
    /// # Returns
    /// - `Ok(())` on success.
    /// - `Err(EvalError)` on a stray `)` or an empty pair of parentheses.
    fn parse_in_right_paren(
        ast_nodes: &mut Vec<Operand>,
        token_stack: &mut Vec<Token>,
        paren_bases: &mut Vec<usize>,
        lexeme: &Lexeme,
    ) -> Result<(), EvalError> {
        loop {
            match token_stack.pop() {
                Some(Token::LParen(_)) => break,
                Some(token) => Self::reduce(ast_nodes, token)?,
                None => {
                    return Err(EvalError::Syntax(format!(
                        "Unmatched right parenthesis {}", lexeme_name_with_range!(lexeme)
                    )));
                },
            }
        }

        let base = paren_bases.pop().unwrap_or_default();
        if ast_nodes.len() != base + 1 {
            return Err(EvalError::Syntax(format!(
                "Empty parentheses closed by {}", lexeme_name_with_range!(lexeme)
            )));
        }

        if let Some(Token::Function(func)) = token_stack.last().cloned() {
            token_stack.pop();
            Self::from_function(ast_nodes, func)?;
        }
        Ok(())
    }

    /// Parses a unary operator token and pushes it onto the token stack.
    fn parse_in_unary_operator(
        token_stack: &mut Vec<Token>,
        lexeme: &Lexeme,
    ) -> Result<(), EvalError> {
        if let Some(oper_kind) = UnaryOperatorKind::from(lexeme.text()) {
            token_stack.push(Token::UnaryOperator(oper_kind));
            Ok(())
        } else {
            Err(EvalError::Syntax(format!("Missing operand before {}", lexeme_name_with_range!(lexeme))))
        }
    }

    /// Parses a binary operator token, resolves operator precedence, and pushes it onto the token stack.
    ///
    /// Implements the shunting-yard precedence rules for left- and right-associative operators.
    /// Pending prefix operators take part with [`UNARY_PRECEDENCE`].
    fn parse_in_binary_operator(
        ast_nodes: &mut Vec<Operand>,
        token_stack: &mut Vec<Token>,
        lexeme: &Lexeme,
    ) -> Result<(), EvalError> {
        let oper_kind = BinaryOperatorKind::from(lexeme.text())
            .ok_or_else(|| EvalError::Syntax(format!("Unknown binary operator {}", lexeme_name_with_range!(lexeme))))?;
        let oper_info = oper_kind.info();

        while let Some(top) = token_stack.last() {
            let top_precedence = match top {
                Token::BinaryOperator(top_oper) => top_oper.info().precedence,
                Token::UnaryOperator(_) => UNARY_PRECEDENCE,
                _ => break,
            };
            if (oper_info.is_left_assoc && (top_precedence < oper_info.precedence))
                || (!oper_info.is_left_assoc && (top_precedence <= oper_info.precedence))
            {
                break;
            }
            if let Some(token) = token_stack.pop() {
                Self::reduce(ast_nodes, token)?;
            }
        }
        token_stack.push(Token::BinaryOperator(oper_kind));
        Ok(())
    }

    /// Depth of a node whose deepest child has depth `child`.
    fn parent_depth(child: usize) -> Result<usize, EvalError> {
        match child + 1 {
            depth if depth > MAX_DEPTH => Err(EvalError::TooDeep(MAX_DEPTH)),
            depth => Ok(depth),
        }
    }

    /// Internal helper to create a unary operator AST node from a stack.
    fn from_unary(
        stack: &mut Vec<Operand>,
        oper: UnaryOperatorKind,
    ) -> Result<(), EvalError> {
        let (expr, depth) = stack.pop()
            .ok_or_else(|| EvalError::Syntax(format!("Missing operand for unary {}", oper)))?;
        let depth = Self::parent_depth(depth)?;
        stack.push((Self::UnaryOperator { kind: oper, expr: Box::new(expr) }, depth));
        Ok(())
    }

    /// Internal helper to create a binary operator AST node from a stack.
    ///
    /// The right-hand operand is expected at the top of the stack,
    /// followed by the left-hand operand.
    fn from_binary(
        stack: &mut Vec<Operand>,
        oper: BinaryOperatorKind,
    ) -> Result<(), EvalError> {
        let (right, right_depth) = stack.pop()
            .ok_or_else(|| EvalError::Syntax(format!("Missing right operand for {}", oper)))?;
        let (left, left_depth) = stack.pop()
            .ok_or_else(|| EvalError::Syntax(format!("Missing left operand for {}", oper)))?;
        let depth = Self::parent_depth(left_depth.max(right_depth))?;
        stack.push((Self::BinaryOperator {
            kind: oper,
            left: Box::new(left),
            right: Box::new(right),
        }, depth));
        Ok(())
    }

    /// Internal helper to create a function call AST node from a stack.
    fn from_function(
        stack: &mut Vec<Operand>,
        func: FunctionKind,
    ) -> Result<(), EvalError> {
        let (arg, depth) = stack.pop()
            .ok_or_else(|| EvalError::Syntax(format!("Missing function argument for {}", func)))?;
        let depth = Self::parent_depth(depth)?;
        stack.push((Self::FunctionCall { kind: func, arg: Box::new(arg) }, depth));
        Ok(())
    }
}

/// AstNode impl `eval`
impl AstNode {
    /// Evaluates the tree to a number.
    ///
    /// Follows IEEE-754 semantics: `1/0` is infinite and `sqrt(-1)` is NaN.
    /// Callers decide what to do with non-finite values.
    pub fn eval(&self) -> f64 {
        match self {
            Self::Number(val) => *val,
            Self::UnaryOperator { kind, expr } => kind.apply(expr.eval()),
            Self::BinaryOperator { kind, left, right } => kind.apply(left.eval(), right.eval()),
            Self::FunctionCall { kind, arg } => kind.apply(arg.eval()),
        }
    }
}

/// Evaluates a canonical expression.
///
/// The input is expected to be the output of [`crate::normalize::normalize_expression`]:
/// balanced parentheses, ASCII operators, canonical function names and no `!`.
///
/// # Returns
/// - `Ok(value)` for a finite result.
/// - `Err(EvalError)` for syntax errors, unknown tokens, or a NaN/infinite result.
pub fn evaluate(canonical: &str) -> Result<f64, EvalError> {
    let lexemes = lexer::from(canonical);
    if lexemes.is_empty() {
        return Err(EvalError::Empty);
    }

    let value = AstNode::from(&lexemes)?.eval();
    if !value.is_finite() {
        return Err(EvalError::NonFinite(value));
    }

    tracing::debug!(expression = canonical, value, "evaluated expression");
    Ok(value)
}


#[cfg(test)]
mod token_tests {
    use super::*;

    fn token(text: &str) -> Result<Token, EvalError> {
        Token::from(&Lexeme::new(text, 0..text.len()))
    }

    #[test]
    fn test_number_token() {
        assert_eq!(token("42"), Ok(Token::Number(42.0)));
        assert_eq!(token(".5"), Ok(Token::Number(0.5)));
        assert_eq!(token("1e21"), Ok(Token::Number(1e21)));
        assert!(matches!(token("1.2.3"), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_float_specials_are_unknown() {
        assert!(matches!(token("inf"), Err(EvalError::UnknownToken(_))));
        assert!(matches!(token("NaN"), Err(EvalError::UnknownToken(_))));
        assert!(matches!(token("Infinity"), Err(EvalError::UnknownToken(_))));
    }

    #[test]
    fn test_operator_token() {
        assert!(matches!(token("-"), Ok(Token::Operator(_))));
        match token("^") {
            Ok(Token::Operator(lexeme)) => assert_eq!(lexeme.text(), "**"),
            other => panic!("Expected power operator, got {:?}", other),
        }
    }

    #[test]
    fn test_function_and_paren_tokens() {
        assert_eq!(token("sqrt"), Ok(Token::Function(FunctionKind::Sqrt)));
        assert!(matches!(token("("), Ok(Token::LParen(_))));
        assert!(matches!(token(")"), Ok(Token::RParen(_))));
    }

    #[test]
    fn test_unknown_string() {
        assert!(matches!(token("!"), Err(EvalError::UnknownToken(_))));
        assert!(matches!(token("alert"), Err(EvalError::UnknownToken(_))));
    }
}
