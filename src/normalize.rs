//! # normalize.rs
//!
//! Turns a raw calculator buffer into a canonical expression the parser accepts.
//!
//! The steps run in this order:
//! 1. close every unmatched `(` at the end of the input
//! 2. translate the display symbols `÷` and `×` to `/` and `*`
//! 3. translate function names to their canonical names (`log` is base 10 and
//!    becomes `log10`; `ln` is the natural logarithm and stays `ln`)
//! 4. replace each `<digits>!` with the value of the factorial
//!
//! Canonical names are never rewritten again, so normalizing twice gives the same
//! result as normalizing once for balanced input.

use crate::outcome::format_number;
use lazy_static::lazy_static;
use phf::Map;
use phf_macros::phf_map;
use regex::{Captures, Regex};

/// Display symbols and the ASCII operators they stand for.
const DISPLAY_SYMBOLS: [(char, char); 2] = [('÷', '/'), ('×', '*')];

/// Function names accepted in the buffer, mapped to their canonical names.
static CANONICAL_FUNCTIONS: Map<&'static str, &'static str> = phf_map! {
    "sin" => "sin",
    "cos" => "cos",
    "tan" => "tan",
    "log" => "log10",
    "ln" => "ln",
    "sqrt" => "sqrt",
    "abs" => "abs",
    "exp" => "exp",
};

lazy_static! {
    /// A run of letters directly followed by an opening parenthesis.
    static ref FUNCTION_CALL: Regex = Regex::new(r"([A-Za-z]+)\(").unwrap();

    /// An integer literal directly followed by the factorial postfix.
    static ref FACTORIAL: Regex = Regex::new(r"(\d+)!").unwrap();
}

/// Returns the canonical name of a function as typed in the buffer.
pub fn canonical_function_name(name: &str) -> Option<&'static str> {
    CANONICAL_FUNCTIONS.get(name).copied()
}

/// Computes `n!` as a float.
///
/// Returns 1 for 0 and 1, the iterative product for larger `n`, and NaN for
/// negative `n`. Products past `170!` overflow to infinity.
pub fn factorial(n: i64) -> f64 {
    if n < 0 {
        return f64::NAN;
    }

    let mut res = 1.0;
    for i in 2..=n {
        res *= i as f64;
        if res.is_infinite() {
            break;
        }
    }
    res
}

/// Appends one `)` per `(` that is still open at the end of the input.
///
/// Surplus `)` are left alone; the parser rejects them.
fn close_parentheses(expr: &str) -> String {
    let open = expr.chars().filter(|&c| c == '(').count();
    let close = expr.chars().filter(|&c| c == ')').count();

    let mut closed = String::with_capacity(expr.len() + open.saturating_sub(close));
    closed.push_str(expr);
    closed.extend(std::iter::repeat(')').take(open.saturating_sub(close)));
    closed
}

fn translate_symbols(expr: &str) -> String {
    expr.chars()
        .map(|c| {
            DISPLAY_SYMBOLS.iter()
                .find(|(symbol, _)| *symbol == c)
                .map_or(c, |(_, ascii)| *ascii)
        })
        .collect()
}

fn canonicalize_functions(expr: &str) -> String {
    FUNCTION_CALL.replace_all(expr, |caps: &Captures| {
        match canonical_function_name(&caps[1]) {
            Some(canonical) => format!("{canonical}("),
            None => caps[0].to_string(),
        }
    }).into_owned()
}

/// Replaces every `<digits>!` with its value, repeating until none is left so
/// that chained postfixes such as `3!!` resolve fully.
fn resolve_factorials(expr: &str) -> String {
    let mut resolved = expr.to_string();
    // each pass removes at least one `!`
    while FACTORIAL.is_match(&resolved) {
        resolved = FACTORIAL.replace_all(&resolved, |caps: &Captures| {
            // literals too long for i64 are far past the overflow point anyway
            let value = caps[1].parse::<i64>()
                .map_or(f64::INFINITY, factorial);
            format_number(value)
        }).into_owned();
    }
    resolved
}

/// Rewrites a raw buffer into a canonical expression.
///
/// Incomplete input is tolerated: open parentheses are closed rather than
/// reported. Everything the parser would not understand is left in place so that
/// evaluation reports it.
///
/// # Example
/// ```rust
/// use calcpad::normalize_expression;
///
/// assert_eq!(normalize_expression("2×log(100"), "2*log10(100)");
/// assert_eq!(normalize_expression("3!+1"), "6+1");
/// ```
pub fn normalize_expression(expr: &str) -> String {
    let closed = close_parentheses(expr);
    let translated = translate_symbols(&closed);
    let canonical = canonicalize_functions(&translated);
    let resolved = resolve_factorials(&canonical);

    tracing::debug!(input = expr, canonical = %resolved, "normalized expression");
    resolved
}

#[cfg(test)]
mod factorial_tests {
    use super::*;

    #[test]
    fn test_small_values() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(1), 1.0);
        assert_eq!(factorial(2), 2.0);
        assert_eq!(factorial(5), 120.0);
        assert_eq!(factorial(10), 3628800.0);
    }

    #[test]
    fn test_negative_is_nan() {
        assert!(factorial(-3).is_nan());
        assert!(factorial(-1).is_nan());
    }

    #[test]
    fn test_overflow_stops_early() {
        assert!(factorial(170).is_finite());
        assert!(factorial(171).is_infinite());
        assert!(factorial(i64::MAX).is_infinite());
    }
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    #[test]
    fn test_auto_close() {
        assert_eq!(normalize_expression("(2+3"), "(2+3)");
        assert_eq!(normalize_expression("((1"), "((1))");
        assert_eq!(normalize_expression("sqrt(4"), "sqrt(4)");
        // surplus right parentheses are not touched
        assert_eq!(normalize_expression("2)"), "2)");
    }

    #[test]
    fn test_display_symbols() {
        assert_eq!(normalize_expression("6÷2×3"), "6/2*3");
    }

    #[test]
    fn test_log_is_base_ten_and_ln_is_natural() {
        assert_eq!(normalize_expression("log(100)"), "log10(100)");
        assert_eq!(normalize_expression("ln(2)"), "ln(2)");
        assert_eq!(normalize_expression("log(ln(3))"), "log10(ln(3))");
    }

    #[test]
    fn test_function_names() {
        assert_eq!(normalize_expression("5*sin(30)+cos(0)"), "5*sin(30)+cos(0)");
        assert_eq!(normalize_expression("2log(10)"), "2log10(10)");
        // unknown names are left for the parser to reject
        assert_eq!(normalize_expression("asin(1)"), "asin(1)");
    }

    #[test]
    fn test_factorial_rewrite() {
        assert_eq!(normalize_expression("5!"), "120");
        assert_eq!(normalize_expression("2+3!"), "2+6");
        assert_eq!(normalize_expression("0!*1!"), "1*1");
        // the postfix applies to the digits only
        assert_eq!(normalize_expression("2.5!"), "2.120");
        // not an integer literal: left in place
        assert_eq!(normalize_expression("(2+3)!"), "(2+3)!");
    }

    #[test]
    fn test_chained_factorial() {
        assert_eq!(normalize_expression("3!!"), "720");
        assert_eq!(normalize_expression("2!!!+1"), "2+1");
        assert_eq!(normalize_expression("6!!"), "Infinity");
    }

    #[test]
    fn test_factorial_overflow() {
        assert_eq!(normalize_expression("171!"), "Infinity");
        assert_eq!(normalize_expression("99999999999999999999!"), "Infinity");
    }

    #[test]
    fn test_idempotent_for_balanced_input() {
        let inputs = [
            "2+3*4",
            "(2+3)*4",
            "log(100)+ln(2)",
            "6÷2×sqrt(9)",
            "4!-abs(-3)",
            "1/(exp(1))",
            "2**10",
            "3!!",
        ];
        for input in inputs {
            let once = normalize_expression(input);
            assert_eq!(normalize_expression(&once), once, "input: {}", input);
        }
    }
}
