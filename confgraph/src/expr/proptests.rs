//! Property-based tests for the expression evaluator.

use super::{evaluate, AttrValue, EvalContext, EvalError};
use proptest::prelude::*;

fn eval(source: &str) -> Result<AttrValue, EvalError> {
    evaluate(source, &EvalContext::default())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Integer literals evaluate to themselves
    #[test]
    fn integer_literal_is_identity(n in 0i64..=i64::MAX) {
        prop_assert_eq!(eval(&n.to_string()), Ok(AttrValue::Int(n)));
    }

    // Small integer sums match native arithmetic
    #[test]
    fn integer_addition_matches_native(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let source = format!("({a}) + ({b})");
        prop_assert_eq!(eval(&source), Ok(AttrValue::Int(a + b)));
    }

    // Floor division and modulo reconstruct the dividend
    #[test]
    fn floor_div_mod_identity(a in -10_000i64..10_000, b in prop::sample::select(vec![-7i64, -3, -1, 1, 2, 5, 13])) {
        let quotient = eval(&format!("({a}) // ({b})"));
        let remainder = eval(&format!("({a}) % ({b})"));
        match (quotient, remainder) {
            (Ok(AttrValue::Int(q)), Ok(AttrValue::Int(r))) => {
                prop_assert_eq!(q * b + r, a);
                prop_assert!(r == 0 || (r < 0) == (b < 0));
            }
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }

    // The evaluator never panics, whatever the input
    #[test]
    fn arbitrary_input_never_panics(source in "[ -~]{0,40}") {
        let _ = eval(&source);
    }

    // Nesting of any depth yields a result rather than exhausting the stack
    #[test]
    fn nesting_depth_is_bounded(depth in 0usize..5_000) {
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let result = eval(&source);
        if depth <= 100 {
            prop_assert_eq!(result, Ok(AttrValue::Int(1)));
        } else if depth > 200 {
            prop_assert!(
                matches!(result, Err(EvalError::Syntax { .. })),
                "expected a syntax error, got {:?}",
                result
            );
        }
    }

    // Quoted strings without escapes round-trip
    #[test]
    fn plain_string_literal(text in "[a-zA-Z0-9 _.-]{0,20}") {
        let source = format!("'{text}'");
        prop_assert_eq!(eval(&source), Ok(AttrValue::Str(text)));
    }
}
