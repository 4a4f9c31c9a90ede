//! Property tests for the compiler and builders.

use proptest::prelude::*;

use super::*;
use crate::builder::{Condition as Cond, Where, where_};
use crate::error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators
// ═══════════════════════════════════════════════════════════════════════════

fn property_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

fn string_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z ]{1,16}"
}

/// Conditions every default backend table entry accepts.
fn condition_strategy() -> impl Strategy<Value = Cond> {
    let number = any::<i64>();
    prop_oneof![
        (property_strategy(), number).prop_map(|(p, n)| Cond::with_prop(p).eq(n)),
        (property_strategy(), number).prop_map(|(p, n)| Cond::with_prop(p).ne(n)),
        (property_strategy(), number).prop_map(|(p, n)| Cond::with_prop(p).lt(n)),
        (property_strategy(), number).prop_map(|(p, n)| Cond::with_prop(p).lte(n)),
        (property_strategy(), number).prop_map(|(p, n)| Cond::with_prop(p).gt(n)),
        (property_strategy(), number).prop_map(|(p, n)| Cond::with_prop(p).gte(n)),
        (property_strategy(), string_value_strategy())
            .prop_map(|(p, s)| Cond::with_prop(p).eq(s)),
        (property_strategy(), string_value_strategy())
            .prop_map(|(p, s)| Cond::with_prop(p).ne(s)),
        (property_strategy(), any::<bool>()).prop_map(|(p, b)| Cond::with_prop(p).is(b)),
        property_strategy().prop_map(|p| Cond::with_prop(p).exists()),
        property_strategy().prop_map(|p| Cond::with_prop(p).missing()),
    ]
}

fn compile_nested(cond: &Cond, fields: &FieldSet) -> EsQuery {
    let ast = Expr::Condition(cond.to_ast().unwrap());
    Compiler::new().compile_node(&ast, fields, 0).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Text built from a condition compiles like the condition's AST.
    #[test]
    fn prop_round_trip(cond in condition_strategy()) {
        let fields = FieldSet::new();
        let from_text = Compiler::new().compile_text(&cond.build(), &fields).unwrap();
        let from_ast = Compiler::new()
            .compile_expr(&Expr::Condition(cond.to_ast().unwrap()), &fields)
            .unwrap();
        prop_assert_eq!(&from_text, &from_ast);
        prop_assert_eq!(from_text, parse(&cond, &fields).unwrap());
    }

    #[test]
    fn prop_join_distribution(a in condition_strategy(), b in condition_strategy()) {
        let fields = FieldSet::new();
        let expected = vec![compile_nested(&a, &fields), compile_nested(&b, &fields)];

        let and = parse(&where_(a.clone()).and(b.clone()).unwrap(), &fields).unwrap();
        prop_assert_eq!(and, EsQuery::must(expected.clone()));

        let or = parse(&where_(a).or(b).unwrap(), &fields).unwrap();
        prop_assert_eq!(or, EsQuery::should(expected));
    }

    #[test]
    fn prop_nesting_preserves_grouping(
        a in condition_strategy(),
        b in condition_strategy(),
        c in condition_strategy(),
    ) {
        let fields = FieldSet::new();
        let nested = where_(a.clone())
            .and(where_(b.clone()).or(c.clone()).unwrap())
            .unwrap();

        prop_assert_eq!(
            parse(&nested, &fields).unwrap(),
            EsQuery::must(vec![
                compile_nested(&a, &fields),
                EsQuery::should(vec![compile_nested(&b, &fields), compile_nested(&c, &fields)]),
            ])
        );
    }

    /// Switching join at any position fails.
    #[test]
    fn prop_mixed_join_guard(
        conds in prop::collection::vec(condition_strategy(), 1..6),
        start_with_and in any::<bool>(),
        extra in condition_strategy(),
    ) {
        let mut w = Where::new();
        for cond in conds {
            w = if start_with_and { w.and(cond) } else { w.or(cond) }.unwrap();
        }
        let result = if start_with_and { w.or(extra) } else { w.and(extra) };
        prop_assert!(matches!(result, Err(Error::IllegalJoinMix { .. })), "mixed join accepted");
    }

    /// Only string equality and inequality depend on the field set.
    #[test]
    fn prop_field_classification_scope(cond in condition_strategy()) {
        let name = cond.property().unwrap().to_string();
        let plain = parse(&cond, &FieldSet::new()).unwrap();
        let classified = parse(&cond, &FieldSet::from([name])).unwrap();

        let is_string_equality = matches!(
            (cond.operator(), cond.value()),
            (Some(OperatorTag::Eq | OperatorTag::Ne), Some(crate::dsl::Literal::String(_)))
        );
        prop_assert_eq!(plain != classified, is_string_equality);
    }

    #[test]
    fn prop_idempotent(
        a in condition_strategy(),
        b in condition_strategy(),
        c in condition_strategy(),
    ) {
        let fields = FieldSet::new();
        let ast = where_(a).or(where_(b).and(c).unwrap()).unwrap().to_ast().unwrap();
        let compiler = Compiler::new();
        prop_assert_eq!(
            compiler.compile_expr(&ast, &fields).unwrap(),
            compiler.compile_expr(&ast, &fields).unwrap()
        );
    }
}
