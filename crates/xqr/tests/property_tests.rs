//! Property-based tests for the query front end and tree engine
//!
//! These tests use proptest to verify:
//! 1. Parsing is deterministic and `Display` output parses back to the same query
//! 2. Search never exceeds its limit and never returns nested matches
//! 3. Comparisons are inapplicable whenever operand types differ

use proptest::prelude::*;
use xqr::{compare, search, Comparison, ElementSpec, Literal, Operator, Query, XmlElement};

const NAMES: [&str; 3] = ["a", "b", "c"];

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn arb_spec() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_name(),
        arb_name().prop_map(|a| format!(".{a}")),
        (arb_name(), arb_name()).prop_map(|(n, a)| format!("{n}.{a}")),
    ]
}

fn arb_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|n| n.to_string()),
        "[a-z0-9<>=]{0,8}".prop_map(|s| format!("\"{s}\"")),
    ]
}

fn arb_query() -> impl Strategy<Value = String> {
    let from = prop_oneof![
        Just(String::new()),
        Just(" ROOT".to_string()),
        arb_spec().prop_map(|s| format!(" {s}")),
    ];
    let condition = (
        0usize..4,
        arb_spec(),
        prop::sample::select(vec![">", "<", "="]),
        arb_literal(),
        any::<bool>(),
    )
        .prop_map(|(nots, target, op, lit, split)| {
            let nots = " NOT".repeat(nots);
            if split {
                format!(" WHERE{nots} {target} {op} {lit}")
            } else {
                // a fused condition splits at its last operator
                let lit = lit.replace(['<', '>', '='], "");
                format!(" WHERE{nots} {target}{op}{lit}")
            }
        });
    let limit = prop::option::of(0usize..50);

    (arb_name(), from, prop::option::of(condition), limit).prop_map(
        |(select, from, condition, limit)| {
            let mut query = format!("SELECT {select} FROM{from}");
            if let Some(condition) = condition {
                query.push_str(&condition);
            }
            if let Some(limit) = limit {
                query.push_str(&format!(" LIMIT {limit}"));
            }
            query
        },
    )
}

fn arb_tree() -> impl Strategy<Value = XmlElement> {
    let leaf = prop::sample::select(NAMES.to_vec()).prop_map(XmlElement::new);
    leaf.prop_recursive(5, 64, 4, |inner| {
        (
            prop::sample::select(NAMES.to_vec()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, children)| {
                children
                    .into_iter()
                    .fold(XmlElement::new(name), XmlElement::with_child)
            })
    })
}

fn is_descendant(ancestor: &XmlElement, node: &XmlElement) -> bool {
    ancestor
        .elements()
        .any(|child| std::ptr::eq(child, node) || is_descendant(child, node))
}

proptest! {
    /// Every generated query parses, and always to the same structure
    #[test]
    fn parsing_is_deterministic(text in arb_query()) {
        let first = Query::parse(&text);
        let second = Query::parse(&text);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.is_ok(), "{text}: {first:?}");
    }

    /// A parsed query printed back out parses to itself
    #[test]
    fn display_roundtrips(text in arb_query()) {
        if let Ok(query) = Query::parse(&text) {
            let reparsed = Query::parse(&query.to_string());
            prop_assert_eq!(reparsed, Ok(query));
        }
    }

    /// A bounded search is the prefix of the unbounded one
    #[test]
    fn search_respects_limit(tree in arb_tree(), limit in 0usize..5, name in prop::sample::select(NAMES.to_vec())) {
        let target = ElementSpec::element(name);
        let unbounded = search(&tree, &target, None, false);
        let bounded = search(&tree, &target, Some(limit), false);
        prop_assert!(bounded.len() <= limit);
        prop_assert_eq!(bounded.len(), unbounded.len().min(limit));
        prop_assert!(bounded.iter().zip(&unbounded).all(|(a, b)| std::ptr::eq(*a, *b)));
    }

    /// No result lies inside another result
    #[test]
    fn search_never_nests(tree in arb_tree(), name in prop::sample::select(NAMES.to_vec())) {
        let target = ElementSpec::element(name);
        let found = search(&tree, &target, None, false);
        for outer in &found {
            prop_assert!(found.iter().all(|inner| !is_descendant(outer, inner)));
        }
    }

    /// Integer/string operand pairs never compare
    #[test]
    fn mixed_types_are_inapplicable(n in any::<i64>(), s in ".*", op in prop::sample::select(Operator::ALL.to_vec())) {
        let int = Literal::Int(n);
        let string = Literal::Str(s);
        prop_assert_eq!(compare(&int, &string, op), Comparison::Inapplicable);
        prop_assert_eq!(compare(&string, &int, op), Comparison::Inapplicable);
    }
}
