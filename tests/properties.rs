//! Property tests for the parser's structural invariants: ordering, literal
//! round-trips, annotation range checks, slash-dash and comment
//! transparency, and determinism.

use kdl_tree::{KdlDocument, KdlValue};
use proptest::prelude::*;

/// A literal that can stand as an argument or property value.
fn arb_value_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i64>().prop_map(|n| n.to_string()),
        any::<i32>().prop_map(|n| format!("{n}.5")),
        "[a-zA-Z0-9 @._-]{0,12}".prop_map(|s| format!("\"{s}\"")),
        Just("null".to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
    ]
}

fn arb_node_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,10}").unwrap()
}

proptest! {
    #[test]
    fn node_order_is_preserved(names in prop::collection::vec(arb_node_name(), 1..12)) {
        let src = names.join("\n");
        let doc: KdlDocument = src.parse().unwrap();
        let parsed: Vec<String> = doc.nodes().iter().map(|n| n.name().to_string()).collect();
        prop_assert_eq!(parsed, names);
    }

    #[test]
    fn arg_order_is_preserved(args in prop::collection::vec(any::<i64>(), 1..10)) {
        let src = format!(
            "node {}",
            args.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ")
        );
        let doc: KdlDocument = src.parse().unwrap();
        let parsed: Vec<i64> = doc.nodes()[0]
            .args()
            .iter()
            .map(|a| a.value().as_integer().unwrap())
            .collect();
        prop_assert_eq!(parsed, args);
    }

    #[test]
    fn integer_literals_roundtrip(n in any::<i64>()) {
        let doc: KdlDocument = format!("node {n}").parse().unwrap();
        prop_assert_eq!(doc.get_arg("node"), Some(&KdlValue::Integer(n)));
    }

    #[test]
    fn underscore_separators_are_stripped(n in 0i64..=i64::MAX, every in 1usize..4) {
        let digits = n.to_string();
        let mut literal = String::new();
        for (i, c) in digits.chars().enumerate() {
            literal.push(c);
            if (i + 1) % every == 0 && i + 1 < digits.len() {
                literal.push('_');
            }
        }
        let doc: KdlDocument = format!("node {literal}").parse().unwrap();
        prop_assert_eq!(doc.get_arg("node"), Some(&KdlValue::Integer(n)));
    }

    #[test]
    fn hex_literals_roundtrip(n in any::<u32>()) {
        let doc: KdlDocument = format!("node 0x{n:x}").parse().unwrap();
        prop_assert_eq!(doc.get_arg("node"), Some(&KdlValue::Integer(i64::from(n))));
    }

    #[test]
    fn binary_literals_roundtrip(n in any::<u16>()) {
        let doc: KdlDocument = format!("node 0b{n:b}").parse().unwrap();
        prop_assert_eq!(doc.get_arg("node"), Some(&KdlValue::Integer(i64::from(n))));
    }

    #[test]
    fn annotated_integers_fit_or_reject(
        n in any::<i64>(),
        ty in prop::sample::select(vec!["i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64"]),
    ) {
        let result = format!("node ({ty}){n}").parse::<KdlDocument>();
        let fits = match ty {
            "i8" => i8::try_from(n).is_ok(),
            "i16" => i16::try_from(n).is_ok(),
            "i32" => i32::try_from(n).is_ok(),
            "i64" => true,
            "u8" => u8::try_from(n).is_ok(),
            "u16" => u16::try_from(n).is_ok(),
            "u32" => u32::try_from(n).is_ok(),
            _ => n >= 0,
        };
        prop_assert_eq!(result.is_ok(), fits, "({}){}", ty, n);
        if let Ok(doc) = result {
            let expected = if ty.starts_with('u') {
                KdlValue::UnsignedInteger(n as u64)
            } else {
                KdlValue::Integer(n)
            };
            prop_assert_eq!(doc.get_arg("node"), Some(&expected));
        }
    }

    #[test]
    fn slashdash_arg_is_removed(literal in arb_value_literal(), keep in any::<i32>()) {
        let with: KdlDocument = format!("node /-{literal} {keep}").parse().unwrap();
        let without: KdlDocument = format!("node {keep}").parse().unwrap();
        prop_assert_eq!(with, without);
    }

    #[test]
    fn slashdash_node_is_removed(name in arb_node_name(), n in any::<i32>()) {
        let with: KdlDocument = format!("/-{name} {n}\nkeep 1").parse().unwrap();
        let without: KdlDocument = "keep 1".parse().unwrap();
        prop_assert_eq!(with, without);
    }

    #[test]
    fn slashdash_child_block_is_removed(name in arb_node_name()) {
        let with: KdlDocument = format!("node 1 /-{{\n  {name}\n}}").parse().unwrap();
        let without: KdlDocument = "node 1".parse().unwrap();
        prop_assert_eq!(with, without);
    }

    #[test]
    fn comments_are_transparent(n in any::<i32>(), m in any::<i32>()) {
        let plain: KdlDocument = format!("node {n} {m}").parse().unwrap();
        let multiline: KdlDocument = format!("node {n} /* ! */ {m}").parse().unwrap();
        let line: KdlDocument = format!("// header\nnode {n} {m}").parse().unwrap();
        prop_assert_eq!(&plain, &multiline);
        prop_assert_eq!(&plain, &line);
    }

    #[test]
    fn parsing_is_deterministic(src in "[ a-z0-9\\n{}\";=/.#()\\\\-]{0,48}") {
        let first = src.parse::<KdlDocument>();
        let second = src.parse::<KdlDocument>();
        prop_assert_eq!(&first, &second);
        if let (Err(a), Err(b)) = (&first, &second) {
            prop_assert_eq!(a.to_string(), b.to_string());
        }
    }

    #[test]
    fn rendered_documents_reparse(
        entries in prop::collection::vec(
            (arb_node_name(), prop::collection::vec(arb_value_literal(), 0..4)),
            0..6,
        ),
    ) {
        let src = entries
            .iter()
            .map(|(name, literals)| {
                let mut line = name.clone();
                for literal in literals {
                    line.push(' ');
                    line.push_str(literal);
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n");
        let doc: KdlDocument = src.parse().unwrap();
        let reparsed: KdlDocument = doc.to_string().parse().unwrap();
        prop_assert_eq!(doc, reparsed);
    }
}
