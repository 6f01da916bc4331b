//! Property-based tests for index paths and the path codec.

use super::codec;
use super::index::{IndexPath, RecordId};
use proptest::prelude::*;
use std::cmp::Ordering;

fn id_strategy() -> impl Strategy<Value = i64> {
    // Small ids collide often, which exercises shared prefixes.
    prop_oneof![1i64..=12, 1i64..=i64::MAX]
}

fn index_path_strategy() -> impl Strategy<Value = IndexPath> {
    prop::collection::vec(id_strategy(), 0..8).prop_map(|ids| IndexPath::new(ids).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // compare(a, b) == -compare(b, a)
    #[test]
    fn ordering_antisymmetric(a in index_path_strategy(), b in index_path_strategy()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    // A strict prefix always sorts first.
    #[test]
    fn strict_prefix_sorts_first(a in index_path_strategy(), tail in prop::collection::vec(id_strategy(), 1..4)) {
        let mut ids: Vec<RecordId> = a.iter().collect();
        ids.extend(tail.into_iter().map(|v| RecordId::try_from(v).unwrap()));
        let extended = IndexPath::from_ids(ids);
        prop_assert_eq!(a.cmp(&extended), Ordering::Less);
    }

    // Ordering is transitive.
    #[test]
    fn ordering_transitive(a in index_path_strategy(), b in index_path_strategy(), c in index_path_strategy()) {
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }

    // format(parse(s)) == s for well-formed strings
    #[test]
    fn format_parse_roundtrip(path in index_path_strategy()) {
        let text = codec::format(&path);
        let parsed = codec::parse(&text).unwrap();
        prop_assert_eq!(codec::format(&parsed), text);
        prop_assert_eq!(parsed, path);
    }

    // Depth agrees with the parsed length.
    #[test]
    fn depth_matches_len(path in index_path_strategy()) {
        prop_assert_eq!(codec::depth(&path.to_string()), path.len());
    }

    // A child path is always within its parent's child path and one deeper.
    #[test]
    fn child_path_nests(parent in index_path_strategy(), child in id_strategy(), grandchild in id_strategy()) {
        let parent_text = parent.to_string();
        let child_id = RecordId::try_from(child).unwrap();
        let own = codec::child_path(&parent_text, child_id);
        let nested = codec::child_path(&own, RecordId::try_from(grandchild).unwrap());

        prop_assert!(codec::is_within(&nested, &own));
        prop_assert_eq!(codec::depth(&own), parent.len() + 1);
        prop_assert_eq!(codec::parse(&own).unwrap().last(), Some(child_id));
    }

    // Arbitrary text never panics the parser, and accepted text round-trips.
    #[test]
    fn parse_total(text in "[0-9.a-z+-]{0,16}") {
        if let Ok(path) = codec::parse(&text) {
            prop_assert_eq!(path.to_string(), text);
        }
    }
}
