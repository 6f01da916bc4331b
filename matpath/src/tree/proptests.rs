//! Property-based tests for tree assembly.

use std::collections::HashMap;

use super::TreeAssembler;
use crate::path::{codec, RecordId};
use crate::{Hierarchical, PathChange, Record, SubtreeRewriter};
use proptest::prelude::*;
use serde_json::Value;

/// Generates a valid forest encoding.
///
/// Each entry picks an optional parent among the earlier entries; ids are a
/// shuffled range so that children may have smaller ids than their parents.
fn forest_strategy() -> impl Strategy<Value = Vec<Record>> {
    (1usize..40)
        .prop_flat_map(|n| {
            let parents = (0..n)
                .map(|i| {
                    if i == 0 {
                        Just(None).boxed()
                    } else {
                        prop::option::of(0..i).boxed()
                    }
                })
                .collect::<Vec<_>>();
            let ids = Just((1..=n as i64).collect::<Vec<_>>()).prop_shuffle();
            (parents, ids)
        })
        .prop_map(|(parents, ids)| {
            let mut paths: Vec<String> = Vec::with_capacity(parents.len());
            let mut records = Vec::with_capacity(parents.len());
            for (i, parent) in parents.iter().enumerate() {
                let path = match parent {
                    Some(p) => codec::child_path(&paths[*p], RecordId::try_from(ids[*p]).unwrap()),
                    None => String::new(),
                };
                records.push(Record::persisted(
                    RecordId::try_from(ids[i]).unwrap(),
                    path.clone(),
                    Value::Null,
                ));
                paths.push(path);
            }
            records
        })
        .prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    // Every record is consumed exactly once, in the pre-order of the parent
    // links with siblings in id order.
    #[test]
    fn assembly_is_complete(records in forest_strategy()) {
        let mut children: HashMap<String, Vec<&Record>> = HashMap::new();
        for record in &records {
            children.entry(record.path().to_string()).or_default().push(record);
        }
        for siblings in children.values_mut() {
            siblings.sort_by_key(|r| r.id());
        }
        let mut expected = Vec::with_capacity(records.len());
        let mut stack: Vec<&Record> = children.get("").into_iter().flatten().rev().copied().collect();
        while let Some(record) = stack.pop() {
            expected.push(record.id());
            let own = record.my_path().unwrap();
            stack.extend(children.get(&own).into_iter().flatten().rev().copied());
        }
        prop_assert_eq!(expected.len(), records.len());

        let tree = TreeAssembler::assemble(TreeAssembler::sort_records(records.clone()).unwrap()).unwrap();
        let actual: Vec<_> = tree.contents().into_iter().map(Hierarchical::id).collect();

        prop_assert_eq!(tree.len(), records.len() + 1);
        prop_assert_eq!(actual, expected);
    }

    // Every attached node sits under the record whose own path it stores.
    #[test]
    fn assembly_respects_paths(records in forest_strategy()) {
        let tree = TreeAssembler::assemble(TreeAssembler::sort_records(records).unwrap()).unwrap();

        for node in tree.pre_order().into_iter().skip(1) {
            let record = tree.content(node).unwrap();
            let parent = tree.parent(node).unwrap();
            match tree.content(parent) {
                Some(p) => prop_assert_eq!(record.path(), p.my_path().unwrap()),
                None => prop_assert!(record.is_top_level()),
            }
        }
    }

    // Dropping any non-leaf record makes assembly fail loudly.
    #[test]
    fn missing_parent_is_detected(records in forest_strategy(), pick in any::<prop::sample::Index>()) {
        let parents: Vec<String> = records
            .iter()
            .filter(|r| !r.is_top_level())
            .map(|r| r.path().to_string())
            .collect();
        prop_assume!(!parents.is_empty());

        let gone = pick.get(&parents).clone();
        let gone_id = codec::parse(&gone).unwrap().last().unwrap();
        let remaining: Vec<Record> = records
            .into_iter()
            .filter(|r| r.id() != Some(gone_id))
            .collect();

        let result = TreeAssembler::assemble(TreeAssembler::sort_records(remaining).unwrap());
        prop_assert!(result.unwrap_err().is_integrity());
    }

    // Moving a subtree rewrites exactly its descendants and keeps the set
    // assemblable.
    #[test]
    fn rewrite_touches_only_descendants(
        mut records in forest_strategy(),
        moved in any::<prop::sample::Index>(),
        target in any::<prop::sample::Index>(),
    ) {
        let moved = moved.index(records.len());
        let own = records[moved].my_path().unwrap();
        let outside: Vec<usize> = (0..records.len())
            .filter(|&i| !codec::is_within(records[i].path(), &own) && i != moved)
            .collect();
        let new_parent = if outside.is_empty() { None } else { Some(*target.get(&outside)) };
        let new_path = match new_parent {
            Some(i) => records[i].my_path().unwrap(),
            None => String::new(),
        };

        let record = records[moved].id().unwrap();
        let before: Vec<String> = records.iter().map(|r| r.path().to_string()).collect();
        let descendants = before.iter().filter(|p| codec::is_within(p, &own)).count();

        let Some(change) = PathChange::new(record, records[moved].path(), &new_path).unwrap() else {
            return Ok(());
        };
        let rewritten = SubtreeRewriter::rewrite_records(&change, &mut records);
        prop_assert_eq!(rewritten, descendants);

        for (i, r) in records.iter().enumerate() {
            if i != moved && !codec::is_within(&before[i], &own) {
                prop_assert_eq!(r.path(), before[i].as_str());
            }
        }
        let count = records.len();
        let tree = TreeAssembler::assemble(TreeAssembler::sort_records(records).unwrap()).unwrap();
        prop_assert_eq!(tree.len(), count + 1);
    }
}
