use parkproto_schema::{SchemaConfig, SchemaTable};
use proptest::prelude::*;

fn builtin_types() -> Vec<String> {
    SchemaTable::builtin()
        .entries()
        .map(|e| e.type_name.clone())
        .collect()
}

fn builtin_tags() -> Vec<String> {
    let mut tags: Vec<String> = SchemaTable::builtin()
        .entries()
        .flat_map(|e| e.children.iter().cloned())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

fn any_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(builtin_tags()),
        proptest::string::string_regex("[a-z][A-Za-z]{0,10}").unwrap(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn find_parent_ignores_call_order(tags in proptest::collection::vec(any_tag(), 1..20)) {
        // A fresh table sees the tags in reverse order; answers must agree.
        let fresh = SchemaTable::from_config(SchemaConfig::builtin()).unwrap();
        let forward: Vec<Option<String>> = tags
            .iter()
            .map(|t| SchemaTable::builtin().find_parent(t).map(str::to_string))
            .collect();
        let mut backward: Vec<Option<String>> = tags
            .iter()
            .rev()
            .map(|t| fresh.find_parent(t).map(str::to_string))
            .collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn path_from_top_has_matching_endpoints(to in proptest::sample::select(builtin_types())) {
        let table = SchemaTable::builtin();
        let path = table.path(None, &to).unwrap();
        prop_assert_eq!(path.last(), Some(&to));
        let top = path[0].clone();
        prop_assert_eq!(table.find_parent(&top), None);

        // Every intermediate start on the path yields the matching suffix.
        for (i, from) in path.iter().enumerate() {
            let sub = table.path(Some(from), &to).unwrap();
            prop_assert_eq!(&sub[..], &path[i..]);
        }
    }

    #[test]
    fn path_to_self_is_singleton(t in proptest::sample::select(builtin_types())) {
        let path = SchemaTable::builtin().path(Some(&t), &t).unwrap();
        prop_assert_eq!(path, vec![t]);
    }
}
