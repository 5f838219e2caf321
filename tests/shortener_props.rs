use std::collections::HashSet;

use proptest::collection::hash_set;
use proptest::prelude::*;

use fulid::fulid::FULID_LEN;
use fulid::{contract, expand, resolve, shorten, ShortIdIndex};

/// Sets of distinct fulid-shaped ids: a fixed prefix plus an alphabet tail.
fn working_set() -> impl Strategy<Value = Vec<String>> {
    hash_set("[ASDFGHJWER]{7}", 1..40).prop_map(|tails| {
        tails
            .into_iter()
            .map(|tail| format!("01DWF3DM7EH40BTYB4S{tail}"))
            .collect()
    })
}

fn suffixes(ids: &[String], k: usize) -> HashSet<String> {
    ids.iter()
        .map(|id| id[id.len() - k..].to_lowercase())
        .collect()
}

proptest! {
    #[test]
    fn short_ids_are_distinct_and_minimal(ids in working_set()) {
        let index = ShortIdIndex::new(&ids);
        let k = index.suffix_len();
        prop_assert!(k >= 1);
        prop_assert_eq!(suffixes(&ids, k).len(), ids.len());
        if k > 1 {
            prop_assert!(suffixes(&ids, k - 1).len() < ids.len());
        }
    }

    #[test]
    fn every_short_id_resolves_back(ids in working_set()) {
        let map = shorten(&ids);
        prop_assert_eq!(map.len(), ids.len());
        for (id, short) in &map {
            prop_assert!(id.ends_with(&short.to_uppercase()));
            prop_assert_eq!(&resolve(short, &ids).unwrap(), id);
            prop_assert_eq!(&resolve(&short.to_uppercase(), &ids).unwrap(), id);
            prop_assert_eq!(&contract(id, &ids).unwrap(), short);
        }
    }

    #[test]
    fn shortening_ignores_input_order(ids in working_set()) {
        let mut reversed = ids.clone();
        reversed.reverse();
        prop_assert_eq!(shorten(&ids), shorten(&reversed));
    }

    #[test]
    fn full_ids_expand_to_themselves(ids in working_set()) {
        for id in &ids {
            prop_assert_eq!(id.len(), FULID_LEN);
            prop_assert_eq!(&expand(&id.to_lowercase(), &ids).unwrap(), id);
        }
    }
}
