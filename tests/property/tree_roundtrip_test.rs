//! Property-based tests for the tree codec and full-tree persistence.
//!
//! For any forest with unique ids, flattening then reconstructing (in memory
//! or through the SQLite store) yields the original forest.

use proptest::prelude::*;
use treemarks::database::Database;
use treemarks::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use treemarks::services::tree_codec::{flatten, reconstruct};
use treemarks::types::bookmark::BookmarkNode;

/// Strategy for bookmark forests up to depth 4. Ids are assigned afterwards
/// so they are unique.
fn arb_forest() -> impl Strategy<Value = Vec<BookmarkNode>> {
    let leaf = ("[a-zA-Z][a-zA-Z0-9 ]{0,12}", proptest::option::of("https://[a-z]{3,8}\\.example"))
        .prop_map(|(title, url)| BookmarkNode {
            url,
            ..BookmarkNode::folder("", &title)
        });
    let node = leaf.prop_recursive(4, 40, 5, |inner| {
        ("[a-zA-Z][a-zA-Z0-9 ]{0,12}", prop::collection::vec(inner, 0..5))
            .prop_map(|(title, children)| BookmarkNode::folder("", &title).with_children(children))
    });
    prop::collection::vec(node, 0..6).prop_map(|mut forest| {
        let mut next = 0;
        assign_ids(&mut forest, &mut next);
        forest
    })
}

fn assign_ids(nodes: &mut [BookmarkNode], next: &mut usize) {
    for node in nodes {
        node.id = format!("n{}", next);
        *next += 1;
        assign_ids(&mut node.children, next);
    }
}

fn count(nodes: &[BookmarkNode]) -> usize {
    nodes.iter().map(|n| 1 + count(&n.children)).sum()
}

// **Property: codec round trip**
//
// reconstruct(flatten(T)) == T, and flatten emits one record per node.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn flatten_then_reconstruct_is_identity(forest in arb_forest()) {
        let records = flatten(&forest, None);
        prop_assert_eq!(records.len(), count(&forest));
        prop_assert_eq!(reconstruct(&records), forest);
    }

    #[test]
    fn reconstruct_ignores_record_order(forest in arb_forest()) {
        let mut records = flatten(&forest, None);
        records.reverse();
        prop_assert_eq!(reconstruct(&records), forest);
    }
}

// **Property: store round trip**
//
// saveAll(T) then loadAll() == T.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn save_then_load_is_identity(forest in arb_forest()) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let mut store = BookmarkStore::new(db.connection());

        store.save_all(&forest).expect("save_all should succeed");
        let loaded = store.load_all().expect("load_all should succeed");

        prop_assert_eq!(&loaded, &forest);
        prop_assert_eq!(store.count().unwrap(), count(&forest));
    }
}
