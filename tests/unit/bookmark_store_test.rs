//! Unit tests for the ordered-sibling BookmarkStore.
//!
//! These tests exercise persistence, reordering, moves, deletes and edits
//! through the `BookmarkStoreTrait` interface, using an in-memory SQLite
//! database.

use rstest::rstest;
use treemarks::database::Database;
use treemarks::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use treemarks::types::bookmark::{BookmarkFields, BookmarkNode, FlatRecord};
use treemarks::types::errors::BookmarkError;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

/// Root: A{B, C}, D{}, E
fn sample_tree() -> Vec<BookmarkNode> {
    vec![
        BookmarkNode::folder("A", "Folder A").with_children(vec![
            BookmarkNode::link("B", "Bee", "https://b.example"),
            BookmarkNode::link("C", "Sea", "https://c.example"),
        ]),
        BookmarkNode::folder("D", "Folder D"),
        BookmarkNode::link("E", "Eee", "https://e.example"),
    ]
}

fn ids(records: &[FlatRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

fn orders(records: &[FlatRecord]) -> Vec<u32> {
    records.iter().map(|r| r.order).collect()
}

// ─── save / load ───

#[test]
fn test_save_then_load_returns_same_tree() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    let tree = sample_tree();

    store.save_all(&tree).unwrap();
    assert_eq!(store.load_all().unwrap(), tree);
    assert_eq!(store.count().unwrap(), 5);
}

#[test]
fn test_save_replaces_previous_contents() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    let replacement = vec![BookmarkNode::link("Z", "Zed", "https://z.example")];
    store.save_all(&replacement).unwrap();

    assert_eq!(store.load_all().unwrap(), replacement);
    assert!(store.get("A").unwrap().is_none());
}

#[test]
fn test_load_empty_store_returns_empty_tree() {
    let db = setup();
    let store = BookmarkStore::new(db.connection());
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn test_optional_fields_survive_roundtrip() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    let mut node = BookmarkNode::link("x", "With extras", "https://x.example");
    node.description = Some("notes".to_string());
    node.icon = Some("data:image/png;base64,AAAA".to_string());

    store.save_all(&[node.clone()]).unwrap();
    assert_eq!(store.load_all().unwrap(), vec![node]);
}

// ─── reorder ───

#[test]
fn test_reorder_at_root() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.reorder("E", 0, None).unwrap();

    let root = store.list_children(None).unwrap();
    assert_eq!(ids(&root), vec!["E", "A", "D"]);
    assert_eq!(orders(&root), vec![0, 1, 2]);
}

#[rstest]
#[case(0, vec!["C", "B"])]
#[case(1, vec!["B", "C"])]
#[case(7, vec!["B", "C"])]
fn test_reorder_inside_folder_clamps_index(#[case] index: usize, #[case] expected: Vec<&str>) {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.reorder("C", index, Some("A")).unwrap();

    let children = store.list_children(Some("A")).unwrap();
    assert_eq!(ids(&children), expected);
    assert_eq!(orders(&children), vec![0, 1]);
}

#[test]
fn test_reorder_to_same_position_is_noop() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.reorder("D", 1, None).unwrap();
    assert_eq!(store.load_all().unwrap(), sample_tree());
}

#[test]
fn test_reorder_with_wrong_parent_uses_stored_group() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    // "C" lives under A, not at root
    store.reorder("C", 0, None).unwrap();

    assert_eq!(ids(&store.list_children(Some("A")).unwrap()), vec!["C", "B"]);
    assert_eq!(ids(&store.list_children(None).unwrap()), vec!["A", "D", "E"]);
    assert_eq!(store.get("C").unwrap().unwrap().parent_id.as_deref(), Some("A"));
}

#[test]
fn test_reorder_missing_id_is_not_found() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    let err = store.reorder("nope", 0, None).unwrap_err();
    assert!(matches!(err, BookmarkError::NotFound(ref id) if id == "nope"));
    assert_eq!(store.load_all().unwrap(), sample_tree());
}

// ─── move ───

#[test]
fn test_move_between_folders_renumbers_both_groups() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.move_to_parent("B", Some("D"), None).unwrap();

    let a = store.list_children(Some("A")).unwrap();
    assert_eq!(ids(&a), vec!["C"]);
    assert_eq!(orders(&a), vec![0]);

    let d = store.list_children(Some("D")).unwrap();
    assert_eq!(ids(&d), vec!["B"]);
    assert_eq!(orders(&d), vec![0]);
}

#[test]
fn test_move_to_root_at_index() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.move_to_parent("C", None, Some(1)).unwrap();

    let root = store.list_children(None).unwrap();
    assert_eq!(ids(&root), vec!["A", "C", "D", "E"]);
    assert_eq!(orders(&root), vec![0, 1, 2, 3]);
    assert!(store.get("C").unwrap().unwrap().parent_id.is_none());
}

#[test]
fn test_move_index_past_end_appends() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.move_to_parent("E", Some("A"), Some(99)).unwrap();
    assert_eq!(ids(&store.list_children(Some("A")).unwrap()), vec!["B", "C", "E"]);
}

#[test]
fn test_move_into_missing_parent_fails_without_changes() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    let err = store.move_to_parent("B", Some("ghost"), None).unwrap_err();
    assert!(matches!(err, BookmarkError::ParentNotFound(_)));
    assert_eq!(store.load_all().unwrap(), sample_tree());
}

#[rstest]
#[case("A", "A")]
#[case("A", "B")]
fn test_move_into_own_subtree_is_rejected(#[case] id: &str, #[case] target: &str) {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    let err = store.move_to_parent(id, Some(target), None).unwrap_err();
    assert!(matches!(err, BookmarkError::InvalidMove(_)), "got {:?}", err);
    assert_eq!(store.load_all().unwrap(), sample_tree());
}

#[test]
fn test_move_missing_id_is_not_found() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    assert!(matches!(
        store.move_to_parent("ghost", None, None),
        Err(BookmarkError::NotFound(_))
    ));
}

// ─── delete ───

#[test]
fn test_delete_subtree_removes_descendants_and_closes_gap() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.delete_subtree("A").unwrap();

    for gone in ["A", "B", "C"] {
        assert!(store.get(gone).unwrap().is_none(), "{} should be deleted", gone);
    }
    let root = store.list_children(None).unwrap();
    assert_eq!(ids(&root), vec!["D", "E"]);
    assert_eq!(orders(&root), vec![0, 1]);
}

#[test]
fn test_delete_missing_id_is_noop() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.delete_subtree("ghost").unwrap();
    assert_eq!(store.count().unwrap(), 5);
}

#[test]
fn test_delete_all() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    store.delete_all().unwrap();
    assert_eq!(store.count().unwrap(), 0);
    assert!(store.load_all().unwrap().is_empty());
}

// ─── add / update ───

#[test]
fn test_add_bookmark_appends_to_group() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    let id = store
        .add_bookmark(Some("A"), &BookmarkFields::new("New").with_url("https://new.example"))
        .unwrap();

    let record = store.get(&id).unwrap().expect("added record");
    assert_eq!(record.parent_id.as_deref(), Some("A"));
    assert_eq!(record.order, 2);
    assert_eq!(record.url.as_deref(), Some("https://new.example"));
}

#[test]
fn test_add_to_empty_root_starts_at_zero() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    let first = store.add_bookmark(None, &BookmarkFields::new("Folder")).unwrap();
    let second = store.add_bookmark(None, &BookmarkFields::new("Other")).unwrap();

    assert_ne!(first, second);
    assert_eq!(store.get(&first).unwrap().unwrap().order, 0);
    assert_eq!(store.get(&second).unwrap().unwrap().order, 1);
}

#[test]
fn test_add_under_missing_parent_fails() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    let err = store.add_bookmark(Some("ghost"), &BookmarkFields::new("x")).unwrap_err();
    assert!(matches!(err, BookmarkError::ParentNotFound(_)));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_update_bookmark_keeps_position() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.save_all(&sample_tree()).unwrap();

    let mut fields = BookmarkFields::new("Renamed").with_url("https://renamed.example");
    fields.description = Some("edited".to_string());
    store.update_bookmark("C", &fields).unwrap();

    let record = store.get("C").unwrap().unwrap();
    assert_eq!(record.title, "Renamed");
    assert_eq!(record.description.as_deref(), Some("edited"));
    assert_eq!(record.parent_id.as_deref(), Some("A"));
    assert_eq!(record.order, 1);
}

#[test]
fn test_update_missing_bookmark_is_not_found() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    let err = store.update_bookmark("ghost", &BookmarkFields::new("x")).unwrap_err();
    assert_eq!(err.to_string(), "Bookmark not found: ghost");
}

// ─── atomicity ───

/// Root: F{X, Y}, P, Q. Any UPDATE touching X aborts.
fn setup_with_failing_row() -> Database {
    let db = setup();
    BookmarkStore::new(db.connection())
        .save_all(&[
            BookmarkNode::folder("F", "F").with_children(vec![
                BookmarkNode::link("X", "X", "https://x.example"),
                BookmarkNode::link("Y", "Y", "https://y.example"),
            ]),
            BookmarkNode::link("P", "P", "https://p.example"),
            BookmarkNode::link("Q", "Q", "https://q.example"),
        ])
        .unwrap();
    db.connection()
        .execute_batch(
            "CREATE TRIGGER fail_on_x BEFORE UPDATE ON bookmarks WHEN NEW.id = 'X' \
             BEGIN SELECT RAISE(ABORT, 'boom'); END;",
        )
        .unwrap();
    db
}

#[test]
fn test_failed_reorder_leaves_group_untouched() {
    let db = setup_with_failing_row();
    let mut store = BookmarkStore::new(db.connection());
    let before = store.load_records().unwrap();

    // Y is written first, then the X update aborts.
    assert!(store.reorder("Y", 0, Some("F")).is_err());

    assert_eq!(store.load_records().unwrap(), before);
}

#[test]
fn test_failed_move_leaves_both_groups_untouched() {
    let db = setup_with_failing_row();
    let mut store = BookmarkStore::new(db.connection());
    let before = store.load_records().unwrap();

    // P is reparented into F first, then renumbering X aborts.
    assert!(store.move_to_parent("P", Some("F"), Some(0)).is_err());

    assert_eq!(store.load_records().unwrap(), before);
    let p = store.get("P").unwrap().unwrap();
    assert!(p.parent_id.is_none());
    assert_eq!(p.order, 1);
}
