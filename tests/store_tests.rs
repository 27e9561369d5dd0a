//! Integration tests for list operations through a session.

mod common;

use common::TestEnv;
use masterlist::{Category, ListError};

// =============================================================================
// Categories
// =============================================================================

#[test]
fn test_add_item_scenario() {
    let mut env = TestEnv::with_document(r#"[["Fruits","Apple","Banana"]]"#);

    env.session.add_item("Fruits", "Cherry").unwrap();
    assert_eq!(
        env.categories(),
        vec![Category::with_items("Fruits", ["Apple", "Banana", "Cherry"])]
    );
}

#[test]
fn test_add_category_duplicate_rejected() {
    let mut env = TestEnv::new();
    env.session.add_category("Tools").unwrap();

    let err = env.session.add_category("  Tools  ").unwrap_err();
    assert_eq!(err, ListError::Duplicate("Tools".to_string()));
    assert_eq!(err.to_string(), "Category already exists: Tools");
    assert_eq!(env.categories().len(), 1);
}

#[test]
fn test_add_category_blank_rejected() {
    let mut env = TestEnv::new();
    assert!(matches!(env.session.add_category(" \t "), Err(ListError::EmptyText(_))));
    assert!(env.categories().is_empty());
}

#[test]
fn test_names_unique_after_mixed_operations() {
    let mut env = TestEnv::new();

    let ops: &[(&str, &str)] = &[
        ("add", "A"),
        ("add", "B"),
        ("add", "A"),
        ("delete", "A"),
        ("add", " A "),
        ("add", "B "),
        ("delete", "C"),
        ("add", "C"),
    ];

    for (op, name) in ops {
        let _ = match *op {
            "add" => env.session.add_category(name),
            _ => env.session.delete_category(name),
        };
        env.assert_unique_names();
    }

    assert_eq!(env.session.store().names(), vec!["B", "A", "C"]);
}

#[test]
fn test_delete_category_not_found_is_noop() {
    let mut env = TestEnv::with_document(r#"[["Fruits"]]"#);
    let outcome = env.session.delete_category("Veg").unwrap();
    assert_eq!(outcome.count, Some(0));
    assert_eq!(env.categories(), vec![Category::new("Fruits")]);
}

#[test]
fn test_delete_category_reports_message() {
    let mut env = TestEnv::with_document(r#"[["Fruits"],["Veg"]]"#);
    let outcome = env.session.delete_category("Fruits").unwrap();
    assert_eq!(outcome.message, "Deleted: Fruits");
    assert_eq!(outcome.count, Some(1));
    assert_eq!(env.session.store().find_category("Veg"), Some(0));
}

// =============================================================================
// Items
// =============================================================================

#[test]
fn test_add_item_trims_and_allows_repeats() {
    let mut env = TestEnv::with_document(r#"[["L"]]"#);
    env.session.add_item("L", " milk ").unwrap();
    env.session.add_item(" L ", "milk").unwrap();
    assert_eq!(env.items("L"), vec!["milk", "milk"]);
}

#[test]
fn test_remove_item_counts_and_preserves_order() {
    let mut env = TestEnv::with_document(r#"[["L","a","b","a","c","a"]]"#);

    let outcome = env.session.remove_item("L", " a").unwrap();
    assert_eq!(outcome.count, Some(3));
    assert_eq!(outcome.message, "Removed 3 time(s): a");
    assert_eq!(env.items("L"), vec!["b", "c"]);
}

#[test]
fn test_remove_missing_item_distinct_from_missing_category() {
    let mut env = TestEnv::with_document(r#"[["L","a"]]"#);

    let outcome = env.session.remove_item("L", "zzz").unwrap();
    assert_eq!(outcome.count, Some(0));
    assert_eq!(env.items("L"), vec!["a"]);

    let err = env.session.remove_item("Nope", "a").unwrap_err();
    assert_eq!(err, ListError::CategoryNotFound("Nope".to_string()));
}

#[test]
fn test_edit_item_only_first_duplicate() {
    let mut env = TestEnv::with_document(r#"[["L","x","y","x"]]"#);

    let outcome = env.session.edit_item("L", "x", "  z ").unwrap();
    assert_eq!(outcome.message, "Updated 'x' to 'z'.");
    assert_eq!(env.items("L"), vec!["z", "y", "x"]);
}

#[test]
fn test_edit_item_failures_leave_store() {
    let mut env = TestEnv::with_document(r#"[["L","x"]]"#);
    let before = env.categories();

    assert!(matches!(env.session.edit_item("L", "q", "z"), Err(ListError::ItemNotFound { .. })));
    assert!(matches!(env.session.edit_item("M", "x", "z"), Err(ListError::CategoryNotFound(_))));
    assert!(matches!(env.session.edit_item("L", "x", "   "), Err(ListError::EmptyText(_))));
    assert_eq!(env.categories(), before);
}

#[test]
fn test_clear_items_keeps_category() {
    let mut env = TestEnv::with_document(r#"[["L","x","y"],["M","z"]]"#);

    let outcome = env.session.clear_items("L").unwrap();
    assert_eq!(outcome.count, Some(2));
    assert_eq!(outcome.message, "All items deleted for: L");
    assert_eq!(
        env.categories(),
        vec![Category::new("L"), Category::with_items("M", ["z"])]
    );
}

#[test]
fn test_unicode_items() {
    let mut env = TestEnv::with_document(r#"[["Épicerie"]]"#);
    env.session.add_item("Épicerie", "café ☕").unwrap();
    assert_eq!(env.items("Épicerie"), vec!["café ☕"]);
}
