//! Query Compilation Tests
//!
//! Tests for the declarative-to-wire path:
//! - Filter objects compile to ordered AND/OR/NOT leaves
//! - Sort shorthand normalizes to ordered entries
//! - Pagination bounds are enforced before a body is built
//! - Composition is pure and order-preserving

use recordql::query::operators::{all, any, contains, exists, ge, gt, is, lt, none, not_exists};
use recordql::query::{
    compile, FilterValue, Leaf, Navigation, Pagination, Query, SortDirection, SortEntry,
    ValidationError, WireOperator,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn compile_json(filter: Value) -> Value {
    serde_json::to_value(compile(&FilterValue::from(filter))).unwrap()
}

fn leaf(field: &str, operator: &str, value: Value) -> Value {
    json!({"field": field, "operator": operator, "value": value})
}

// =============================================================================
// Filter Compilation Tests
// =============================================================================

/// Literal and `$is` forms produce the same single AND leaf.
#[test]
fn test_literal_and_is_are_equivalent() {
    let expected = json!({"AND": [leaf("plan", "=", json!("free"))], "OR": [], "NOT": []});

    assert_eq!(compile_json(json!({"plan": "free"})), expected);
    assert_eq!(compile_json(json!({"plan": {"$is": "free"}})), expected);
}

/// `$any` over a list yields one OR leaf per element.
#[test]
fn test_any_list_becomes_or_leaves() {
    let compiled = compile_json(json!({"name": {"$any": ["a", "b", "c"]}}));

    assert_eq!(
        compiled["OR"],
        json!([leaf("name", "=", json!("a")), leaf("name", "=", json!("b")), leaf("name", "=", json!("c"))])
    );
    assert_eq!(compiled["AND"], json!([]));
    assert_eq!(compiled["NOT"], json!([]));
}

/// `$none` over a list yields one NOT leaf per element.
#[test]
fn test_none_list_becomes_not_leaves() {
    let compiled = compile_json(json!({"name": {"$none": ["a", "b", "c"]}}));

    assert_eq!(compiled["NOT"].as_array().unwrap().len(), 3);
    assert_eq!(compiled["AND"], json!([]));
    assert_eq!(compiled["OR"], json!([]));
}

/// Existence checks name the column in both field and value.
#[test]
fn test_existence_leaves() {
    assert_eq!(
        compile_json(json!({"$exists": "email"}))["AND"],
        json!([leaf("email", "exists", json!("email"))])
    );
    assert_eq!(
        compile_json(json!({"$notExists": "email"}))["AND"],
        json!([leaf("email", "not exists", json!("email"))])
    );
}

/// Operators on one column keep input order; `$ge` maps to "=".
#[test]
fn test_operator_order_and_ge_mapping() {
    let compiled = compile(&FilterValue::from(json!({"age": {"$lt": 30, "$ge": 20}})));

    assert_eq!(
        compiled.and,
        vec![
            Leaf::new("age", WireOperator::Less, json!(30)),
            Leaf::new("age", WireOperator::Equal, json!(20)),
        ]
    );
}

/// Repeated compilation gives structurally identical trees.
#[test]
fn test_compile_is_deterministic() {
    let filter = FilterValue::from(json!({
        "$any": [{"plan": "free"}, {"plan": {"$contains": "pro"}}],
        "age": {"$gt": 18},
        "$not": {"banned": true}
    }));

    let first = compile(&filter);
    for _ in 0..10 {
        assert_eq!(compile(&filter), first);
    }
}

/// Operator helpers build the same values as the JSON grammar.
#[test]
fn test_operator_helpers_match_json_grammar() {
    let built = Query::new()
        .filter("age", gt(18))
        .filter("name", contains("ann"))
        .filter("plan", is("free"))
        .compile_filter();
    let parsed = compile(&FilterValue::from(json!({
        "$all": [
            {"age": {"$gt": 18}},
            {"name": {"$contains": "ann"}},
            {"plan": {"$is": "free"}}
        ]
    })));

    assert_eq!(built, parsed);
}

/// Nested objects address nested columns even when they carry an `id`.
#[test]
fn test_nested_object_with_id_is_not_collapsed() {
    let compiled = Query::new()
        .filter("settings", json!({"id": "x", "plan": "pro"}))
        .compile_filter();

    assert_eq!(
        serde_json::to_value(&compiled).unwrap()["AND"],
        json!([leaf("settings.id", "=", json!("x")), leaf("settings.plan", "=", json!("pro"))])
    );
}

/// Group helpers route their members to the matching branch.
#[test]
fn test_group_helpers() {
    let compiled = compile(&FilterValue::field("plan", any(["free", "trial"])));
    assert_eq!(compiled.or.len(), 2);

    let compiled = compile(&FilterValue::field("plan", none(["banned"])));
    assert_eq!(compiled.not.len(), 1);

    let compiled = compile(&all([exists("email"), not_exists("phone")]));
    assert_eq!(compiled.and[0].operator, WireOperator::Exists);
    assert_eq!(compiled.and[1].operator, WireOperator::NotExists);
}

// =============================================================================
// Sort Tests
// =============================================================================

/// Bare column sorts ascending.
#[test]
fn test_sort_string_shorthand() {
    let query = Query::new().sort_by(&json!("name")).unwrap();
    assert_eq!(query.sort_entries(), [SortEntry::asc("name")]);
}

/// A list of single-key maps preserves order.
#[test]
fn test_sort_list_preserves_order() {
    let query = Query::new()
        .sort_by(&json!([{"name": "asc"}, {"age": "desc"}]))
        .unwrap();
    assert_eq!(
        query.sort_entries(),
        [SortEntry::asc("name"), SortEntry::desc("age")]
    );
}

/// Random direction only applies to the wildcard column.
#[test]
fn test_random_sort_requires_wildcard() {
    let query = Query::new().sort("name", SortDirection::Random);
    assert!(matches!(
        query.compile_body(),
        Err(ValidationError::InvalidSort(_))
    ));

    let query = Query::new().sort("*", SortDirection::Random);
    assert!(query.compile_body().is_ok());
}

// =============================================================================
// Pagination Tests
// =============================================================================

/// Size and offset limits are enforced with readable messages.
#[test]
fn test_pagination_bounds() {
    let err = Query::new()
        .paginate(Pagination::size(201))
        .compile_body()
        .unwrap_err();
    assert!(err.to_string().contains("exceeds max limit of 200"));

    let err = Query::new()
        .paginate(Pagination::offset(None, Some(801)))
        .compile_body()
        .unwrap_err();
    assert!(err.to_string().contains("must not exceed 800"));

    assert!(Query::new()
        .paginate(Pagination::offset(Some(200), Some(800)))
        .compile_body()
        .is_ok());
}

/// A cursor query that gains a filter is refused.
#[test]
fn test_cursor_with_filter_is_refused() {
    let cursor = Query::new().paginate(Pagination::navigate(Navigation::Next, "c1", None, None));
    assert!(cursor.compile_body().unwrap().is_cursor_request());

    let filtered = cursor.filter("plan", "free");
    assert_eq!(
        filtered.compile_body().unwrap_err(),
        ValidationError::CursorWithFilterOrSort
    );
}

/// Switching to a cursor clears inherited filter and sort.
#[test]
fn test_paginate_to_cursor_strips_constraints() {
    let query = Query::new()
        .filter("plan", "free")
        .sort("name", SortDirection::Asc)
        .paginate(Pagination::navigate(Navigation::Next, "c1", Some(10), None));

    assert_eq!(
        serde_json::to_value(query.compile_body().unwrap()).unwrap(),
        json!({"page": {"after": "c1", "size": 10}})
    );
}

// =============================================================================
// End-to-End Body Tests
// =============================================================================

/// The canonical chain compiles to the canonical body.
#[test]
fn test_filter_sort_select_body() {
    let body = Query::new()
        .filter("plan", "free")
        .sort("name", SortDirection::Asc)
        .select(["name"])
        .compile_body()
        .unwrap();

    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "filter": {"AND": [leaf("plan", "=", json!("free"))], "OR": [], "NOT": []},
            "sort": [{"column": "name", "direction": "asc"}],
            "columns": ["name"]
        })
    );
}

/// Sub-queries combine into the group branches.
#[test]
fn test_composed_sub_queries() {
    let adults = Query::new().filter("age", ge(18));
    let young = Query::new().filter("age", lt(30));
    let free = Query::new().filter("plan", "free");

    let body = Query::new()
        .any([&adults, &young])
        .not([&free])
        .compile_body()
        .unwrap();

    let filter = body.filter.unwrap();
    assert_eq!(filter.or.len(), 2);
    assert_eq!(filter.not, vec![Leaf::new("plan", WireOperator::Equal, json!("free"))]);
    assert!(filter.and.is_empty());
}

/// An empty query compiles to an empty body.
#[test]
fn test_empty_query_body() {
    let body = Query::new().compile_body().unwrap();
    assert_eq!(serde_json::to_value(body).unwrap(), json!({}));
}
