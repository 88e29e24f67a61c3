//! # Filter Compiler
//!
//! Compiles a [`FilterValue`] into the normalized AND/OR/NOT expression sent
//! over the wire.
//!
//! The walk is depth-first over keys in insertion order. A group key
//! replaces the active branch for everything beneath it; nested groups do
//! not build sub-trees, their leaves land in the nearest active branch.
//! Compilation never fails: shapes that make no sense degrade to equality
//! leaves.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filter::{FilterKey, FilterValue, Group, Operator};

/// Branch of the normalized expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    And,
    Or,
    Not,
}

impl From<Group> for Branch {
    fn from(group: Group) -> Self {
        match group {
            Group::All => Branch::And,
            Group::Any => Branch::Or,
            Group::Not | Group::None => Branch::Not,
        }
    }
}

/// Operators as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "not exists")]
    NotExists,
}

impl WireOperator {
    /// Get the wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            WireOperator::Equal => "=",
            WireOperator::NotEqual => "!=",
            WireOperator::Greater => ">",
            WireOperator::GreaterOrEqual => ">=",
            WireOperator::Less => "<",
            WireOperator::LessOrEqual => "<=",
            WireOperator::Like => "like",
            WireOperator::In => "in",
            WireOperator::Exists => "exists",
            WireOperator::NotExists => "not exists",
        }
    }
}

impl From<&Operator> for WireOperator {
    fn from(op: &Operator) -> Self {
        match op {
            Operator::Is | Operator::Eq => WireOperator::Equal,
            Operator::Gt => WireOperator::Greater,
            Operator::Lt => WireOperator::Less,
            // `$ge` maps to equality on the wire; servers rely on it.
            Operator::Ge => WireOperator::Equal,
            Operator::Gte => WireOperator::GreaterOrEqual,
            Operator::Le | Operator::Lte => WireOperator::LessOrEqual,
            Operator::Ne => WireOperator::NotEqual,
            Operator::Contains => WireOperator::Like,
            Operator::Includes => WireOperator::In,
            Operator::Exists => WireOperator::Exists,
            Operator::NotExists => WireOperator::NotExists,
            Operator::Unknown(_) => WireOperator::Equal,
        }
    }
}

/// A single compiled predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Column the predicate applies to
    pub field: String,

    /// Comparison operator
    pub operator: WireOperator,

    /// Value to compare against
    pub value: Value,
}

impl Leaf {
    /// Create a new leaf
    pub fn new(field: impl Into<String>, operator: WireOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// Compiled filter: three ordered branches of leaves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedExpression {
    #[serde(rename = "AND")]
    pub and: Vec<Leaf>,

    #[serde(rename = "OR")]
    pub or: Vec<Leaf>,

    #[serde(rename = "NOT")]
    pub not: Vec<Leaf>,
}

impl NormalizedExpression {
    /// Leaves of one branch
    pub fn branch(&self, branch: Branch) -> &[Leaf] {
        match branch {
            Branch::And => &self.and,
            Branch::Or => &self.or,
            Branch::Not => &self.not,
        }
    }

    /// Total number of leaves
    pub fn len(&self) -> usize {
        self.and.len() + self.or.len() + self.not.len()
    }

    /// Returns true when no branch has leaves ("match all")
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, branch: Branch, leaf: Leaf) {
        match branch {
            Branch::And => self.and.push(leaf),
            Branch::Or => self.or.push(leaf),
            Branch::Not => self.not.push(leaf),
        }
    }
}

/// Walk context, passed by value down the recursion
#[derive(Debug, Clone)]
struct Context {
    branch: Branch,
    field: Option<String>,
}

impl Context {
    fn root() -> Self {
        Self {
            branch: Branch::And,
            field: None,
        }
    }

    fn with_branch(&self, branch: Branch) -> Self {
        Self {
            branch,
            field: self.field.clone(),
        }
    }

    /// Nested plain objects address nested columns (`settings.plan`).
    fn with_field(&self, name: &str) -> Self {
        let field = match &self.field {
            Some(parent) => format!("{}.{}", parent, name),
            None => name.to_string(),
        };
        Self {
            branch: self.branch,
            field: Some(field),
        }
    }
}

/// Compile a filter value into its normalized expression
pub fn compile(filter: &FilterValue) -> NormalizedExpression {
    let mut out = NormalizedExpression::default();
    walk(filter, Context::root(), &mut out);
    out
}

fn walk(value: &FilterValue, ctx: Context, out: &mut NormalizedExpression) {
    match value {
        FilterValue::Literal(literal) => {
            let field = ctx.field.unwrap_or_default();
            out.push(ctx.branch, Leaf::new(field, WireOperator::Equal, literal.clone()));
        }
        FilterValue::List(items) => {
            for item in items {
                walk(item, ctx.clone(), out);
            }
        }
        FilterValue::Object(entries) => {
            for (key, nested) in entries {
                match key {
                    FilterKey::Group(group) => {
                        walk(nested, ctx.with_branch(Branch::from(*group)), out);
                    }
                    FilterKey::Field(name) => walk(nested, ctx.with_field(name), out),
                    FilterKey::Operator(op @ (Operator::Exists | Operator::NotExists)) => {
                        existence(op, nested, &ctx, out);
                    }
                    FilterKey::Operator(op) => operator(op, nested, ctx.clone(), out),
                }
            }
        }
    }
}

fn operator(op: &Operator, value: &FilterValue, ctx: Context, out: &mut NormalizedExpression) {
    let field = ctx
        .field
        .clone()
        .unwrap_or_else(|| op.as_str().to_string());

    match value {
        FilterValue::Literal(literal) => {
            out.push(ctx.branch, Leaf::new(field, WireOperator::from(op), literal.clone()));
        }
        FilterValue::List(items) => {
            for item in items {
                operator(op, item, ctx.clone(), out);
            }
        }
        FilterValue::Object(_) => {
            let ctx = Context {
                branch: ctx.branch,
                field: Some(field),
            };
            walk(value, ctx, out);
        }
    }
}

fn existence(op: &Operator, value: &FilterValue, ctx: &Context, out: &mut NormalizedExpression) {
    let wire = WireOperator::from(op);
    let column = match value {
        FilterValue::Literal(Value::String(column)) => column.clone(),
        FilterValue::List(items) => {
            for item in items {
                existence(op, item, ctx, out);
            }
            return;
        }
        other => ctx
            .field
            .clone()
            .unwrap_or_else(|| other.to_json().to_string()),
    };
    out.push(
        ctx.branch,
        Leaf::new(column.clone(), wire, Value::String(column)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile_json(value: Value) -> NormalizedExpression {
        compile(&FilterValue::from(value))
    }

    fn leaf(field: &str, operator: WireOperator, value: Value) -> Leaf {
        Leaf::new(field, operator, value)
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let expr = compile(&FilterValue::empty());
        assert!(expr.is_empty());
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({"AND": [], "OR": [], "NOT": []})
        );
    }

    #[test]
    fn test_shorthand_and_is_are_equivalent() {
        let shorthand = compile_json(json!({"name": "Alice"}));
        let explicit = compile_json(json!({"name": {"$is": "Alice"}}));

        assert_eq!(shorthand, explicit);
        assert_eq!(shorthand.and, vec![leaf("name", WireOperator::Equal, json!("Alice"))]);
        assert!(shorthand.or.is_empty());
        assert!(shorthand.not.is_empty());
    }

    #[test]
    fn test_any_on_field_produces_or_leaves() {
        let expr = compile_json(json!({"status": {"$any": ["a", "b", "c"]}}));

        assert!(expr.and.is_empty());
        assert!(expr.not.is_empty());
        assert_eq!(
            expr.or,
            vec![
                leaf("status", WireOperator::Equal, json!("a")),
                leaf("status", WireOperator::Equal, json!("b")),
                leaf("status", WireOperator::Equal, json!("c")),
            ]
        );
    }

    #[test]
    fn test_none_on_field_produces_not_leaves() {
        let expr = compile_json(json!({"status": {"$none": ["a", "b", "c"]}}));

        assert!(expr.and.is_empty());
        assert!(expr.or.is_empty());
        assert_eq!(expr.not.len(), 3);
        assert!(expr.not.iter().all(|l| l.field == "status"));
    }

    #[test]
    fn test_exists_and_not_exists() {
        let expr = compile_json(json!({"$exists": "email"}));
        assert_eq!(expr.and, vec![leaf("email", WireOperator::Exists, json!("email"))]);

        let expr = compile_json(json!({"$notExists": "email"}));
        assert_eq!(
            expr.and,
            vec![leaf("email", WireOperator::NotExists, json!("email"))]
        );
    }

    #[test]
    fn test_range_on_one_field_keeps_input_order() {
        let expr = compile_json(json!({"age": {"$lt": 30, "$ge": 20}}));

        assert_eq!(
            expr.and,
            vec![
                leaf("age", WireOperator::Less, json!(30)),
                leaf("age", WireOperator::Equal, json!(20)),
            ]
        );
    }

    #[test]
    fn test_operator_table() {
        let expr = compile_json(json!({"f": {
            "$eq": 1, "$gt": 2, "$gte": 3, "$le": 4, "$lte": 5,
            "$ne": 6, "$contains": "x%", "$includes": "tag", "$pattern": "p"
        }}));

        let ops: Vec<&str> = expr.and.iter().map(|l| l.operator.as_str()).collect();
        assert_eq!(ops, vec!["=", ">", ">=", "<=", "<=", "!=", "like", "in", "="]);
    }

    #[test]
    fn test_nested_group_overrides_outer_branch() {
        let expr = compile_json(json!({"$not": {"$any": [{"a": 1}, {"b": 2}]}}));

        assert!(expr.not.is_empty());
        assert_eq!(
            expr.or,
            vec![
                leaf("a", WireOperator::Equal, json!(1)),
                leaf("b", WireOperator::Equal, json!(2)),
            ]
        );
    }

    #[test]
    fn test_sibling_groups_fill_their_own_branches() {
        let expr = compile_json(json!({
            "$all": [{"plan": "free"}],
            "$any": [{"country": "DE"}, {"country": "FR"}],
            "$none": {"banned": true}
        }));

        assert_eq!(expr.and.len(), 1);
        assert_eq!(expr.or.len(), 2);
        assert_eq!(expr.not, vec![leaf("banned", WireOperator::Equal, json!(true))]);
    }

    #[test]
    fn test_nested_columns_join_with_dot() {
        let expr = compile_json(json!({"settings": {"plan": {"$is": "pro"}}}));
        assert_eq!(expr.and, vec![leaf("settings.plan", WireOperator::Equal, json!("pro"))]);
    }

    #[test]
    fn test_operator_list_is_walked_element_wise() {
        let expr = compile_json(json!({"tags": {"$includes": ["a", "b"]}}));
        assert_eq!(
            expr.and,
            vec![
                leaf("tags", WireOperator::In, json!("a")),
                leaf("tags", WireOperator::In, json!("b")),
            ]
        );
    }

    #[test]
    fn test_malformed_shapes_degrade_best_effort() {
        let expr = compile_json(json!({"$gt": 5}));
        assert_eq!(expr.and, vec![leaf("$gt", WireOperator::Greater, json!(5))]);

        let expr = compile_json(json!(["loose"]));
        assert_eq!(expr.and, vec![leaf("", WireOperator::Equal, json!("loose"))]);

        let expr = compile_json(json!({"email": {"$exists": true}}));
        assert_eq!(expr.and, vec![leaf("email", WireOperator::Exists, json!("email"))]);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let input = json!({
            "$any": [{"a": {"$gt": 1, "$lt": 9}}, {"$exists": "b"}],
            "c": {"$none": [1, 2]}
        });
        let first = compile_json(input.clone());
        for _ in 0..10 {
            assert_eq!(compile_json(input.clone()), first);
        }
    }
}
