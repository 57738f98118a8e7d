//! Query composition: a fluent builder over [`Criterion`]s, evaluated against a [`Descriptor`].
//!
//! A [`Query`] in normal form is a disjunction of conjunctions: `(c1 ∧ c2 ∧ …) ∨ branch1 ∨ branch2
//! ∨ …`. The builder accumulates criteria for the "current" conjunction via
//! [`Query::field`]/[`FieldQuery`]; [`Query::or`] closes the current conjunction off as a branch and
//! starts a fresh one.

pub mod criterion;
pub mod operand;

pub use crate::querying::criterion::{Criterion, Op};
pub use crate::querying::operand::Operand;

use crate::descriptor::{Descriptor, IndexedField};
use crate::value::Value;

/// Sentinel field name referring to a record's primary key rather than one of its data fields.
///
/// Passed to [`Query::field`] the same way any other field name would be: `query.field(KEY_FIELD)`.
pub const KEY_FIELD: &str = "__key__";

/// A composable query over a single bucket's records.
///
/// Built with the fluent `.field(name).eq(value)` style; consumed by value at every execution entry
/// point ([`crate::typed::transaction::read::Transaction::find`],
/// [`crate::typed::transaction::write::Transaction::delete_matching`], etc.) since a query that has
/// started executing has no further use as a builder.
#[derive(Clone, Debug, Default)]
pub struct Query {
    pub(crate) criteria: Vec<Criterion>,
    pub(crate) branches: Vec<Vec<Criterion>>,
    pub(crate) skip: usize,
    pub(crate) limit: Option<usize>,
    pub(crate) sort_by: Vec<&'static str>,
    pub(crate) reverse: bool,
    pub(crate) distinct: bool,
    pub(crate) index_hint: Option<&'static str>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a criterion against the named field. Call an operator method on the returned
    /// [`FieldQuery`] to complete it and get the `Query` back.
    #[must_use]
    pub fn field(self, name: &'static str) -> FieldQuery {
        FieldQuery { query: self, field: name }
    }

    /// Closes the current conjunction as a branch and starts a new, empty one. The final query
    /// matches a record if the current conjunction (built up since the last `.or()`) matches, or any
    /// previously closed branch matches.
    #[must_use]
    pub fn or(mut self) -> Self {
        let closed = std::mem::take(&mut self.criteria);
        if !closed.is_empty() {
            self.branches.push(closed);
        }
        self
    }

    /// Negates the most recently added criterion in the current conjunction.
    #[must_use]
    pub fn not(mut self) -> Self {
        if let Some(last) = self.criteria.pop() {
            self.criteria.push(last.negate());
        }
        self
    }

    #[must_use]
    pub const fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    #[must_use]
    pub const fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Adds `field` as the next key in this query's sort order. Calling this more than once sorts
    /// by each field in the order added — ties on an earlier field are broken by the next one —
    /// matching the specification's "sortBy = ordered list of field names" modifier.
    #[must_use]
    pub fn sort_by(mut self, field: &'static str) -> Self {
        self.sort_by.push(field);
        self
    }

    #[must_use]
    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Deduplicates results, keyed on the [`Query::sort_by`] fields (or the full encoded record if
    /// none are set). Useful once a query has more than one branch, since the same record may
    /// satisfy more than one of them.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Hints the planner to drive this query from the named field's index rather than whichever
    /// index-eligible criterion comes first in declaration order. Has no effect if `field` isn't
    /// index-eligible on the record type being queried (the executor falls back to its normal
    /// declaration-order choice, or a full scan if nothing is eligible).
    #[must_use]
    pub const fn index_hint(mut self, field: &'static str) -> Self {
        self.index_hint = Some(field);
        self
    }

    pub(crate) fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    /// All conjunctions that make up this query's normal form, including the (possibly still open)
    /// current one if non-empty.
    pub(crate) fn conjunctions(&self) -> Vec<&[Criterion]> {
        let mut groups: Vec<&[Criterion]> = self.branches.iter().map(Vec::as_slice).collect();
        if !self.criteria.is_empty() {
            groups.push(self.criteria.as_slice());
        }
        groups
    }

    /// Evaluates the query against a single record's fields via its [`Descriptor`].
    ///
    /// # Errors
    ///
    /// Propagates field lookup and comparison errors from [`Descriptor::field`] and
    /// [`Criterion::test`].
    pub fn matches<D: Descriptor>(&self, record: &D) -> Result<bool, crate::Error> {
        for group in self.conjunctions() {
            if Self::conjunction_matches(group, record)? {
                return Ok(true);
            }
        }
        // A query with no criteria at all (freshly built) matches everything.
        Ok(self.criteria.is_empty() && self.branches.is_empty())
    }

    fn conjunction_matches<D: Descriptor>(
        group: &[Criterion],
        record: &D,
    ) -> Result<bool, crate::Error> {
        for criterion in group {
            let field_value = Self::field_value(criterion.field_name(), record)?;
            if !criterion.test(&field_value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn field_value<D: Descriptor>(name: &str, record: &D) -> Result<Value, crate::Error> {
        if name == KEY_FIELD {
            return record.primary_key().ok_or(crate::Error::FieldNotFound { field: KEY_FIELD });
        }
        record.field(name)
    }

    /// Returns the index-eligible criterion this query should drive its access path from, across
    /// the first conjunction only — index-driven access paths apply solely to a single-conjunction
    /// query; queries with `.or()` branches always fall back to a full scan followed by in-memory
    /// filtering, since a union of index scans would need to happen per-branch and redb's iterators
    /// don't support that without buffering.
    ///
    /// When [`Query::index_hint`] names a field with an index-eligible criterion in this
    /// conjunction, that criterion wins regardless of declaration order. Otherwise, the first
    /// index-eligible criterion in declaration order is used.
    #[must_use]
    pub(crate) fn index_access_path(
        &self,
        fields: &'static [IndexedField],
    ) -> Option<(&Criterion, &'static IndexedField)> {
        if !self.branches.is_empty() {
            return None;
        }

        if let Some(hint) = self.index_hint {
            if let Some(found) = self
                .criteria
                .iter()
                .find(|c| c.field_name() == hint)
                .and_then(|c| c.index_candidate(fields).map(|f| (c, f)))
            {
                return Some(found);
            }
        }

        self.criteria.iter().find_map(|c| c.index_candidate(fields).map(|f| (c, f)))
    }
}

/// A field name mid-criterion-construction, returned by [`Query::field`].
///
/// Each method here completes the criterion and returns the owning `Query`.
pub struct FieldQuery {
    query: Query,
    field: &'static str,
}

macro_rules! value_op {
    ($name:ident, $op:ident) => {
        #[must_use]
        pub fn $name(mut self, value: impl Into<Value>) -> Query {
            self.query.push(Criterion::new(self.field, Op::$op, Operand::value(value)));
            self.query
        }
    };
}

macro_rules! values_op {
    ($name:ident, $op:ident) => {
        #[must_use]
        pub fn $name(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> Query {
            self.query.push(Criterion::new(self.field, Op::$op, Operand::values(values)));
            self.query
        }
    };
}

impl FieldQuery {
    value_op!(eq, Eq);
    value_op!(ne, Ne);
    value_op!(gt, Gt);
    value_op!(ge, Ge);
    value_op!(lt, Lt);
    value_op!(le, Le);
    value_op!(contains, Contains);
    value_op!(has_prefix, HasPrefix);
    value_op!(has_suffix, HasSuffix);

    values_op!(in_values, In);
    values_op!(contains_any, ContainsAny);
    values_op!(contains_all, ContainsAll);

    #[must_use]
    pub fn is_nil(mut self) -> Query {
        self.query.push(Criterion::new(self.field, Op::IsNil, Operand::None));
        self.query
    }

    #[must_use]
    pub fn matches(mut self, predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Query {
        self.query.push(Criterion::new(self.field, Op::MatchFunc, Operand::predicate(predicate)));
        self.query
    }

    #[cfg(feature = "regex-match")]
    #[must_use]
    pub fn regex_match(mut self, re: regex::Regex) -> Query {
        self.query.push(Criterion::new(self.field, Op::RegexMatch, Operand::regex(re)));
        self.query
    }
}

// -------------------------------------------------------------------------------------------------
//
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::IndexedField;

    struct Account {
        id: u64,
        name: String,
        age: i64,
        tags: Vec<String>,
    }

    impl Descriptor for Account {
        fn bucket_name() -> &'static str {
            "Account"
        }

        fn primary_key(&self) -> Option<Value> {
            Some(Value::from(self.id))
        }

        fn field(&self, name: &str) -> Result<Value, crate::Error> {
            match name {
                "Name" => Ok(Value::from(self.name.clone())),
                "Age" => Ok(Value::from(self.age)),
                "Tags" => Ok(Value::from(self.tags.clone())),
                other => Err(crate::Error::FieldNotFound { field: Box::leak(other.to_string().into_boxed_str()) }),
            }
        }

        fn indexed_fields() -> &'static [IndexedField] {
            &[IndexedField::scalar("Age"), IndexedField::slice("Tags")]
        }
    }

    fn sample() -> Account {
        Account { id: 1, name: "Ada".into(), age: 30, tags: vec!["admin".into(), "staff".into()] }
    }

    #[test]
    fn and_conjunction_short_circuits() {
        let query = Query::new().field("Age").gt(18).field("Name").eq("Ada");
        assert!(query.matches(&sample()).unwrap());

        let query = Query::new().field("Age").gt(99).field("Name").eq("Ada");
        assert!(!query.matches(&sample()).unwrap());
    }

    #[test]
    fn or_branches_match_independently() {
        let query = Query::new().field("Age").eq(99).or().field("Name").eq("Ada");
        assert!(query.matches(&sample()).unwrap());
    }

    #[test]
    fn not_negates_last_criterion() {
        let query = Query::new().field("Age").eq(99).not();
        assert!(query.matches(&sample()).unwrap());
    }

    #[test]
    fn key_field_reads_primary_key() {
        let query = Query::new().field(KEY_FIELD).eq(1_u64);
        assert!(query.matches(&sample()).unwrap());
    }

    #[test]
    fn contains_any_checks_sequence_membership() {
        let query = Query::new().field("Tags").contains_any(["staff", "nobody"]);
        assert!(query.matches(&sample()).unwrap());
    }

    #[test]
    fn index_access_path_prefers_declaration_order() {
        let query = Query::new().field("Age").gt(18);
        let (criterion, field) = query.index_access_path(Account::indexed_fields()).unwrap();
        assert_eq!(criterion.field_name(), "Age");
        assert_eq!(field.name, "Age");
    }

    #[test]
    fn or_branches_disable_index_access_path() {
        let query = Query::new().field("Age").eq(18).or().field("Age").eq(30);
        assert!(query.index_access_path(Account::indexed_fields()).is_none());
    }

    #[test]
    fn index_hint_overrides_declaration_order() {
        let query =
            Query::new().field("Age").eq(30).field("Tags").contains("admin").index_hint("Tags");
        let (criterion, field) = query.index_access_path(Account::indexed_fields()).unwrap();
        assert_eq!(criterion.field_name(), "Tags");
        assert_eq!(field.name, "Tags");
    }

    #[test]
    fn index_hint_falls_back_when_not_eligible() {
        // "Name" isn't declared as an indexed field at all, so the hint can't apply and the
        // planner falls back to the first eligible criterion in declaration order.
        let query = Query::new().field("Age").eq(30).index_hint("Name");
        let (criterion, field) = query.index_access_path(Account::indexed_fields()).unwrap();
        assert_eq!(criterion.field_name(), "Age");
        assert_eq!(field.name, "Age");
    }

    #[test]
    fn multi_field_sort_by_breaks_ties_on_next_field() {
        let query = Query::new().sort_by("Age").sort_by("Name");
        assert_eq!(query.sort_by, vec!["Age", "Name"]);
    }
}
