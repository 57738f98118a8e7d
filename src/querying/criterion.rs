//! Single field comparisons, the atoms a [`Query`](crate::querying::Query) is built from.

use crate::descriptor::{IndexKind, IndexedField};
use crate::querying::operand::Operand;
use crate::value::Value;
use std::cmp::Ordering;

/// The comparison a [`Criterion`] performs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    #[cfg(feature = "regex-match")]
    RegexMatch,
    MatchFunc,
    Contains,
    ContainsAny,
    ContainsAll,
    HasPrefix,
    HasSuffix,
    IsNil,
}

/// A single test of one field against one operand, optionally negated.
#[derive(Clone, Debug)]
pub struct Criterion {
    pub(crate) field: &'static str,
    pub(crate) op: Op,
    pub(crate) operand: Operand,
    pub(crate) negated: bool,
}

impl Criterion {
    #[must_use]
    pub fn new(field: &'static str, op: Op, operand: Operand) -> Self {
        Self { field, op, operand, negated: false }
    }

    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        self.field
    }

    #[must_use]
    pub const fn op(&self) -> Op {
        self.op
    }

    /// Tests a single field value against this criterion. `negated` is applied last, so callers
    /// never need to special-case it.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::TypeMismatch`] from [`Value::compare`] for the ordering and
    /// equality operators (`Eq`/`Ne`/`Gt`/`Ge`/`Lt`/`Le`) applied to incomparable kinds — notably,
    /// comparing a nilable field's value against a non-nil operand. `In` is the one exception: it
    /// tests each candidate value independently via [`Value::equal`] and never errors, since an
    /// incomparable pair there is simply not a match.
    pub fn test(&self, candidate: &Value) -> Result<bool, crate::Error> {
        let raw = self.test_unnegated(candidate)?;
        Ok(raw != self.negated)
    }

    fn test_unnegated(&self, candidate: &Value) -> Result<bool, crate::Error> {
        match self.op {
            Op::IsNil => Ok(candidate.is_nil()),
            Op::Eq => Ok(candidate.compare(self.expect_value()?)? == Ordering::Equal),
            Op::Ne => Ok(candidate.compare(self.expect_value()?)? != Ordering::Equal),
            Op::Gt => Ok(candidate.compare(self.expect_value()?)? == Ordering::Greater),
            Op::Ge => Ok(candidate.compare(self.expect_value()?)? != Ordering::Less),
            Op::Lt => Ok(candidate.compare(self.expect_value()?)? == Ordering::Less),
            Op::Le => Ok(candidate.compare(self.expect_value()?)? != Ordering::Greater),
            Op::In => Ok(self.expect_values()?.iter().any(|v| v.equal(candidate))),
            #[cfg(feature = "regex-match")]
            Op::RegexMatch => {
                let Operand::Regex(re) = &self.operand else {
                    return Err(crate::Error::InvalidField { field: self.field });
                };
                Ok(candidate.as_str().is_some_and(|s| re.is_match(s)))
            },
            Op::MatchFunc => {
                let Operand::Predicate(f) = &self.operand else {
                    return Err(crate::Error::InvalidField { field: self.field });
                };
                Ok(f(candidate))
            },
            Op::Contains => {
                let needle = self.expect_value()?;
                Ok(candidate.as_sequence().is_some_and(|seq| seq.iter().any(|e| e.equal(needle))))
            },
            Op::ContainsAny => {
                let needles = self.expect_values()?;
                Ok(candidate
                    .as_sequence()
                    .is_some_and(|seq| seq.iter().any(|e| needles.iter().any(|n| n.equal(e)))))
            },
            Op::ContainsAll => {
                let needles = self.expect_values()?;
                Ok(candidate.as_sequence().is_some_and(|seq| {
                    needles.iter().all(|n| seq.iter().any(|e| e.equal(n)))
                }))
            },
            Op::HasPrefix => {
                let prefix = self.expect_value()?.as_str().ok_or(crate::Error::TypeMismatch {
                    lhs: "string",
                    rhs: self.expect_value()?.kind_name(),
                })?;
                Ok(candidate.as_str().is_some_and(|s| s.starts_with(prefix)))
            },
            Op::HasSuffix => {
                let suffix = self.expect_value()?.as_str().ok_or(crate::Error::TypeMismatch {
                    lhs: "string",
                    rhs: self.expect_value()?.kind_name(),
                })?;
                Ok(candidate.as_str().is_some_and(|s| s.ends_with(suffix)))
            },
        }
    }

    /// Returns this criterion's single operand value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidField`] if the operand isn't a single [`Value`] (e.g. the
    /// criterion's operator expects a value-list operand instead).
    pub(crate) fn expect_value(&self) -> Result<&Value, crate::Error> {
        match &self.operand {
            Operand::Value(v) => Ok(v),
            _ => Err(crate::Error::InvalidField { field: self.field }),
        }
    }

    /// Returns this criterion's operand value list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidField`] if the operand isn't a value list.
    pub(crate) fn expect_values(&self) -> Result<&[Value], crate::Error> {
        match &self.operand {
            Operand::Values(vs) => Ok(vs.as_slice()),
            _ => Err(crate::Error::InvalidField { field: self.field }),
        }
    }

    /// Returns the declared [`IndexedField`] for this criterion's field, if `fields` declares one
    /// and this criterion's operator is eligible to use it as an access path.
    ///
    /// Eligible operators: `Eq`, `In`, `Contains`, `ContainsAny`, and `ContainsAll` always are (they
    /// map directly onto index bucket lookups/unions). Range operators (`Gt`/`Ge`/`Lt`/`Le`) are
    /// eligible only against a `Scalar` index, since `redb`'s ordered `Table::range` needs a single
    /// sort key per record. Negated criteria are never index-eligible — the executor always falls
    /// back to a full scan for a negated test, since the index holds only matching keys, not the
    /// full key space.
    #[must_use]
    pub fn index_candidate(&self, fields: &'static [IndexedField]) -> Option<&'static IndexedField> {
        if self.negated {
            return None;
        }

        let declared = fields.iter().find(|f| f.name == self.field)?;

        let eligible = match self.op {
            Op::Eq | Op::In | Op::Contains | Op::ContainsAny | Op::ContainsAll => true,
            Op::Gt | Op::Ge | Op::Lt | Op::Le => matches!(declared.kind, IndexKind::Scalar),
            _ => false,
        };

        eligible.then_some(declared)
    }
}

// -------------------------------------------------------------------------------------------------
//
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_matches_equal_values() {
        let criterion = Criterion::new("Age", Op::Eq, Operand::value(30_i64));
        assert!(criterion.test(&Value::from(30_i64)).unwrap());
        assert!(!criterion.test(&Value::from(31_i64)).unwrap());
    }

    #[test]
    fn eq_against_nil_is_a_type_mismatch() {
        let criterion = Criterion::new("Age", Op::Eq, Operand::value(30_i64));
        assert!(matches!(criterion.test(&Value::Nil), Err(crate::Error::TypeMismatch { .. })));
    }

    #[test]
    fn ne_against_nil_is_a_type_mismatch() {
        let criterion = Criterion::new("Age", Op::Ne, Operand::value(30_i64));
        assert!(matches!(criterion.test(&Value::Nil), Err(crate::Error::TypeMismatch { .. })));
    }

    #[test]
    fn in_against_nil_is_simply_not_a_match() {
        let criterion = Criterion::new("Age", Op::In, Operand::values([30_i64, 40]));
        assert!(!criterion.test(&Value::Nil).unwrap());
    }
}
