//! Grouping and reduction over an already-fetched slice of records.
//!
//! The aggregator is deliberately independent of storage: it groups and reduces whatever records the
//! caller already collected from a [`Query`](crate::querying::Query), matching bolthold's
//! `FindAggregate` which also runs over an in-memory result set rather than pushing grouping down
//! into the store.

use crate::descriptor::Descriptor;
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Groups records by one or more field values and exposes per-group reductions.
pub struct Aggregator;

impl Aggregator {
    /// Groups `records` by the tuple of values their `fields` produce, preserving each group's
    /// first-seen order (the order groups appear in the result mirrors the order their first member
    /// appeared in `records`).
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::FieldNotFound`] if any record is missing one of `fields`.
    pub fn group_by<R: Descriptor>(
        records: Vec<R>,
        fields: &'static [&'static str],
    ) -> Result<Vec<Group<R>>, crate::Error> {
        let mut order: Vec<Vec<Value>> = Vec::new();
        let mut groups: HashMap<usize, Group<R>> = HashMap::new();
        let mut key_to_index: Vec<(Vec<Value>, usize)> = Vec::new();

        for record in records {
            let key: Vec<Value> =
                fields.iter().map(|f| record.field(f)).collect::<Result<_, _>>()?;

            let index = key_to_index
                .iter()
                .find(|(existing, _)| keys_equal(existing, &key))
                .map(|(_, idx)| *idx);

            let index = match index {
                Some(idx) => idx,
                None => {
                    let idx = order.len();
                    order.push(key.clone());
                    key_to_index.push((key.clone(), idx));
                    groups.insert(idx, Group { key, records: Vec::new(), sort_cache: None });
                    idx
                },
            };

            groups.get_mut(&index).expect("index was just inserted or found").records.push(record);
        }

        Ok((0..order.len()).map(|i| groups.remove(&i).expect("every index was populated")).collect())
    }
}

fn keys_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equal(y))
}

/// One group produced by [`Aggregator::group_by`], with its key and member records.
pub struct Group<R> {
    key: Vec<Value>,
    records: Vec<R>,
    /// Caches which field the records were last sorted by, so repeated calls to `min`/`max`/`sort`
    /// on the same field don't re-sort. Invalidated whenever a different field is requested.
    sort_cache: Option<&'static str>,
}

impl<R: Descriptor> Group<R> {
    #[must_use]
    pub fn key(&self) -> &[Value] {
        &self.key
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Sums a numeric field across the group's records.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::FieldNotFound`]/[`crate::Error::TypeMismatch`] if `field` is
    /// missing or non-numeric on any record.
    pub fn sum(&self, field: &str) -> Result<f64, crate::Error> {
        let mut total = 0.0;
        for record in &self.records {
            let value = record.field(field)?;
            total += value.as_f64().ok_or(crate::Error::TypeMismatch {
                lhs: "number",
                rhs: value.kind_name(),
            })?;
        }
        Ok(total)
    }

    /// Averages a numeric field across the group's records.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Empty`] for an empty group, otherwise the same errors as
    /// [`Group::sum`].
    pub fn avg(&self, field: &str) -> Result<f64, crate::Error> {
        if self.records.is_empty() {
            return Err(crate::Error::Empty);
        }
        Ok(self.sum(field)? / self.records.len() as f64)
    }

    /// Sorts the group's records by `field`, ascending. A no-op if the group is already sorted by
    /// that field.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Descriptor::field`] and [`Value::compare`].
    pub fn sort_by(&mut self, field: &'static str) -> Result<(), crate::Error> {
        if self.sort_cache == Some(field) {
            return Ok(());
        }

        let mut keyed: Vec<(Value, usize)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| r.field(field).map(|v| (v, i)))
            .collect::<Result<_, _>>()?;

        let mut err = None;
        keyed.sort_by(|a, b| {
            a.0.compare(&b.0).unwrap_or_else(|e| {
                err.get_or_insert(e);
                Ordering::Equal
            })
        });
        if let Some(e) = err {
            return Err(e);
        }

        // Re-order `self.records` to match `keyed`'s index permutation without requiring `R: Clone`.
        let mut remaining: Vec<Option<R>> = self.records.drain(..).map(Some).collect();
        self.records = keyed
            .into_iter()
            .map(|(_, original_index)| remaining[original_index].take().expect("each index used once"))
            .collect();

        self.sort_cache = Some(field);
        Ok(())
    }

    /// Returns the record with the smallest value of `field`, without disturbing the group's
    /// current ordering (restores it via `sort_cache` if sorting by a different field was needed).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Empty`] for an empty group, otherwise propagates comparison errors.
    pub fn min(&self, field: &str) -> Result<&R, crate::Error> {
        self.extremum(field, Ordering::Less)
    }

    /// Returns the record with the largest value of `field`. See [`Group::min`].
    pub fn max(&self, field: &str) -> Result<&R, crate::Error> {
        self.extremum(field, Ordering::Greater)
    }

    fn extremum(&self, field: &str, favor: Ordering) -> Result<&R, crate::Error> {
        let mut best: Option<(&R, Value)> = None;
        for record in &self.records {
            let value = record.field(field)?;
            best = match best {
                None => Some((record, value)),
                Some((best_record, best_value)) => {
                    if value.compare(&best_value)? == favor {
                        Some((record, value))
                    } else {
                        Some((best_record, best_value))
                    }
                },
            };
        }
        best.map(|(r, _)| r).ok_or(crate::Error::Empty)
    }
}

// -------------------------------------------------------------------------------------------------
//
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::IndexedField;

    struct Sale {
        region: String,
        amount: i64,
    }

    impl Descriptor for Sale {
        fn bucket_name() -> &'static str {
            "Sale"
        }

        fn primary_key(&self) -> Option<Value> {
            None
        }

        fn field(&self, name: &str) -> Result<Value, crate::Error> {
            match name {
                "Region" => Ok(Value::from(self.region.clone())),
                "Amount" => Ok(Value::from(self.amount)),
                other => Err(crate::Error::FieldNotFound {
                    field: Box::leak(other.to_string().into_boxed_str()),
                }),
            }
        }

        fn indexed_fields() -> &'static [IndexedField] {
            &[]
        }
    }

    fn sample() -> Vec<Sale> {
        vec![
            Sale { region: "East".into(), amount: 10 },
            Sale { region: "West".into(), amount: 30 },
            Sale { region: "East".into(), amount: 20 },
        ]
    }

    #[test]
    fn groups_partition_by_key() {
        let groups = Aggregator::group_by(sample(), &["Region"]).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].count(), 2);
        assert_eq!(groups[1].count(), 1);
    }

    #[test]
    fn sum_and_avg_reduce_numeric_field() {
        let groups = Aggregator::group_by(sample(), &["Region"]).unwrap();
        let east = &groups[0];
        assert_eq!(east.sum("Amount").unwrap(), 30.0);
        assert_eq!(east.avg("Amount").unwrap(), 15.0);
    }

    #[test]
    fn min_and_max_find_extremes_without_reordering() {
        let groups = Aggregator::group_by(sample(), &["Region"]).unwrap();
        let east = &groups[0];
        assert_eq!(east.min("Amount").unwrap().amount, 10);
        assert_eq!(east.max("Amount").unwrap().amount, 20);
    }

    #[test]
    fn sort_by_reorders_records_ascending() {
        let mut groups = Aggregator::group_by(sample(), &["Region"]).unwrap();
        groups[0].sort_by("Amount").unwrap();
        let amounts: Vec<i64> = groups[0].records().iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![10, 20]);
    }
}
