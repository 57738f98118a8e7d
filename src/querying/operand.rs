//! Right-hand sides a [`Criterion`](crate::querying::criterion::Criterion) can be tested against.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// The right-hand side of a [`Criterion`](crate::querying::criterion::Criterion).
#[derive(Clone)]
pub enum Operand {
    /// A single literal value, used by `Eq`, `Ne`, `Gt`, `Ge`, `Lt`, `Le`, `Contains`,
    /// `HasPrefix`, and `HasSuffix`.
    Value(Value),

    /// A set of literal values, used by `In`, `ContainsAny`, and `ContainsAll`.
    Values(Vec<Value>),

    /// A regular expression, used by `RegexMatch`. Only constructible behind the `regex-match`
    /// feature.
    #[cfg(feature = "regex-match")]
    Regex(Arc<regex::Regex>),

    /// An arbitrary user predicate over the field's value, used by `MatchFunc`. Not `Debug` — shown
    /// as `<predicate>` in rendered queries.
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),

    /// No operand, used by `IsNil`.
    None,
}

impl Operand {
    #[must_use]
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    #[must_use]
    pub fn values(vs: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::Values(vs.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    #[cfg(feature = "regex-match")]
    #[must_use]
    pub fn regex(re: regex::Regex) -> Self {
        Self::Regex(Arc::new(re))
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Values(vs) => f.debug_tuple("Values").field(vs).finish(),
            #[cfg(feature = "regex-match")]
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Self::None => f.write_str("None"),
        }
    }
}
