//! The operator registry.
//!
//! Every operator a rule may use is a variant of [`Operator`]. Each carries a
//! fixed value arity, a predicate shape, and a coercion that turns the rule's
//! values into the values actually bound:
//!
//! | operator         | arity | predicate           | bound            |
//! |------------------|-------|---------------------|------------------|
//! | `is`             | 1     | `c = ?`             | v1               |
//! | `isNot`          | 1     | `c <> ?`            | v1               |
//! | `contains`       | 1     | `c LIKE ?`          | `%v1%`           |
//! | `doesNotContain` | 1     | `c NOT LIKE ?`      | `%v1%`           |
//! | `beginsWith`     | 1     | `c LIKE ?`          | `v1%`            |
//! | `endsWith`       | 1     | `c LIKE ?`          | `%v1`            |
//! | `isBetween`      | 2     | `c between ? and ?` | v1, v2           |
//! | `isGreaterThan`  | 1     | `c > ?`             | v1               |
//! | `isLessThan`     | 1     | `c < ?`             | v1               |
//! | `inLast`         | 1     | `c >= ?`            | midnight, v1 days ago |
//! | `notInLast`      | 1     | `c < ?`             | midnight, v1 days ago |

use crate::error::CompileError;
use crate::sql::{quote_ident, write_comparison};
use chrono::{Days, NaiveDateTime, NaiveTime};
use smartlist_proto::Value;
use std::fmt;

/// A rule operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// Equality.
    Is,
    /// Inequality.
    IsNot,
    /// Substring match.
    Contains,
    /// Negated substring match.
    DoesNotContain,
    /// Prefix match.
    BeginsWith,
    /// Suffix match.
    EndsWith,
    /// Inclusive range.
    IsBetween,
    /// Strictly greater.
    IsGreaterThan,
    /// Strictly less.
    IsLessThan,
    /// Within the last N days.
    InLast,
    /// Before the last N days.
    NotInLast,
}

impl Operator {
    /// Every registered operator.
    pub const ALL: [Operator; 11] = [
        Operator::Is,
        Operator::IsNot,
        Operator::Contains,
        Operator::DoesNotContain,
        Operator::BeginsWith,
        Operator::EndsWith,
        Operator::IsBetween,
        Operator::IsGreaterThan,
        Operator::IsLessThan,
        Operator::InLast,
        Operator::NotInLast,
    ];

    /// Look an operator up by its wire name.
    pub fn lookup(name: &str) -> Result<Self, CompileError> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| CompileError::unknown_operator(name))
    }

    /// The operator's wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Is => "is",
            Operator::IsNot => "isNot",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "doesNotContain",
            Operator::BeginsWith => "beginsWith",
            Operator::EndsWith => "endsWith",
            Operator::IsBetween => "isBetween",
            Operator::IsGreaterThan => "isGreaterThan",
            Operator::IsLessThan => "isLessThan",
            Operator::InLast => "inLast",
            Operator::NotInLast => "notInLast",
        }
    }

    /// Number of values the operator takes.
    pub fn arity(&self) -> usize {
        match self {
            Operator::IsBetween => 2,
            _ => 1,
        }
    }

    /// Render the predicate for `column`, with one placeholder per bound value.
    pub fn render(&self, column: &str) -> String {
        let mut buf = String::new();
        match self {
            Operator::Is => write_comparison(&mut buf, column, "="),
            Operator::IsNot => write_comparison(&mut buf, column, "<>"),
            Operator::Contains | Operator::BeginsWith | Operator::EndsWith => {
                write_comparison(&mut buf, column, "LIKE")
            }
            Operator::DoesNotContain => write_comparison(&mut buf, column, "NOT LIKE"),
            Operator::IsBetween => {
                buf.push_str(&quote_ident(column));
                buf.push_str(" between ? and ?");
            }
            Operator::IsGreaterThan => write_comparison(&mut buf, column, ">"),
            Operator::IsLessThan | Operator::NotInLast => write_comparison(&mut buf, column, "<"),
            Operator::InLast => write_comparison(&mut buf, column, ">="),
        }
        buf
    }

    /// Turn rule values into bound values.
    ///
    /// `now` is the compilation's reference instant; relative-date operators
    /// bind midnight of `now` minus the given number of days.
    pub fn coerce(
        &self,
        values: &[Value],
        now: NaiveDateTime,
    ) -> Result<Vec<Value>, CompileError> {
        if values.len() != self.arity() {
            return Err(CompileError::invalid_arity(
                self.name(),
                self.arity(),
                values.len(),
            ));
        }

        match self {
            Operator::Is
            | Operator::IsNot
            | Operator::IsBetween
            | Operator::IsGreaterThan
            | Operator::IsLessThan => Ok(values.to_vec()),
            Operator::Contains | Operator::DoesNotContain => {
                Ok(vec![self.pattern(&values[0], "%", "%")?])
            }
            Operator::BeginsWith => Ok(vec![self.pattern(&values[0], "", "%")?]),
            Operator::EndsWith => Ok(vec![self.pattern(&values[0], "%", "")?]),
            Operator::InLast | Operator::NotInLast => {
                let days = self.day_count(&values[0])?;
                let date = now
                    .date()
                    .checked_sub_days(Days::new(days))
                    .ok_or_else(|| {
                        CompileError::invalid_value(format!(
                            "operator '{}': {} days is out of range",
                            self.name(),
                            days
                        ))
                    })?;
                Ok(vec![Value::Timestamp(date.and_time(NaiveTime::default()))])
            }
        }
    }

    fn pattern(&self, value: &Value, prefix: &str, suffix: &str) -> Result<Value, CompileError> {
        match value {
            Value::Null | Value::Timestamp(_) => Err(CompileError::invalid_value(format!(
                "operator '{}' cannot match a {} value",
                self.name(),
                value.type_name()
            ))),
            other => Ok(Value::String(format!("{}{}{}", prefix, other, suffix))),
        }
    }

    fn day_count(&self, value: &Value) -> Result<u64, CompileError> {
        let days = value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()));

        days.and_then(|d| u64::try_from(d).ok()).ok_or_else(|| {
            CompileError::invalid_value(format!(
                "operator '{}' takes a non-negative number of days, got '{}'",
                self.name(),
                value
            ))
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Operator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileErrorKind;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 7, 15)
            .unwrap()
            .and_hms_opt(13, 45, 10)
            .unwrap()
    }

    #[test]
    fn test_lookup_roundtrips_names() {
        for op in Operator::ALL {
            assert_eq!(Operator::lookup(op.name()).unwrap(), op);
        }
        assert_eq!("isNot".parse::<Operator>().unwrap(), Operator::IsNot);
    }

    #[test]
    fn test_unknown_operator() {
        let err = Operator::lookup("matches").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnknownOperator);
        // Names are case-sensitive.
        assert!(Operator::lookup("IS").is_err());
    }

    #[test]
    fn test_arity() {
        assert_eq!(Operator::IsBetween.arity(), 2);
        assert!(Operator::ALL
            .iter()
            .filter(|op| **op != Operator::IsBetween)
            .all(|op| op.arity() == 1));
    }

    #[test]
    fn test_render() {
        assert_eq!(Operator::Is.render("title"), "\"title\" = ?");
        assert_eq!(Operator::IsNot.render("title"), "\"title\" <> ?");
        assert_eq!(Operator::DoesNotContain.render("title"), "\"title\" NOT LIKE ?");
        assert_eq!(Operator::IsBetween.render("bit_rate"), "\"bit_rate\" between ? and ?");
        assert_eq!(Operator::InLast.render("created_at"), "\"created_at\" >= ?");
        assert_eq!(Operator::NotInLast.render("created_at"), "\"created_at\" < ?");
    }

    #[test]
    fn test_like_patterns() {
        let foo = [Value::from("Foo")];
        assert_eq!(
            Operator::Contains.coerce(&foo, now()).unwrap(),
            vec![Value::from("%Foo%")]
        );
        assert_eq!(
            Operator::BeginsWith.coerce(&foo, now()).unwrap(),
            vec![Value::from("Foo%")]
        );
        assert_eq!(
            Operator::EndsWith.coerce(&foo, now()).unwrap(),
            vec![Value::from("%Foo")]
        );
        assert_eq!(
            Operator::Contains.coerce(&[Value::Int(19)], now()).unwrap(),
            vec![Value::from("%19%")]
        );

        let err = Operator::Contains.coerce(&[Value::Null], now()).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::InvalidValue);
    }

    #[test]
    fn test_relative_date_truncates_to_midnight() {
        let expected = NaiveDate::from_ymd_opt(2018, 7, 8)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        for days in [Value::Int(7), Value::from("7")] {
            assert_eq!(
                Operator::InLast.coerce(&[days], now()).unwrap(),
                vec![Value::Timestamp(expected)]
            );
        }
    }

    #[test]
    fn test_relative_date_rejects_bad_day_counts() {
        for bad in [Value::from("a week"), Value::Int(-1), Value::Float(1.5)] {
            let err = Operator::NotInLast.coerce(&[bad], now()).unwrap_err();
            assert_eq!(err.kind, CompileErrorKind::InvalidValue);
        }
    }

    #[test]
    fn test_relative_date_out_of_range() {
        for op in [Operator::InLast, Operator::NotInLast] {
            let err = op.coerce(&[Value::Int(i64::MAX)], now()).unwrap_err();
            assert_eq!(err.kind, CompileErrorKind::InvalidValue);
            assert!(err.message.contains("out of range"));
        }
    }

    #[test]
    fn test_coerce_checks_arity() {
        let err = Operator::IsBetween
            .coerce(&[Value::Int(1)], now())
            .unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::InvalidArity);
    }
}
