//! Query descriptions shared by the HTTP and in-memory data services.
//!
//! Only the slice of the PostgREST dialect this site uses is modelled:
//! `eq`/`neq` filters and a single ordering column.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

/// Remote tables the site reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    BusinessInfo,
    SocialLinks,
    Sales,
    TeamMembers,
    ContactMessages,
}

impl Table {
    /// Table name as used in the REST path.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BusinessInfo => "business_info",
            Self::SocialLinks => "social_links",
            Self::Sales => "sales",
            Self::TeamMembers => "team_members",
            Self::ContactMessages => "contact_messages",
        }
    }

    /// Whether rows carry a server-assigned `created_at` timestamp.
    #[must_use]
    pub const fn has_created_at(self) -> bool {
        matches!(self, Self::Sales | Self::ContactMessages)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Neq,
}

impl Operator {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
        }
    }
}

/// `column = value` or `column <> value` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: &'static str,
    operator: Operator,
    value: String,
}

impl Filter {
    /// Match rows whose `column` equals `value`.
    pub fn eq(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            operator: Operator::Eq,
            value: value.to_string(),
        }
    }

    /// Match rows whose `column` differs from `value`.
    pub fn neq(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            operator: Operator::Neq,
            value: value.to_string(),
        }
    }

    #[must_use]
    pub const fn column(&self) -> &'static str {
        self.column
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Query-string value in PostgREST operator syntax, e.g. `eq.true`.
    #[must_use]
    pub fn operator_value(&self) -> String {
        format!("{}.{}", self.operator.prefix(), self.value)
    }

    /// Evaluate the filter against a JSON row.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        let equal = match row.get(self.column) {
            Some(Value::String(s)) => *s == self.value,
            Some(Value::Bool(b)) => b.to_string() == self.value,
            Some(Value::Number(n)) => n.to_string() == self.value,
            Some(Value::Null) | None => self.value == "null",
            Some(_) => false,
        };
        match self.operator {
            Operator::Eq => equal,
            Operator::Neq => !equal,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub direction: Direction,
}

impl Order {
    /// Query-string value, e.g. `created_at.desc`.
    #[must_use]
    pub fn query_value(&self) -> String {
        let direction = match self.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        format!("{}.{direction}", self.column)
    }

    /// Compare two rows on the ordering column.
    ///
    /// Strings compare lexically (timestamps are stored in a fixed-width
    /// RFC 3339 form), numbers numerically, and missing values sort first.
    #[must_use]
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = match (a.get(self.column), b.get(self.column)) {
            (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
            (Some(Value::Number(x)), Some(Value::Number(y))) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
            (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
            (None | Some(Value::Null), _) => Ordering::Less,
            (_, None | Some(Value::Null)) => Ordering::Greater,
            _ => Ordering::Equal,
        };
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// A read query: every row of `table` matching all filters, optionally ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl Select {
    #[must_use]
    pub const fn from_table(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
        }
    }

    /// Add an equality filter.
    #[must_use]
    pub fn eq(mut self, column: &'static str, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Order ascending by `column`.
    #[must_use]
    pub fn order_asc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            direction: Direction::Asc,
        });
        self
    }

    /// Order descending by `column`.
    #[must_use]
    pub fn order_desc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            direction: Direction::Desc,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_filter_matches_value_types() {
        assert!(Filter::eq("is_active", true).matches(&json!({"is_active": true})));
        assert!(!Filter::eq("is_active", true).matches(&json!({"is_active": false})));
        assert!(Filter::eq("id", "abc").matches(&json!({"id": "abc"})));
        assert!(Filter::eq("n", 3).matches(&json!({"n": 3})));
        assert!(!Filter::eq("id", "abc").matches(&json!({})));
        assert!(Filter::neq("id", "abc").matches(&json!({"id": "xyz"})));
        assert!(!Filter::neq("id", "abc").matches(&json!({"id": "abc"})));
    }

    #[test]
    fn test_operator_and_order_syntax() {
        assert_eq!(Filter::eq("is_active", true).operator_value(), "eq.true");
        assert_eq!(Filter::neq("id", "a1").operator_value(), "neq.a1");
        let select = Select::from_table(Table::Sales).order_desc("created_at");
        assert_eq!(
            select.order.map(|o| o.query_value()).as_deref(),
            Some("created_at.desc")
        );
    }

    #[test]
    fn test_order_compare() {
        let older = json!({"created_at": "2025-01-01T00:00:00.000000Z"});
        let newer = json!({"created_at": "2025-06-01T00:00:00.000000Z"});
        let desc = Order {
            column: "created_at",
            direction: Direction::Desc,
        };
        assert_eq!(desc.compare(&newer, &older), Ordering::Less);

        let asc = Order {
            column: "name",
            direction: Direction::Asc,
        };
        assert_eq!(
            asc.compare(&json!({"name": "Avery"}), &json!({"name": "Blake"})),
            Ordering::Less
        );
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::ContactMessages.to_string(), "contact_messages");
        assert!(Table::Sales.has_created_at());
        assert!(!Table::TeamMembers.has_created_at());
    }
}
