//! Merged-view ordering

use std::cmp::Ordering;

use serde_json::Value;
use shared::models::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Single-field sort of a merged record list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Comparable projection of a field value
#[derive(Debug, PartialEq)]
enum SortKey<'a> {
    Bool(bool),
    Number(f64),
    Text(&'a str),
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn sort_key<'a>(record: &'a Record, field: &str) -> Option<SortKey<'a>> {
    match field {
        "id" => record.id.as_deref().map(SortKey::Text),
        "plant" => record.plant.as_ref().map(|p| SortKey::Text(p.as_str())),
        _ => match record.get(field)? {
            Value::Bool(b) => Some(SortKey::Bool(*b)),
            Value::Number(n) => n.as_f64().map(SortKey::Number),
            // Empty cells count as missing
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(SortKey::Text(s)),
            _ => None,
        },
    }
}

/// Stable sort; records without a value for the field go last in either order.
pub fn sort_records(records: &mut [Record], spec: &SortSpec) {
    records.sort_by(|a, b| {
        match (sort_key(a, &spec.field), sort_key(b, &spec.field)) {
            (Some(x), Some(y)) => match spec.order {
                SortOrder::Ascending => x.compare(&y),
                SortOrder::Descending => y.compare(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
