//! Sale lifecycle status.
//!
//! The remote column is plain text, so the enumeration is enforced here: form
//! input parses through [`SaleStatus::from_str`](std::str::FromStr) and rows
//! deserialize through serde, both of which reject anything outside the three
//! known values.

use serde::{Deserialize, Serialize};

/// Error returned when text is not one of the known sale statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sale status: {0:?} (expected upcoming, active, or completed)")]
pub struct SaleStatusError(pub String);

/// Where a sale is in its life.
///
/// No transition rules apply; an admin may set any status at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

impl SaleStatus {
    /// All statuses, in the order they appear in the admin select box.
    pub const ALL: [Self; 3] = [Self::Upcoming, Self::Active, Self::Completed];

    /// Wire value stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Capitalised label shown on status badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// CSS modifier for the status badge colour.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Upcoming => "badge--upcoming",
            Self::Active => "badge--active",
            Self::Completed => "badge--completed",
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SaleStatus {
    type Err = SaleStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(SaleStatusError(other.to_string())),
        }
    }
}
