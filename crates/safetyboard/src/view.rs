//! Derived incident views: severity filter followed by date sort.
//!
//! Both stages are pure and recomputed from the canonical collection on every
//! read; nothing here is cached.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::incident::{Incident, Severity};

/// Which severities the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeverityFilter {
    /// Every incident.
    #[default]
    All,
    /// Only low-severity incidents.
    Low,
    /// Only medium-severity incidents.
    Medium,
    /// Only high-severity incidents.
    High,
}

impl SeverityFilter {
    /// Whether an incident passes this filter.
    #[must_use]
    pub fn matches(self, incident: &Incident) -> bool {
        match self.severity() {
            None => true,
            Some(severity) => incident.severity == severity,
        }
    }

    /// The single severity this filter selects, or `None` for `All`.
    #[must_use]
    pub fn severity(self) -> Option<Severity> {
        match self {
            Self::All => None,
            Self::Low => Some(Severity::Low),
            Self::Medium => Some(Severity::Medium),
            Self::High => Some(Severity::High),
        }
    }

    /// The display label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl From<Severity> for SeverityFilter {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => Self::Low,
            Severity::Medium => Self::Medium,
            Severity::High => Self::High,
        }
    }
}

impl std::fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Severity>().map(Self::from).map_err(|_| {
            Error::invalid_argument("filter", format!("expected All, Low, Medium or High, got '{s}'"))
        })
    }
}

/// Date order of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently reported first.
    #[default]
    Newest,
    /// Earliest reported first.
    Oldest,
}

impl SortOrder {
    /// The identifier used in config and commands.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }

    /// Compare two incidents by report time in this order.
    #[must_use]
    pub fn compare(self, a: &Incident, b: &Incident) -> Ordering {
        match self {
            Self::Newest => b.reported_at.cmp(&a.reported_at),
            Self::Oldest => a.reported_at.cmp(&b.reported_at),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            _ => Err(Error::invalid_argument(
                "sort",
                format!("expected newest or oldest, got '{s}'"),
            )),
        }
    }
}

/// Keep the incidents matching `severity_filter`, preserving order.
#[must_use]
pub fn filter(incidents: &[Incident], severity_filter: SeverityFilter) -> Vec<&Incident> {
    incidents
        .iter()
        .filter(|incident| severity_filter.matches(incident))
        .collect()
}

/// Order incidents by report time. Equal timestamps keep their input order.
#[must_use]
pub fn sort(mut incidents: Vec<&Incident>, order: SortOrder) -> Vec<&Incident> {
    incidents.sort_by(|a, b| order.compare(a, b));
    incidents
}

/// Filter then sort.
#[must_use]
pub fn visible(
    incidents: &[Incident],
    severity_filter: SeverityFilter,
    order: SortOrder,
) -> Vec<&Incident> {
    sort(filter(incidents, severity_filter), order)
}
