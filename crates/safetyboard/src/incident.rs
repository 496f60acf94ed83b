//! Core incident types for safetyboard.
//!
//! An [`Incident`] is created once from a validated [`IncidentDraft`] and is
//! never edited or deleted afterwards.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifier of an incident, unique within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(pub u64);

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IncidentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::invalid_argument("id", format!("'{s}' is not an incident id")))
    }
}

/// How serious an incident is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Minor impact.
    Low,
    /// Noticeable impact.
    Medium,
    /// Serious impact.
    High,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    /// The display label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::invalid_argument("severity", format!("expected Low, Medium or High, got '{s}'"))
            })
    }
}

/// The user-supplied part of an incident, before an id and timestamp exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentDraft {
    /// Short headline.
    pub title: String,
    /// Free-text account of what happened.
    pub description: String,
    /// Assessed severity.
    pub severity: Severity,
}

/// A recorded AI-safety incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Unique identifier.
    pub id: IncidentId,
    /// Short headline.
    pub title: String,
    /// Free-text account of what happened.
    pub description: String,
    /// Assessed severity.
    pub severity: Severity,
    /// When the incident was reported (serialized as RFC 3339).
    pub reported_at: DateTime<Utc>,
}

impl Incident {
    /// Build an incident from a draft with the given id and report time.
    #[must_use]
    pub fn from_draft(id: IncidentId, draft: IncidentDraft, reported_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            severity: draft.severity,
            reported_at,
        }
    }
}

fn seed_time(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

fn seed(id: u64, title: &str, description: &str, severity: Severity, at: &str) -> Incident {
    Incident {
        id: IncidentId(id),
        title: title.to_string(),
        description: description.to_string(),
        severity,
        reported_at: seed_time(at),
    }
}

/// The five incidents a fresh dashboard starts with.
#[must_use]
pub fn builtin_seed() -> Vec<Incident> {
    vec![
        seed(
            1,
            "Biased Recommendation Algorithm",
            "Algorithm consistently favored certain demographics in job recommendations, \
             leading to unequal opportunity distribution across different user groups. \
             The issue was identified through an internal audit of recommendation patterns.",
            Severity::Medium,
            "2025-03-15T10:00:00Z",
        ),
        seed(
            2,
            "LLM Hallucination in Critical Info",
            "LLM provided incorrect safety procedure information when queried about \
             emergency protocols in a healthcare setting. This could have led to dangerous \
             situations if the information had been acted upon without verification.",
            Severity::High,
            "2025-04-01T14:30:00Z",
        ),
        seed(
            3,
            "Minor Data Leak via Chatbot",
            "Chatbot inadvertently exposed non-sensitive user metadata during conversations. \
             While no personally identifiable information was leaked, the incident highlights \
             potential vulnerabilities in the data handling pipeline.",
            Severity::Low,
            "2025-03-20T09:15:00Z",
        ),
        seed(
            4,
            "Autonomous Vehicle Navigation Error",
            "AI navigation system misinterpreted road markings during heavy rain, causing the \
             vehicle to briefly cross into the opposite lane. Safety systems caught and \
             corrected the error, but the incident highlights weather-related perception issues.",
            Severity::High,
            "2025-03-25T16:45:00Z",
        ),
        seed(
            5,
            "Content Moderation False Positive",
            "AI content moderation system incorrectly flagged educational content about \
             historical conflicts as violating community guidelines. This resulted in \
             temporary removal of legitimate educational material from the platform.",
            Severity::Medium,
            "2025-04-05T11:20:00Z",
        ),
    ]
}
