//! Text rendering of the dashboard views.
//!
//! Rendering is pure: every function takes already-derived state and returns
//! a string. Colour is optional so output can be piped or compared in tests.

use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::config::DisplayConfig;
use crate::error::Result;
use crate::form::{Field, IncidentForm};
use crate::incident::{Incident, IncidentId};
use crate::toast::Toast;

/// Shown instead of an empty list.
pub const EMPTY_LIST_MESSAGE: &str = "No incidents match your current filters.";

/// Info line shown under the form fields.
pub const FORM_HINT: &str =
    "All fields are required. Please provide accurate information to help improve AI safety.";

/// Shown while a submission's success notice is up.
pub const SUCCESS_MESSAGE: &str =
    "Incident reported successfully! Your report has been added to the dashboard.";

/// Colour of a severity badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    /// Low severity.
    Green,
    /// Medium severity.
    Yellow,
    /// High severity.
    Red,
    /// Anything unrecognised.
    Gray,
}

impl BadgeColor {
    /// Pick a colour from a severity label, falling back to gray.
    #[must_use]
    pub fn for_label(label: &str) -> Self {
        match label {
            "Low" => Self::Green,
            "Medium" => Self::Yellow,
            "High" => Self::Red,
            _ => Self::Gray,
        }
    }

    fn paint(self, text: &str) -> String {
        match self {
            Self::Green => text.green().to_string(),
            Self::Yellow => text.yellow().to_string(),
            Self::Red => text.red().to_string(),
            Self::Gray => text.bright_black().to_string(),
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyle {
    /// Emit ANSI colours.
    pub color: bool,
    /// chrono format string for report times.
    pub timestamp_format: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for RenderStyle {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            color: display.color,
            timestamp_format: display.timestamp_format.clone(),
        }
    }
}

impl RenderStyle {
    /// Plain output with the default timestamp format.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }

    /// Human-readable report time (UTC).
    #[must_use]
    pub fn format_timestamp(&self, at: &DateTime<Utc>) -> String {
        at.format(&self.timestamp_format).to_string()
    }

    /// Severity badge text, coloured when enabled.
    #[must_use]
    pub fn badge(&self, label: &str) -> String {
        let text = format!("[{label} Severity]");
        if self.color {
            BadgeColor::for_label(label).paint(&text)
        } else {
            text
        }
    }

    fn emphasis(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Toggle button text for an item.
#[must_use]
pub fn toggle_label(expanded: bool) -> &'static str {
    if expanded {
        "Hide Details"
    } else {
        "View Details"
    }
}

/// Render one list item.
#[must_use]
pub fn render_incident(incident: &Incident, expanded: bool, style: &RenderStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} {}",
        incident.id,
        style.emphasis(&incident.title)
    );
    let _ = writeln!(
        out,
        "   {}  Reported: {}  ({})",
        style.badge(incident.severity.as_str()),
        style.format_timestamp(&incident.reported_at),
        toggle_label(expanded)
    );
    if expanded {
        let _ = writeln!(out, "   Description:");
        let _ = writeln!(out, "   {}", incident.description);
    }
    out
}

/// Render the filtered, sorted list.
#[must_use]
pub fn render_incident_list(
    incidents: &[&Incident],
    expanded: &HashSet<IncidentId>,
    style: &RenderStyle,
) -> String {
    if incidents.is_empty() {
        return format!("{EMPTY_LIST_MESSAGE}\n");
    }
    incidents
        .iter()
        .map(|incident| render_incident(incident, expanded.contains(&incident.id), style))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_field(out: &mut String, form: &IncidentForm, field: Field, value: &str, style: &RenderStyle) {
    let _ = writeln!(out, "{}: {value}", field.label());
    if let Some(message) = form.error(field) {
        let _ = writeln!(out, "  ! {}", style.error(message));
    }
}

/// Render the submission form with inline errors and notices.
#[must_use]
pub fn render_form(form: &IncidentForm, style: &RenderStyle) -> String {
    let mut out = String::new();
    let title = if form.title().is_empty() {
        "(enter incident title)"
    } else {
        form.title()
    };
    let description = if form.description().is_empty() {
        "(provide detailed information about the incident)"
    } else {
        form.description()
    };
    let severity = form.severity().map_or("(select severity level)", |s| s.as_str());

    render_field(&mut out, form, Field::Title, title, style);
    render_field(&mut out, form, Field::Description, description, style);
    render_field(&mut out, form, Field::Severity, severity, style);
    let _ = writeln!(out);
    let _ = writeln!(out, "i {FORM_HINT}");
    if form.show_success() {
        let line = if style.color {
            SUCCESS_MESSAGE.green().to_string()
        } else {
            SUCCESS_MESSAGE.to_string()
        };
        let _ = writeln!(out, "+ {line}");
    }
    out
}

/// Render pending toasts, one per line.
#[must_use]
pub fn render_toasts(toasts: &[Toast]) -> String {
    let mut out = String::new();
    for toast in toasts {
        let title = toast.title.as_deref().unwrap_or("");
        match toast.description.as_deref() {
            Some(description) if !title.is_empty() => {
                let _ = writeln!(out, "* {title}: {description}");
            }
            Some(description) => {
                let _ = writeln!(out, "* {description}");
            }
            None => {
                let _ = writeln!(out, "* {title}");
            }
        }
    }
    out
}

/// Render a list of incidents as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn render_json(incidents: &[&Incident]) -> Result<String> {
    Ok(serde_json::to_string_pretty(incidents)?)
}
