//! `safetyboard` - a dashboard for recording and reviewing AI-safety incidents
//!
//! The library holds the whole data/view model: an in-memory incident store,
//! pure filter and sort stages, the submission form, a toast queue, and text
//! renderers for each view. The `safetyboard` binary drives it from a
//! terminal.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controls;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod incident;
pub mod logging;
pub mod render;
pub mod shell;
pub mod store;
pub mod timer;
pub mod toast;
pub mod view;

pub use config::Config;
pub use dashboard::{Change, Dashboard, Tab};
pub use error::{Error, Result};
pub use form::{Field, FormState, IncidentForm, SubmissionId, SubmitOutcome};
pub use incident::{Incident, IncidentDraft, IncidentId, Severity};
pub use logging::init_logging;
pub use store::IncidentStore;
pub use toast::{Toast, ToastDraft, ToastId, ToastQueue};
pub use view::{SeverityFilter, SortOrder};
