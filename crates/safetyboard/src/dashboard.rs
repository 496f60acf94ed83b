//! The dashboard: one instance owns all state for one view of the incidents.
//!
//! Every mutation goes through a method here, which then recomputes the
//! visible list from the canonical collection and hands it to subscribers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::controls::{Choice, Controls};
use crate::error::{Error, Result};
use crate::form::{IncidentForm, SubmissionId, SubmitOutcome};
use crate::incident::{Incident, IncidentId, Severity};
use crate::store::{load_seed_file, IncidentStore};
use crate::toast::{ToastDraft, ToastId, ToastQueue};
use crate::view::{self, SeverityFilter, SortOrder};

/// The two panes of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// The incident list.
    #[default]
    Incidents,
    /// The submission form.
    Report,
}

impl Tab {
    /// Pane identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::Report => "report",
        }
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incidents" => Ok(Self::Incidents),
            "report" => Ok(Self::Report),
            _ => Err(Error::invalid_argument(
                "tab",
                format!("expected incidents or report, got '{s}'"),
            )),
        }
    }
}

impl Choice for Tab {
    const ALL: &'static [Self] = &[Self::Incidents, Self::Report];
    const HEADING: &'static str = "View:";

    fn button_label(self) -> &'static str {
        match self {
            Self::Incidents => "View Incidents",
            Self::Report => "Report New Incident",
        }
    }
}

/// What changed in a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A new incident was stored.
    IncidentAdded(IncidentId),
    /// An incident's details were shown or hidden.
    ExpandedToggled(IncidentId),
    /// The severity filter changed.
    FilterChanged(SeverityFilter),
    /// The sort order changed.
    SortChanged(SortOrder),
    /// Another pane was selected.
    TabChanged(Tab),
    /// Form input, errors, or notice changed.
    FormChanged,
    /// A toast was queued or dismissed.
    ToastsChanged,
}

/// Handle returned by [`Dashboard::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Change, &[&Incident])>;

/// Per-instance dashboard state.
pub struct Dashboard {
    store: IncidentStore,
    filter: SeverityFilter,
    sort: SortOrder,
    tab: Tab,
    form: IncidentForm,
    toasts: ToastQueue,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("store", &self.store)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("tab", &self.tab)
            .field("form", &self.form)
            .field("toasts", &self.toasts)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(IncidentStore::with_builtin_seed())
    }
}

impl Dashboard {
    /// A dashboard over `store` with default filter, sort and tab.
    #[must_use]
    pub fn new(store: IncidentStore) -> Self {
        Self {
            store,
            filter: SeverityFilter::default(),
            sort: SortOrder::default(),
            tab: Tab::default(),
            form: IncidentForm::new(),
            toasts: ToastQueue::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Build a dashboard as configured: seed source and initial view state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured seed file can't be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = match &config.seed.path {
            Some(path) => IncidentStore::from_incidents(load_seed_file(path)?)?,
            None if config.seed.builtin => IncidentStore::with_builtin_seed(),
            None => IncidentStore::new(),
        };
        info!(incidents = store.len(), "Dashboard ready");

        let mut dashboard = Self::new(store);
        dashboard.filter = config.dashboard.default_filter;
        dashboard.sort = config.dashboard.default_sort;
        dashboard.tab = config.dashboard.default_tab;
        Ok(dashboard)
    }

    /// The canonical store.
    #[must_use]
    pub fn store(&self) -> &IncidentStore {
        &self.store
    }

    /// Current severity filter.
    #[must_use]
    pub fn filter(&self) -> SeverityFilter {
        self.filter
    }

    /// Current sort order.
    #[must_use]
    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Current pane.
    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// The submission form.
    #[must_use]
    pub fn form(&self) -> &IncidentForm {
        &self.form
    }

    /// The toast queue.
    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Incidents to show: filtered, then sorted, recomputed on each call.
    #[must_use]
    pub fn visible(&self) -> Vec<&Incident> {
        view::visible(self.store.incidents(), self.filter, self.sort)
    }

    /// Filter buttons for the current state.
    #[must_use]
    pub fn filter_controls(&self) -> Controls<SeverityFilter> {
        Controls::new(self.filter)
    }

    /// Sort buttons for the current state.
    #[must_use]
    pub fn sort_controls(&self) -> Controls<SortOrder> {
        Controls::new(self.sort)
    }

    /// Tab buttons for the current state.
    #[must_use]
    pub fn tab_controls(&self) -> Controls<Tab> {
        Controls::new(self.tab)
    }

    /// Register an observer called after every mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&Change, &[&Incident]) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: &Change) {
        let visible = view::visible(self.store.incidents(), self.filter, self.sort);
        for (_, observer) in &mut self.observers {
            observer(change, &visible);
        }
    }

    /// Select a severity filter.
    pub fn set_filter(&mut self, filter: SeverityFilter) {
        debug!(filter = %filter, "Filter changed");
        self.filter = filter;
        self.notify(&Change::FilterChanged(filter));
    }

    /// Select a sort order.
    pub fn set_sort(&mut self, sort: SortOrder) {
        debug!(sort = %sort, "Sort changed");
        self.sort = sort;
        self.notify(&Change::SortChanged(sort));
    }

    /// Switch panes.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.notify(&Change::TabChanged(tab));
    }

    /// Click a filter button by value or label.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` names no filter.
    pub fn click_filter(&mut self, input: &str) -> Result<()> {
        let mut selected = None;
        self.filter_controls().click(input, |v| selected = Some(v))?;
        if let Some(filter) = selected {
            self.set_filter(filter);
        }
        Ok(())
    }

    /// Click a sort button by value or label.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` names no sort order.
    pub fn click_sort(&mut self, input: &str) -> Result<()> {
        let mut selected = None;
        self.sort_controls().click(input, |v| selected = Some(v))?;
        if let Some(sort) = selected {
            self.set_sort(sort);
        }
        Ok(())
    }

    /// Click a tab by value or label.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` names no tab.
    pub fn click_tab(&mut self, input: &str) -> Result<()> {
        let mut selected = None;
        self.tab_controls().click(input, |v| selected = Some(v))?;
        if let Some(tab) = selected {
            self.set_tab(tab);
        }
        Ok(())
    }

    /// Show or hide an incident's details.
    pub fn toggle_expanded(&mut self, id: IncidentId) -> bool {
        let expanded = self.store.toggle_expanded(id);
        self.notify(&Change::ExpandedToggled(id));
        expanded
    }

    /// Type into the title field.
    pub fn set_form_title(&mut self, value: impl Into<String>) {
        self.form.set_title(value);
        self.notify(&Change::FormChanged);
    }

    /// Type into the description field.
    pub fn set_form_description(&mut self, value: impl Into<String>) {
        self.form.set_description(value);
        self.notify(&Change::FormChanged);
    }

    /// Pick a severity in the form.
    pub fn set_form_severity(&mut self, severity: Severity) {
        self.form.set_severity(severity);
        self.notify(&Change::FormChanged);
    }

    /// Submit the form against this dashboard's store.
    pub fn submit_form(&mut self) -> SubmitOutcome {
        let outcome = self.form.submit(&mut self.store);
        if let SubmitOutcome::Submitted { id, .. } = &outcome {
            self.notify(&Change::IncidentAdded(*id));
        }
        self.notify(&Change::FormChanged);
        outcome
    }

    /// Clear the success notice of `submission` if it is still current.
    pub fn expire_success(&mut self, submission: SubmissionId) -> bool {
        let cleared = self.form.expire_success(submission);
        if cleared {
            self.notify(&Change::FormChanged);
        }
        cleared
    }

    /// Queue a toast.
    pub fn notify_toast(&mut self, draft: ToastDraft) -> ToastId {
        let id = self.toasts.notify(draft);
        self.notify(&Change::ToastsChanged);
        id
    }

    /// Dismiss a toast; unknown ids are ignored.
    pub fn dismiss_toast(&mut self, id: &ToastId) -> bool {
        let removed = self.toasts.dismiss(id);
        if removed {
            self.notify(&Change::ToastsChanged);
        }
        removed
    }
}
