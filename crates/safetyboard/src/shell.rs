//! Interactive line-based front end.
//!
//! The shell stands in for the browser: each input line is one user action
//! (a click, an input change, a submit). The shell subscribes to its
//! dashboard and re-renders the active pane whenever a mutation reports a
//! change. Success-notice expiries and toast expiries arrive on channels and
//! are handled between input lines.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::dashboard::{Change, Dashboard, Tab};
use crate::error::{Error, Result};
use crate::form::{SubmissionId, SubmitOutcome};
use crate::incident::{IncidentId, Severity};
use crate::render::{self, RenderStyle};
use crate::timer::NoticeTimer;
use crate::toast::{ToastDraft, ToastId};

/// How long a toast raised by the shell stays up.
const TOAST_DURATION: Duration = Duration::from_secs(5);

const HELP: &str = "\
Commands:
  list                          show the incident list
  filter <All|Low|Medium|High>  filter by severity
  sort <newest|oldest>          sort by report date
  toggle <id>                   show or hide an incident's description
  tab <incidents|report>        switch panes
  title <text>                  set the form title
  description <text>            set the form description
  severity <Low|Medium|High>    set the form severity
  submit                        submit the form
  form                          show the form
  toasts                        list pending notifications
  dismiss <id>                  dismiss a notification
  help                          show this help
  quit                          leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line.
    Empty,
    /// Render the incident list.
    List,
    /// Click a filter button.
    Filter(String),
    /// Click a sort button.
    Sort(String),
    /// Toggle an incident's details.
    Toggle(IncidentId),
    /// Click a tab.
    Tab(String),
    /// Set the form title.
    Title(String),
    /// Set the form description.
    Description(String),
    /// Set the form severity.
    Severity(Severity),
    /// Submit the form.
    Submit,
    /// Render the form.
    Form,
    /// List pending toasts.
    Toasts,
    /// Dismiss a toast.
    Dismiss(ToastId),
    /// Print help.
    Help,
    /// Leave the shell.
    Quit,
}

fn required<'a>(command: &'static str, rest: &'a str, what: &str) -> Result<&'a str> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(Error::invalid_argument(command, format!("expected {what}")))
    } else {
        Ok(rest)
    }
}

impl ShellCommand {
    /// Parse one input line.
    ///
    /// Text after `title` and `description` is taken verbatim so blank and
    /// whitespace-only input reaches the form's validation.
    ///
    /// # Errors
    ///
    /// Returns an input error for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_start();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line.trim_end(), ""));

        let command = match name.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "list" | "ls" => Self::List,
            "filter" => Self::Filter(required("filter", rest, "a severity")?.to_string()),
            "sort" => Self::Sort(required("sort", rest, "newest or oldest")?.to_string()),
            "toggle" => Self::Toggle(required("toggle", rest, "an incident id")?.parse()?),
            "tab" => Self::Tab(required("tab", rest, "incidents or report")?.to_string()),
            "title" => Self::Title(rest.to_string()),
            "description" | "desc" => Self::Description(rest.to_string()),
            "severity" => Self::Severity(required("severity", rest, "a severity")?.parse()?),
            "submit" => Self::Submit,
            "form" => Self::Form,
            "toasts" => Self::Toasts,
            "dismiss" => Self::Dismiss(ToastId::from(required("dismiss", rest, "a toast id")?)),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(Error::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

/// Whether the shell keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Quit,
}

/// The interactive shell, writing views to `out`.
pub struct Shell<W: Write> {
    dashboard: Dashboard,
    style: RenderStyle,
    success_notice: Duration,
    timer: NoticeTimer,
    expiry_tx: mpsc::UnboundedSender<SubmissionId>,
    expiry_rx: Option<mpsc::UnboundedReceiver<SubmissionId>>,
    toast_tx: mpsc::UnboundedSender<ToastId>,
    toast_rx: Option<mpsc::UnboundedReceiver<ToastId>>,
    changes: Rc<RefCell<Vec<Change>>>,
    out: W,
}

impl<W: Write> std::fmt::Debug for Shell<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("dashboard", &self.dashboard)
            .field("style", &self.style)
            .field("success_notice", &self.success_notice)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Shell<W> {
    /// Create a shell around `dashboard`.
    #[must_use]
    pub fn new(mut dashboard: Dashboard, style: RenderStyle, success_notice: Duration, out: W) -> Self {
        let changes: Rc<RefCell<Vec<Change>>> = Rc::default();
        let sink = Rc::clone(&changes);
        dashboard.subscribe(move |change, _| sink.borrow_mut().push(change.clone()));

        let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
        let (toast_tx, toast_rx) = mpsc::unbounded_channel();
        Self {
            dashboard,
            style,
            success_notice,
            timer: NoticeTimer::new(),
            expiry_tx,
            expiry_rx: Some(expiry_rx),
            toast_tx,
            toast_rx: Some(toast_rx),
            changes,
            out,
        }
    }

    /// Create a shell as configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured seed data can't be loaded.
    pub fn from_config(config: &Config, out: W) -> Result<Self> {
        Ok(Self::new(
            Dashboard::from_config(config)?,
            RenderStyle::from(&config.display),
            config.success_notice(),
            out,
        ))
    }

    /// The dashboard being driven.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// The output sink.
    #[must_use]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut expiry_rx = self
            .expiry_rx
            .take()
            .ok_or_else(|| Error::internal("shell is already running"))?;
        let mut toast_rx = self
            .toast_rx
            .take()
            .ok_or_else(|| Error::internal("shell is already running"))?;
        let mut lines = input.lines();

        self.render_pane()?;
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                Some(submission) = expiry_rx.recv() => {
                    self.dashboard.expire_success(submission);
                    self.flush_changes()?;
                }
                Some(id) = toast_rx.recv() => {
                    self.dashboard.dismiss_toast(&id);
                    self.changes.borrow_mut().clear();
                }
            }
        }

        self.timer.cancel();
        self.out.flush()?;
        Ok(())
    }

    /// Parse and execute one line, reporting input errors to the output.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing output fails.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let result = ShellCommand::parse(line).and_then(|cmd| self.execute(cmd));
        match result {
            Ok(flow) => {
                self.flush_changes()?;
                Ok(flow)
            }
            Err(e) if e.is_input_error() => {
                debug!(error = %e, "Rejected shell input");
                writeln!(self.out, "error: {e}")?;
                Ok(Flow::Continue)
            }
            Err(e) => Err(e),
        }
    }

    fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::List => {
                self.dashboard.set_tab(Tab::Incidents);
            }
            ShellCommand::Filter(value) => self.dashboard.click_filter(&value)?,
            ShellCommand::Sort(value) => self.dashboard.click_sort(&value)?,
            ShellCommand::Toggle(id) => {
                self.dashboard.toggle_expanded(id);
            }
            ShellCommand::Tab(value) => self.dashboard.click_tab(&value)?,
            ShellCommand::Title(text) => self.dashboard.set_form_title(text),
            ShellCommand::Description(text) => self.dashboard.set_form_description(text),
            ShellCommand::Severity(severity) => self.dashboard.set_form_severity(severity),
            ShellCommand::Submit => self.submit(),
            ShellCommand::Form => {
                self.dashboard.set_tab(Tab::Report);
            }
            ShellCommand::Toasts => {
                let toasts = self.dashboard.toasts().toasts();
                if toasts.is_empty() {
                    writeln!(self.out, "No notifications.")?;
                } else {
                    for toast in toasts {
                        writeln!(
                            self.out,
                            "{}  {}",
                            toast.id,
                            toast.title.as_deref().unwrap_or("")
                        )?;
                    }
                }
            }
            ShellCommand::Dismiss(id) => {
                if !self.dashboard.dismiss_toast(&id) {
                    debug!(id = %id, "Dismiss of unknown toast ignored");
                }
            }
            ShellCommand::Help => writeln!(self.out, "{HELP}")?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self) {
        self.dashboard.set_tab(Tab::Report);
        match self.dashboard.submit_form() {
            SubmitOutcome::Submitted { id, submission } => {
                self.timer
                    .arm(submission, self.success_notice, self.expiry_tx.clone());
                let toast = ToastDraft {
                    duration: Some(TOAST_DURATION),
                    ..ToastDraft::titled("Incident reported")
                        .with_description(format!("#{id} added to the dashboard"))
                };
                self.raise_toast(toast);
            }
            SubmitOutcome::Invalid(errors) => {
                // Inline errors are rendered with the form
                debug!(fields = errors.len(), "Submit rejected");
                self.timer.cancel();
            }
        }
    }

    fn raise_toast(&mut self, draft: ToastDraft) {
        let duration = draft.duration;
        let id = self.dashboard.notify_toast(draft);
        if let Some(delay) = duration {
            let tx = self.toast_tx.clone();
            let expiring = id.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(expiring);
            });
        }
    }

    fn flush_changes(&mut self) -> Result<()> {
        let changes: Vec<Change> = self.changes.borrow_mut().drain(..).collect();
        if changes.is_empty() {
            return Ok(());
        }

        if changes.iter().any(|c| !matches!(c, Change::ToastsChanged)) {
            self.render_pane()?;
        }
        if changes.iter().any(|c| matches!(c, Change::ToastsChanged)) {
            write!(
                self.out,
                "{}",
                render::render_toasts(self.dashboard.toasts().toasts())
            )?;
        }
        Ok(())
    }

    fn render_pane(&mut self) -> Result<()> {
        let color = self.style.color;
        writeln!(self.out, "{}", self.dashboard.tab_controls().render(color))?;
        match self.dashboard.tab() {
            Tab::Incidents => {
                writeln!(self.out, "{}", self.dashboard.filter_controls().render(color))?;
                writeln!(self.out, "{}", self.dashboard.sort_controls().render(color))?;
                writeln!(self.out)?;
                let visible = self.dashboard.visible();
                let list = render::render_incident_list(
                    &visible,
                    self.dashboard.store().expanded(),
                    &self.style,
                );
                write!(self.out, "{list}")?;
            }
            Tab::Report => {
                writeln!(self.out)?;
                write!(self.out, "{}", render::render_form(self.dashboard.form(), &self.style))?;
            }
        }
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "Failed to flush output");
        }
        Ok(())
    }
}
