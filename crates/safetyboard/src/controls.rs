//! Stateless selection controls (filter, sort, tabs).
//!
//! A control renders one button per value, marks the active one, and on a
//! click hands the chosen value to a caller-supplied callback. It keeps no
//! state of its own; the parent owns the active value.

use std::str::FromStr;

use colored::Colorize;

use crate::error::{Error, Result};
use crate::view::{SeverityFilter, SortOrder};

/// An enum a control can offer as buttons.
pub trait Choice: Copy + Eq + FromStr<Err = Error> + 'static {
    /// Every value, in button order.
    const ALL: &'static [Self];

    /// Caption shown before the buttons.
    const HEADING: &'static str;

    /// Button text for a value.
    fn button_label(self) -> &'static str;
}

impl Choice for SeverityFilter {
    const ALL: &'static [Self] = &[Self::All, Self::Low, Self::Medium, Self::High];
    const HEADING: &'static str = "Filter by Severity:";

    fn button_label(self) -> &'static str {
        self.as_str()
    }
}

impl Choice for SortOrder {
    const ALL: &'static [Self] = &[Self::Newest, Self::Oldest];
    const HEADING: &'static str = "Sort by Date:";

    fn button_label(self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::Oldest => "Oldest First",
        }
    }
}

/// One rendered button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button<T> {
    /// Value selected by clicking it.
    pub value: T,
    /// Text on the button.
    pub label: &'static str,
    /// Whether this is the current value.
    pub active: bool,
}

/// A row of buttons for a [`Choice`].
#[derive(Debug, Clone, Copy)]
pub struct Controls<T: Choice> {
    active: T,
}

impl<T: Choice> Controls<T> {
    /// Controls showing `active` as selected.
    #[must_use]
    pub fn new(active: T) -> Self {
        Self { active }
    }

    /// The buttons, in order.
    #[must_use]
    pub fn buttons(&self) -> Vec<Button<T>> {
        T::ALL
            .iter()
            .map(|&value| Button {
                value,
                label: value.button_label(),
                active: value == self.active,
            })
            .collect()
    }

    /// Click the button matching `input` and pass its value to `on_change`.
    ///
    /// `input` may be a value identifier (`high`, `oldest`) or a button label.
    ///
    /// # Errors
    ///
    /// Returns an error, without calling `on_change`, if nothing matches.
    pub fn click(&self, input: &str, on_change: impl FnOnce(T)) -> Result<()> {
        let value = T::ALL
            .iter()
            .copied()
            .find(|v| v.button_label().eq_ignore_ascii_case(input.trim()))
            .map_or_else(|| input.parse::<T>(), Ok)?;
        on_change(value);
        Ok(())
    }

    /// Render as one line: heading then buttons, active one bracketed.
    #[must_use]
    pub fn render(&self, color: bool) -> String {
        let buttons: Vec<String> = self
            .buttons()
            .into_iter()
            .map(|b| {
                if !b.active {
                    format!(" {} ", b.label)
                } else if color {
                    format!("[{}]", b.label.bold())
                } else {
                    format!("[{}]", b.label)
                }
            })
            .collect();
        format!("{} {}", T::HEADING, buttons.join(" "))
    }
}
