//! Transient notification queue.
//!
//! Toasts are independent of incident data. The queue never expires entries
//! by itself; whatever displays them decides when to dismiss.

use std::time::Duration;

use rand::Rng;
use tracing::trace;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// Random identifier of a toast.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToastId(String);

impl ToastId {
    fn random(rng: &mut impl Rng) -> Self {
        let id = (0..ID_LEN)
            .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
            .collect();
        Self(id)
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A toast before it is queued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastDraft {
    /// Headline.
    pub title: Option<String>,
    /// Body text.
    pub description: Option<String>,
    /// How long the display should keep it up.
    pub duration: Option<Duration>,
}

impl ToastDraft {
    /// A toast with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Add body text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A queued toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Identifier used to dismiss it.
    pub id: ToastId,
    /// Headline.
    pub title: Option<String>,
    /// Body text.
    pub description: Option<String>,
    /// How long the display should keep it up.
    pub duration: Option<Duration>,
}

/// Ordered queue of pending toasts.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast under a fresh random id.
    pub fn notify(&mut self, draft: ToastDraft) -> ToastId {
        let mut rng = rand::rng();
        let mut id = ToastId::random(&mut rng);
        while self.contains(&id) {
            id = ToastId::random(&mut rng);
        }
        trace!(id = %id, "Queued toast");
        self.toasts.push(Toast {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            duration: draft.duration,
        });
        id
    }

    /// Remove a toast. Unknown ids are ignored.
    ///
    /// Returns whether anything was removed.
    pub fn dismiss(&mut self, id: &ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| &t.id != id);
        let removed = self.toasts.len() != before;
        if removed {
            trace!(id = %id, "Dismissed toast");
        }
        removed
    }

    /// Whether a toast with this id is queued.
    #[must_use]
    pub fn contains(&self, id: &ToastId) -> bool {
        self.toasts.iter().any(|t| &t.id == id)
    }

    /// Pending toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Number of pending toasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Whether no toasts are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_notify_appends_in_order() {
        let mut queue = ToastQueue::new();
        let a = queue.notify(ToastDraft::titled("first"));
        let b = queue.notify(ToastDraft::titled("second").with_description("body"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.toasts()[0].id, a);
        assert_eq!(queue.toasts()[1].id, b);
        assert_eq!(queue.toasts()[1].description.as_deref(), Some("body"));
    }

    #[test]
    fn test_id_format() {
        let mut queue = ToastQueue::new();
        let id = queue.notify(ToastDraft::default());
        assert_eq!(id.as_str().len(), 9);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut queue = ToastQueue::new();
        let ids: HashSet<ToastId> = (0..500)
            .map(|_| queue.notify(ToastDraft::default()))
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_dismiss() {
        let mut queue = ToastQueue::new();
        let a = queue.notify(ToastDraft::titled("a"));
        let b = queue.notify(ToastDraft::titled("b"));

        assert!(queue.dismiss(&a));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.toasts()[0].id, b);
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut queue = ToastQueue::new();
        let a = queue.notify(ToastDraft::titled("a"));

        assert!(queue.dismiss(&a));
        assert!(!queue.dismiss(&a));
        assert!(!queue.dismiss(&ToastId::from("nope")));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duration_is_carried() {
        let mut queue = ToastQueue::new();
        queue.notify(ToastDraft {
            duration: Some(Duration::from_secs(5)),
            ..ToastDraft::default()
        });
        assert_eq!(queue.toasts()[0].duration, Some(Duration::from_secs(5)));
    }
}
