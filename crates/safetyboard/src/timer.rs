//! Cancellable one-shot timer for the form's success notice.
//!
//! Arming the timer replaces any pending expiry, and dropping it aborts the
//! pending task, so an expiry is only ever delivered for the latest
//! submission of a live form.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::form::SubmissionId;

/// Owns at most one pending success-notice expiry.
#[derive(Debug, Default)]
pub struct NoticeTimer {
    pending: Option<(SubmissionId, JoinHandle<()>)>,
}

impl NoticeTimer {
    /// Create an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `submission` on `tx` after `delay`, cancelling any earlier
    /// pending expiry.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(
        &mut self,
        submission: SubmissionId,
        delay: Duration,
        tx: mpsc::UnboundedSender<SubmissionId>,
    ) {
        self.cancel();
        trace!(submission = submission.0, delay_ms = delay.as_millis(), "Arming notice timer");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver may be gone if the shell is shutting down
            let _ = tx.send(submission);
        });
        self.pending = Some((submission, handle));
    }

    /// Abort the pending expiry, if any.
    pub fn cancel(&mut self) {
        if let Some((submission, handle)) = self.pending.take() {
            trace!(submission = submission.0, "Cancelling notice timer");
            handle.abort();
        }
    }

    /// The submission whose expiry is still pending.
    #[must_use]
    pub fn pending(&self) -> Option<SubmissionId> {
        self.pending
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(submission, _)| *submission)
    }
}

impl Drop for NoticeTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = NoticeTimer::new();
        let start = Instant::now();

        timer.arm(SubmissionId(1), Duration::from_millis(3000), tx);

        assert_eq!(rx.recv().await, Some(SubmissionId(1)));
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_cancels_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = NoticeTimer::new();

        timer.arm(SubmissionId(1), Duration::from_millis(3000), tx.clone());
        tokio::time::advance(Duration::from_millis(1000)).await;
        timer.arm(SubmissionId(2), Duration::from_millis(3000), tx.clone());
        assert_eq!(timer.pending(), Some(SubmissionId(2)));

        assert_eq!(rx.recv().await, Some(SubmissionId(2)));

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = NoticeTimer::new();

        timer.arm(SubmissionId(7), Duration::from_millis(3000), tx.clone());
        timer.cancel();
        assert_eq!(timer.pending(), None);

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut timer = NoticeTimer::new();
            timer.arm(SubmissionId(3), Duration::from_millis(3000), tx.clone());
        }

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_new_timer_is_idle() {
        let timer = NoticeTimer::new();
        assert_eq!(timer.pending(), None);
    }
}
