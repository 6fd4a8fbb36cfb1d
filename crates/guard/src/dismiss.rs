//! Banner auto-dismiss timers.
//!
//! One one-shot task per banner present at initialization, all with the
//! same fixed delay. Timers are never cancelled: a banner the user already
//! dismissed, or one without a dismiss affordance, makes the late firing a
//! quiet no-op. Banners added after initialization are not covered.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::document::Document;

/// Handle over the spawned auto-dismiss tasks.
///
/// Dropping the handle detaches the tasks; they keep running. Tests (and
/// hosts that drain on shutdown) can [`join`](AutoDismiss::join) instead.
#[derive(Debug)]
pub struct AutoDismiss {
    handles: Vec<JoinHandle<()>>,
}

impl AutoDismiss {
    /// Number of scheduled timers.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no timers were scheduled.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every timer to fire.
    pub async fn join(self) {
        for handle in self.handles {
            // A task only panics if dismissal itself panics, which it cannot.
            let _ = handle.await;
        }
    }
}

/// Schedule one dismiss timer per banner currently in the document.
pub(crate) fn schedule(document: &Document, delay: Duration) -> AutoDismiss {
    let count = document.banner_count();
    let mut handles = Vec::with_capacity(count);

    for index in 0..count {
        let document = document.clone();
        handles.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if document.dismiss_banner(index) {
                info!(banner = index, "auto-dismissed banner");
            } else {
                debug!(banner = index, "auto-dismiss was a no-op");
            }
        }));
    }

    if count > 0 {
        debug!(banners = count, delay_ms = delay.as_millis() as u64, "scheduled auto-dismiss");
    }

    AutoDismiss { handles }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::document::{Banner, Severity};

    #[tokio::test(start_paused = true)]
    async fn test_banners_dismissed_after_delay() {
        let doc = Document::builder()
            .banner(Banner::new(Severity::Success, "uploaded"))
            .banner(Banner::new(Severity::Warning, "slow OCR"))
            .build()
            .unwrap();

        let timers = schedule(&doc, Duration::from_millis(5000));
        assert_eq!(timers.len(), 2);

        tokio::time::advance(Duration::from_millis(5001)).await;
        timers.join().await;

        assert!(doc.visible_banners().is_empty());
        assert!(doc.banner(0).unwrap().dismissed);
        assert!(doc.banner(1).unwrap().dismissed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_dismissible_banner_untouched() {
        let doc = Document::builder()
            .banner(Banner::new(Severity::Error, "evaluation failed").not_dismissible())
            .build()
            .unwrap();

        let timers = schedule(&doc, Duration::from_millis(5000));
        tokio::time::advance(Duration::from_millis(6000)).await;
        timers.join().await;

        let banner = doc.banner(0).unwrap();
        assert!(!banner.dismissed);
        assert_eq!(doc.visible_banners().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_dismissal_wins_quietly() {
        let doc = Document::builder()
            .banner(Banner::new(Severity::Info, "welcome back"))
            .build()
            .unwrap();

        let timers = schedule(&doc, Duration::from_millis(5000));

        // User clicks the affordance before the timer fires.
        assert!(doc.dismiss_banner(0));

        tokio::time::advance(Duration::from_millis(5001)).await;
        timers.join().await;

        assert!(doc.banner(0).unwrap().dismissed);
    }

    #[tokio::test]
    async fn test_no_banners_no_timers() {
        let doc = Document::builder().build().unwrap();
        let timers = schedule(&doc, Duration::from_millis(1));
        assert!(timers.is_empty());
        timers.join().await;
    }
}
