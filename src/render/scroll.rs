//! Latest-wins scroll requests.
//!
//! Renders can outpace the viewport. Only the newest target matters, so
//! requests go through a watch channel and intermediate ones are dropped.

use crate::render::tree::RenderTree;
use tokio::sync::watch;

/// Bring `sentence` into view, centred in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub sentence: usize,
    pub smooth: bool,
}

impl ScrollRequest {
    /// Smooth, centred scroll to `sentence`.
    pub fn centered(sentence: usize) -> Self {
        Self {
            sentence,
            smooth: true,
        }
    }
}

#[derive(Debug)]
pub struct ScrollScheduler {
    tx: watch::Sender<Option<ScrollRequest>>,
}

impl Default for ScrollScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollScheduler {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Request a scroll to the tree's target. Returns true if this replaced
    /// the pending request.
    ///
    /// A tree without a target, or with the same target as the pending
    /// request, changes nothing.
    pub fn schedule(&self, tree: &RenderTree) -> bool {
        let Some(sentence) = tree.scroll_target else {
            return false;
        };
        let request = ScrollRequest::centered(sentence);
        self.tx.send_if_modified(|pending| {
            if *pending == Some(request) {
                false
            } else {
                *pending = Some(request);
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ScrollRequest>> {
        self.tx.subscribe()
    }

    /// Most recent request, if any was made.
    pub fn latest(&self) -> Option<ScrollRequest> {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tree::RenderMode;

    fn tree(target: Option<usize>) -> RenderTree {
        RenderTree {
            mode: RenderMode::Active,
            nodes: Vec::new(),
            scroll_target: target,
        }
    }

    #[test]
    fn passive_tree_schedules_nothing() {
        let scheduler = ScrollScheduler::new();
        assert!(!scheduler.schedule(&tree(None)));
        assert_eq!(scheduler.latest(), None);
    }

    #[test]
    fn repeated_target_is_not_rescheduled() {
        let scheduler = ScrollScheduler::new();
        assert!(scheduler.schedule(&tree(Some(2))));
        assert!(!scheduler.schedule(&tree(Some(2))));
        assert_eq!(scheduler.latest(), Some(ScrollRequest::centered(2)));
    }

    #[tokio::test]
    async fn subscriber_sees_only_latest_request() {
        let scheduler = ScrollScheduler::new();
        let mut rx = scheduler.subscribe();
        scheduler.schedule(&tree(Some(1)));
        scheduler.schedule(&tree(Some(2)));
        scheduler.schedule(&tree(Some(3)));

        rx.changed().await.unwrap();
        let request = *rx.borrow_and_update();
        assert_eq!(request, Some(ScrollRequest::centered(3)));
        assert!(!rx.has_changed().unwrap());
    }
}
