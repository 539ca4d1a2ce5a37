//! The host's URL fragment and its change notification.
//!
//! `MemoryLocation` behaves like `window.location.hash` plus the
//! `hashchange` event: setting a different fragment records it, pushes the
//! old one onto the back stack, and queues exactly one `HashChange`.
//! Setting the current value again queues nothing.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// One fragment change, as delivered to the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashChange {
    pub old: String,
    pub new: String,
}

pub trait Location: Send + Sync {
    /// The fragment without the leading `#` (may be empty).
    fn fragment(&self) -> String;

    /// Sets the fragment; queues a change notification if it differs.
    fn set_fragment(&self, fragment: &str);
}

#[derive(Default)]
struct History {
    fragment: String,
    back: Vec<String>,
    forward: Vec<String>,
}

pub struct MemoryLocation {
    history: Mutex<History>,
    changes: UnboundedSender<HashChange>,
}

impl MemoryLocation {
    /// Creates a location showing `initial` and the receiver its change
    /// notifications arrive on.
    pub fn new(initial: &str) -> (Arc<Self>, UnboundedReceiver<HashChange>) {
        let (tx, rx) = unbounded_channel();
        let location = Arc::new(Self {
            history: Mutex::new(History {
                fragment: strip_hash(initial).to_string(),
                ..History::default()
            }),
            changes: tx,
        });
        (location, rx)
    }

    fn history(&self) -> MutexGuard<'_, History> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, old: String, new: String) {
        debug!("hashchange: {:?} -> {:?}", old, new);
        if self.changes.send(HashChange { old, new }).is_err() {
            warn!("hashchange dropped: no render loop listening");
        }
    }

    /// Browser back button. Returns false when there is nowhere to go.
    pub fn back(&self) -> bool {
        let (old, new) = {
            let mut h = self.history();
            let Some(prev) = h.back.pop() else {
                return false;
            };
            let old = std::mem::replace(&mut h.fragment, prev.clone());
            h.forward.push(old.clone());
            (old, prev)
        };
        self.notify(old, new);
        true
    }

    /// Browser forward button. Returns false when there is nowhere to go.
    pub fn forward(&self) -> bool {
        let (old, new) = {
            let mut h = self.history();
            let Some(next) = h.forward.pop() else {
                return false;
            };
            let old = std::mem::replace(&mut h.fragment, next.clone());
            h.back.push(old.clone());
            (old, next)
        };
        self.notify(old, new);
        true
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        self.history().fragment.clone()
    }

    fn set_fragment(&self, fragment: &str) {
        let fragment = strip_hash(fragment);
        let old = {
            let mut h = self.history();
            if h.fragment == fragment {
                return;
            }
            let old = std::mem::replace(&mut h.fragment, fragment.to_string());
            h.back.push(old.clone());
            h.forward.clear();
            old
        };
        self.notify(old, fragment.to_string());
    }
}

fn strip_hash(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_change_queues_one_event() {
        let (location, mut rx) = MemoryLocation::new("");
        location.set_fragment("/blog");
        location.set_fragment("/login");

        assert_eq!(rx.try_recv().unwrap().new, "/blog");
        let second = rx.try_recv().unwrap();
        assert_eq!(second.old, "/blog");
        assert_eq!(second.new, "/login");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_same_fragment_is_silent() {
        let (location, mut rx) = MemoryLocation::new("#/blog");
        assert_eq!(location.fragment(), "/blog");
        location.set_fragment("/blog");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_back_and_forward() {
        let (location, mut rx) = MemoryLocation::new("/");
        location.set_fragment("/blog");
        location.set_fragment("/post/a");
        while rx.try_recv().is_ok() {}

        assert!(location.back());
        assert_eq!(location.fragment(), "/blog");
        assert_eq!(rx.try_recv().unwrap().new, "/blog");

        assert!(location.forward());
        assert_eq!(location.fragment(), "/post/a");
        assert!(!location.forward());

        location.back();
        location.set_fragment("/login");
        assert!(!location.forward());
    }
}
