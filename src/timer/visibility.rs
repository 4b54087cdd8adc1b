use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Whether the host window/tab is currently shown to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    #[default]
    Foreground,
    Background,
}

/// The host reports visibility changes here; the timer controller
/// subscribes. Receivers only wake on actual transitions.
#[derive(Debug, Clone)]
pub struct VisibilityNotifier {
    sender: Arc<watch::Sender<Visibility>>,
}

impl Default for VisibilityNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityNotifier {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Visibility::Foreground);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Visibility> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Visibility {
        *self.sender.borrow()
    }

    /// Returns `true` when this call changed the visibility.
    pub fn set(&self, visibility: Visibility) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == visibility {
                false
            } else {
                *current = visibility;
                true
            }
        })
    }
}
