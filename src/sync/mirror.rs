use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory copy of the last completed fetch of a collection.
///
/// Every successful fetch replaces the contents wholesale. Fetches are not
/// sequenced: whichever completes last wins, even if it was issued first.
#[derive(Debug)]
pub struct Mirror<R> {
    state: Arc<RwLock<MirrorSnapshot<R>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSnapshot<R> {
    pub items: Vec<R>,
    /// Filter the items were fetched with, `None` for the full collection
    pub filter: Option<String>,
    /// Number of replacements so far; 0 means never fetched
    pub version: u64,
}

impl<R> Default for MirrorSnapshot<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            filter: None,
            version: 0,
        }
    }
}

impl<R> Clone for Mirror<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R> Default for Mirror<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Mirror<R> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MirrorSnapshot::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MirrorSnapshot<R>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MirrorSnapshot<R>> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn replace(&self, items: Vec<R>, filter: Option<String>) {
        let mut state = self.write();
        state.items = items;
        state.filter = filter;
        state.version += 1;
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.read().version
    }
}

impl<R: Clone> Mirror<R> {
    pub fn items(&self) -> Vec<R> {
        self.read().items.clone()
    }

    pub fn snapshot(&self) -> MirrorSnapshot<R> {
        self.read().clone()
    }
}
