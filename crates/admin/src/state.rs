//! Held collection plus loading/error flags.
//!
//! Every change to `items` builds a new vector and swaps it in, so a
//! snapshot taken before a failed mutation stays equal to the state after.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncState<E> {
    pub items: Vec<E>,
    pub loading: bool,
    /// User-facing message of the last failure, cleared by the next success.
    pub error: Option<String>,
}

impl<E> Default for SyncState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<E: Clone> SyncState<E> {
    pub fn set_items(&mut self, items: Vec<E>) {
        self.items = items;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn find(&self, pred: impl Fn(&E) -> bool) -> Option<&E> {
        self.items.iter().find(|item| pred(item))
    }

    pub fn append(&mut self, item: E) {
        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.extend(self.items.iter().cloned());
        next.push(item);
        self.set_items(next);
    }

    /// Swap in `item` for every held element matching `pred`.
    pub fn replace_where(&mut self, pred: impl Fn(&E) -> bool, item: E) {
        let next = self
            .items
            .iter()
            .map(|e| if pred(e) { item.clone() } else { e.clone() })
            .collect();
        self.set_items(next);
    }

    pub fn remove_where(&mut self, pred: impl Fn(&E) -> bool) {
        let next = self.items.iter().filter(|e| !pred(e)).cloned().collect();
        self.set_items(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_touches_only_matches() {
        let mut state = SyncState::default();
        state.set_items(vec![1, 2, 3]);
        state.replace_where(|n| *n == 2, 20);
        assert_eq!(state.items, vec![1, 20, 3]);
    }

    #[test]
    fn success_clears_previous_error() {
        let mut state: SyncState<i32> = SyncState::default();
        state.fail("boom");
        assert_eq!(state.error.as_deref(), Some("boom"));
        state.append(4);
        assert!(state.error.is_none());
        state.remove_where(|n| *n == 4);
        assert!(state.items.is_empty());
    }
}
