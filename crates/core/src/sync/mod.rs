//! Reconciliation between the shareable (ephemeral) preview URL and the
//! durable one kept in storage.
//!
//! Nothing here observes or mutates hidden state: each function takes the
//! current pair and returns the pair the caller should adopt. It runs once
//! when a session opens and again on each explicit user edit.

pub mod query;

use serde::{Deserialize, Serialize};

/// The URL previewed when neither the link nor storage names one.
pub const DEFAULT_URL: &str = "https://kibalabs.com";

/// The two copies of the preview URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlState {
    /// From the navigable location (the `url` query parameter).
    pub ephemeral: Option<String>,
    /// From storage (`url_v1`).
    pub durable: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlSyncState {
    /// Neither copy is set.
    Unset,
    /// Only storage has a value; the location has not picked it up yet.
    DurableOnly,
    /// Only the location has a value; storage has not recorded it yet.
    EphemeralOnly,
    /// Both set, to different URLs.
    Diverged,
    /// Both set and equal.
    Synced,
}

impl UrlState {
    pub fn new(ephemeral: Option<String>, durable: Option<String>) -> Self {
        Self {
            ephemeral: non_empty(ephemeral),
            durable: non_empty(durable),
        }
    }

    pub fn sync_state(&self) -> UrlSyncState {
        match (&self.ephemeral, &self.durable) {
            (None, None) => UrlSyncState::Unset,
            (None, Some(_)) => UrlSyncState::DurableOnly,
            (Some(_), None) => UrlSyncState::EphemeralOnly,
            (Some(e), Some(d)) if e == d => UrlSyncState::Synced,
            (Some(_), Some(_)) => UrlSyncState::Diverged,
        }
    }

    /// The URL to preview right now.
    pub fn current(&self) -> Option<&str> {
        self.ephemeral.as_deref().or(self.durable.as_deref())
    }

    fn synced(url: String) -> Self {
        Self {
            ephemeral: Some(url.clone()),
            durable: Some(url),
        }
    }
}

/// Settle the pair when a session opens.
///
/// - storage only: the location adopts the stored URL;
/// - nothing at all: both become `default_url`;
/// - a link URL with nothing stored: storage records it;
/// - both set but different: storage wins. A link only replaces the stored
///   URL through an explicit edit.
///
/// Always ends [`UrlSyncState::Synced`]; a pair already synced comes back
/// unchanged.
pub fn reconcile_on_init(state: &UrlState, default_url: &str) -> UrlState {
    let state = UrlState::new(state.ephemeral.clone(), state.durable.clone());
    match state.sync_state() {
        UrlSyncState::Synced => state,
        UrlSyncState::Unset => UrlState::synced(default_url.to_string()),
        UrlSyncState::DurableOnly | UrlSyncState::Diverged => {
            UrlState::synced(state.durable.unwrap_or_default())
        }
        UrlSyncState::EphemeralOnly => UrlState::synced(state.ephemeral.unwrap_or_default()),
    }
}

/// Settle the pair after the user submits `new_url`: it wins everywhere.
///
/// An empty submission is ignored.
pub fn reconcile_on_edit(state: &UrlState, new_url: &str) -> UrlState {
    let trimmed = new_url.trim();
    if trimmed.is_empty() {
        return state.clone();
    }
    UrlState::synced(trimmed.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(ephemeral: Option<&str>, durable: Option<&str>) -> UrlState {
        UrlState::new(ephemeral.map(String::from), durable.map(String::from))
    }

    #[test]
    fn classifies_states() {
        assert_eq!(state(None, None).sync_state(), UrlSyncState::Unset);
        assert_eq!(state(None, Some("a")).sync_state(), UrlSyncState::DurableOnly);
        assert_eq!(state(Some("a"), None).sync_state(), UrlSyncState::EphemeralOnly);
        assert_eq!(state(Some("a"), Some("b")).sync_state(), UrlSyncState::Diverged);
        assert_eq!(state(Some("a"), Some("a")).sync_state(), UrlSyncState::Synced);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        assert_eq!(state(Some(""), Some("  ")).sync_state(), UrlSyncState::Unset);
    }

    #[test]
    fn durable_fills_absent_ephemeral() {
        let next = reconcile_on_init(&state(None, Some("https://stored.test")), DEFAULT_URL);
        assert_eq!(next, state(Some("https://stored.test"), Some("https://stored.test")));
    }

    #[test]
    fn unset_gets_default_in_both() {
        let next = reconcile_on_init(&UrlState::default(), DEFAULT_URL);
        assert_eq!(next, state(Some(DEFAULT_URL), Some(DEFAULT_URL)));
        assert_eq!(next.sync_state(), UrlSyncState::Synced);
    }

    #[test]
    fn stored_url_beats_link_at_init() {
        let next = reconcile_on_init(
            &state(Some("https://shared.test"), Some("https://old.test")),
            DEFAULT_URL,
        );
        assert_eq!(next, state(Some("https://old.test"), Some("https://old.test")));
    }

    #[test]
    fn link_is_recorded_when_nothing_stored() {
        let next = reconcile_on_init(&state(Some("https://shared.test"), None), DEFAULT_URL);
        assert_eq!(next, state(Some("https://shared.test"), Some("https://shared.test")));
    }

    #[test]
    fn synced_is_left_alone() {
        let synced = state(Some("https://a.test"), Some("https://a.test"));
        assert_eq!(reconcile_on_init(&synced, DEFAULT_URL), synced);
    }

    #[test]
    fn edit_wins_everywhere() {
        let next = reconcile_on_edit(&state(Some("a"), Some("a")), " https://new.test ");
        assert_eq!(next, state(Some("https://new.test"), Some("https://new.test")));
    }

    #[test]
    fn blank_edit_is_ignored() {
        let before = state(Some("a"), Some("a"));
        assert_eq!(reconcile_on_edit(&before, "   "), before);
    }

    #[test]
    fn current_prefers_ephemeral() {
        assert_eq!(state(Some("e"), Some("d")).current(), Some("e"));
        assert_eq!(state(None, Some("d")).current(), Some("d"));
        assert_eq!(state(None, None).current(), None);
    }
}
