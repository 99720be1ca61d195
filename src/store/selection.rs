//! Pure state transitions for the active client and the recent-clients list.

use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::types::ClientId;

/// Upper bound on the quick-switch list.
pub const MAX_RECENT_CLIENTS: usize = 5;

/// Active client plus most-recent-first list of previously selected clients.
///
/// `recent_clients` holds at most [`MAX_RECENT_CLIENTS`] entries, unique by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSelection {
    active_client: Option<Client>,
    recent_clients: Vec<Client>,
}

impl ClientSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a selection from persisted parts, restoring the invariants.
    ///
    /// Duplicate ids keep their first occurrence, the list is truncated and
    /// the active client, when present, is moved to the head.
    pub fn restore(active_client: Option<Client>, recent_clients: Vec<Client>) -> Self {
        let mut unique: Vec<Client> = Vec::with_capacity(MAX_RECENT_CLIENTS);
        for client in recent_clients {
            if unique.iter().all(|c| c.id != client.id) {
                unique.push(client);
            }
        }
        unique.truncate(MAX_RECENT_CLIENTS);

        let mut selection = Self {
            active_client: None,
            recent_clients: unique,
        };
        if let Some(active) = active_client {
            selection.select(active);
        }
        selection
    }

    pub fn active_client(&self) -> Option<&Client> {
        self.active_client.as_ref()
    }

    pub fn recent_clients(&self) -> &[Client] {
        &self.recent_clients
    }

    pub fn is_active(&self, id: &ClientId) -> bool {
        self.active_client.as_ref().is_some_and(|c| &c.id == id)
    }

    /// Makes `client` active and moves it to the head of the recent list.
    pub fn select(&mut self, client: Client) {
        self.recent_clients.retain(|c| c.id != client.id);
        self.recent_clients.insert(0, client.clone());
        self.recent_clients.truncate(MAX_RECENT_CLIENTS);
        self.active_client = Some(client);
    }

    /// Drops the active client; the recent list is left as is.
    pub fn clear(&mut self) {
        self.active_client = None;
    }

    /// Replaces every copy of `client` (matched by id) with the new value.
    ///
    /// Returns `true` when the selection referenced the client.
    pub fn apply_update(&mut self, client: &Client) -> bool {
        let mut touched = false;
        if let Some(active) = self.active_client.as_mut().filter(|c| c.id == client.id) {
            *active = client.clone();
            touched = true;
        }
        for recent in self.recent_clients.iter_mut().filter(|c| c.id == client.id) {
            *recent = client.clone();
            touched = true;
        }
        touched
    }

    /// Forgets a deleted client, clearing it if it was active.
    ///
    /// Returns `true` when the selection referenced the client.
    pub fn apply_removal(&mut self, id: &ClientId) -> bool {
        let was_active = self.is_active(id);
        if was_active {
            self.active_client = None;
        }
        let before = self.recent_clients.len();
        self.recent_clients.retain(|c| &c.id != id);
        was_active || before != self.recent_clients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{ClientStatus, ClientType};
    use chrono::NaiveDateTime;

    fn client(id: &str) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            name: format!("Client {id}"),
            cnpj: String::new(),
            client_type: ClientType::Private,
            status: ClientStatus::Active,
            segment: String::new(),
            address: None,
            city: None,
            state: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            user_roles: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn ids(selection: &ClientSelection) -> Vec<&str> {
        selection
            .recent_clients()
            .iter()
            .map(|c| c.id.as_str())
            .collect()
    }

    #[test]
    fn reselecting_moves_client_to_front() {
        let mut selection = ClientSelection::new();
        selection.select(client("1"));
        selection.select(client("2"));
        selection.select(client("3"));
        selection.select(client("1"));

        assert_eq!(ids(&selection), vec!["1", "3", "2"]);
        assert_eq!(selection.active_client().unwrap().id.as_str(), "1");
    }

    #[test]
    fn recent_list_is_bounded_and_unique() {
        let mut selection = ClientSelection::new();
        for round in 0..3 {
            for i in 0..8 {
                selection.select(client(&((i * 7 + round) % 9).to_string()));
                let recents = ids(&selection);
                assert!(recents.len() <= MAX_RECENT_CLIENTS);
                let mut dedup = recents.clone();
                dedup.sort_unstable();
                dedup.dedup();
                assert_eq!(dedup.len(), recents.len());
                assert_eq!(recents[0], selection.active_client().unwrap().id.as_str());
            }
        }
    }

    #[test]
    fn clear_keeps_recents() {
        let mut selection = ClientSelection::new();
        selection.select(client("1"));
        selection.select(client("2"));
        let before = selection.recent_clients().to_vec();

        selection.clear();

        assert!(selection.active_client().is_none());
        assert_eq!(selection.recent_clients(), before.as_slice());
    }

    #[test]
    fn update_patches_active_and_recent_copies() {
        let mut selection = ClientSelection::new();
        selection.select(client("1"));
        selection.select(client("2"));

        let mut renamed = client("1");
        renamed.name = "Renamed".into();
        assert!(selection.apply_update(&renamed));

        assert_eq!(selection.recent_clients()[1].name, "Renamed");
        assert_eq!(selection.active_client().unwrap().id.as_str(), "2");
        assert!(!selection.apply_update(&client("9")));
    }

    #[test]
    fn removal_clears_active_and_drops_recent_entry() {
        let mut selection = ClientSelection::new();
        selection.select(client("1"));
        selection.select(client("2"));

        assert!(selection.apply_removal(&ClientId::new("2").unwrap()));

        assert!(selection.active_client().is_none());
        assert_eq!(ids(&selection), vec!["1"]);
        assert!(!selection.apply_removal(&ClientId::new("7").unwrap()));
    }

    #[test]
    fn restore_dedups_truncates_and_heads_active() {
        let recents = vec![
            client("1"),
            client("2"),
            client("1"),
            client("3"),
            client("4"),
            client("5"),
            client("6"),
        ];
        let selection = ClientSelection::restore(Some(client("4")), recents);

        assert_eq!(ids(&selection), vec!["4", "1", "2", "3", "5"]);
        assert_eq!(selection.active_client().unwrap().id.as_str(), "4");
    }
}
