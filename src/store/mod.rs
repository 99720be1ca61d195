//! Active client selection store.
//!
//! A [`ClientStore`] is assembled per request from the client repository, the
//! storage holding the persisted [`SelectionRecord`] and a [`Notifier`].
//! Transitions are delegated to the pure [`ClientSelection`] and persisted
//! afterwards; persistence failures are reported, never propagated.

use std::slice;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::permissions::{Capabilities, ClientPermissions};
use crate::domain::types::ClientId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientReader, ClientWriter};

pub mod notify;
pub mod selection;
#[cfg(feature = "server")]
pub mod session;
pub mod storage;

pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier};
pub use selection::{ClientSelection, MAX_RECENT_CLIENTS};
pub use storage::{
    MemoryStorage, STORE_NAME, STORE_VERSION, SelectionRecord, SelectionStorage, StorageError,
};

pub struct ClientStore<'a, R: ?Sized, S, N> {
    repo: &'a R,
    storage: S,
    notifier: N,
    selection: ClientSelection,
}

impl<'a, R, S, N> ClientStore<'a, R, S, N>
where
    R: ClientReader + ClientWriter + ?Sized,
    S: SelectionStorage,
    N: Notifier,
{
    /// Loads the persisted selection, falling back to an empty one when the
    /// stored record cannot be used.
    ///
    /// An unusable record is overwritten with the empty selection so the
    /// warning is raised once, not on every request.
    pub fn open(repo: &'a R, storage: S, notifier: N) -> Self {
        let selection = match load_selection(repo, &storage) {
            Ok(selection) => selection,
            Err(err) => {
                log::warn!("Discarding stored client selection: {err}");
                notifier.notify(
                    Notification::new(
                        NotificationLevel::Warning,
                        "Seleção de cliente descartada",
                    )
                    .description("Não foi possível restaurar o cliente ativo anterior."),
                );
                let selection = ClientSelection::default();
                let reset = SelectionRecord::from_selection(&selection)
                    .to_value()
                    .and_then(|value| storage.save(value));
                if let Err(err) = reset {
                    log::warn!("Failed to reset stored client selection: {err}");
                }
                selection
            }
        };

        Self {
            repo,
            storage,
            notifier,
            selection,
        }
    }

    pub fn repository(&self) -> &'a R {
        self.repo
    }

    pub fn selection(&self) -> &ClientSelection {
        &self.selection
    }

    pub fn active_client(&self) -> Option<&Client> {
        self.selection.active_client()
    }

    pub fn recent_clients(&self) -> &[Client] {
        self.selection.recent_clients()
    }

    pub fn into_selection(self) -> ClientSelection {
        self.selection
    }

    /// Permission flags for the active client.
    pub fn permissions(&self, capabilities: Option<&Capabilities>) -> ClientPermissions {
        ClientPermissions::resolve(self.selection.active_client(), capabilities)
    }

    /// Makes `client` active; `None` behaves like [`Self::clear_active_client`].
    pub fn set_active_client(&mut self, client: Option<Client>) {
        let Some(client) = client else {
            self.clear_active_client();
            return;
        };

        let description = format!("{} ({}) é o cliente ativo.", client.name, client.cnpj);
        log::info!("Active client set to {}", client.id);
        self.selection.select(client);
        self.notifier.notify(
            Notification::new(NotificationLevel::Success, "Cliente selecionado")
                .description(description),
        );
        self.persist();
    }

    pub fn clear_active_client(&mut self) {
        self.selection.clear();
        log::info!("Active client cleared");
        self.notifier.notify(
            Notification::new(NotificationLevel::Info, "Seleção de cliente removida")
                .description("Nenhum cliente ativo."),
        );
        self.persist();
    }

    /// Looks the client up and makes it active.
    pub fn select_client(&mut self, id: &ClientId) -> RepositoryResult<Client> {
        let client = self
            .repo
            .get_client_by_id(id)?
            .ok_or(RepositoryError::NotFound)?;
        self.set_active_client(Some(client.clone()));
        Ok(client)
    }

    pub fn add_client(&mut self, new_client: &NewClient) -> RepositoryResult<Client> {
        self.repo
            .create_clients(slice::from_ref(new_client))?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Unexpected("client was not created".to_string()))
    }

    /// Updates the stored client and every copy held by the selection.
    pub fn update_client(
        &mut self,
        id: &ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        let updated = self.repo.update_client(id, updates)?;
        self.selection.apply_update(&updated);
        Ok(updated)
    }

    /// Deletes the client and forgets it in the selection.
    pub fn remove_client(&mut self, id: &ClientId) -> RepositoryResult<()> {
        self.repo.delete_client(id)?;
        if self.selection.apply_removal(id) {
            self.persist();
        }
        Ok(())
    }

    fn persist(&self) {
        let result = SelectionRecord::from_selection(&self.selection)
            .to_value()
            .and_then(|value| self.storage.save(value));

        if let Err(err) = result {
            log::warn!("Failed to persist client selection: {err}");
            self.notifier.notify(
                Notification::new(
                    NotificationLevel::Warning,
                    "Não foi possível salvar a seleção de cliente",
                )
                .description("A seleção vale apenas para esta página."),
            );
        }
    }
}

/// Reads the stored record and re-hydrates its ids against the repository.
///
/// Ids that no longer resolve are dropped; when that changes the record it is
/// written back.
fn load_selection<R, S>(repo: &R, storage: &S) -> Result<ClientSelection, StorageError>
where
    R: ClientReader + ?Sized,
    S: SelectionStorage,
{
    let Some(value) = storage.load()? else {
        return Ok(ClientSelection::default());
    };
    let record = SelectionRecord::decode(value)?;

    let resolve = |id: &ClientId| {
        repo.get_client_by_id(id)
            .map_err(|e| StorageError::Read(format!("client {id}: {e}")))
    };

    let active_client = match &record.active_client {
        Some(id) => resolve(id)?,
        None => None,
    };
    let mut recent_clients = Vec::with_capacity(record.recent_clients.len());
    for id in &record.recent_clients {
        if let Some(client) = resolve(id)? {
            recent_clients.push(client);
        }
    }

    let selection = ClientSelection::restore(active_client, recent_clients);
    let restored = SelectionRecord::from_selection(&selection);
    if restored != record {
        log::info!("Stored client selection referenced missing clients; rewriting");
        if let Err(err) = restored.to_value().and_then(|value| storage.save(value)) {
            log::warn!("Failed to rewrite client selection: {err}");
        }
    }

    Ok(selection)
}
