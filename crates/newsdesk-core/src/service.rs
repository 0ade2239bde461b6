//! Desk context object: registry, user directory, membership index and the
//! current-desk selection, loaded once per service.

use std::sync::Arc;

use newsdesk_api::{ApiError, DeskSource};
use newsdesk_models::{Collection, Desk, User};
use newsdesk_storage::{KeyValueStore, StorageError};
use newsdesk_util::href;
use tokio::sync::RwLock;

use crate::error::{DeskError, LoadError};
use crate::member_index::MembershipIndex;
use crate::once::OnceShared;
use crate::registry::{DeskRegistry, UserDirectory};
use crate::selector::CurrentDeskSelector;

/// Upper bound on items requested per collection fetch.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

#[derive(Debug, Default)]
struct DeskState {
    desks: DeskRegistry,
    users: UserDirectory,
    members: MembershipIndex,
}

pub struct DeskService {
    source: Arc<dyn DeskSource>,
    selector: CurrentDeskSelector,
    state: Arc<RwLock<DeskState>>,
    loading: OnceShared<Result<(), LoadError>>,
    page_size: u32,
}

impl DeskService {
    pub fn new(source: Arc<dyn DeskSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            source,
            selector: CurrentDeskSelector::new(store),
            state: Arc::new(RwLock::new(DeskState::default())),
            loading: OnceShared::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch desks, then users, then build the membership index.
    ///
    /// Runs the fetch sequence at most once; every call, concurrent or later,
    /// observes the outcome of that single run, failures included.
    pub async fn initialize(&self) -> Result<(), LoadError> {
        let source = self.source.clone();
        let state = self.state.clone();
        let page_size = self.page_size;
        self.loading
            .get_or_start(move || load(source, state, page_size))
            .await
    }

    /// True once `initialize` has completed successfully.
    pub fn is_loaded(&self) -> bool {
        matches!(self.loading.peek(), Some(Ok(())))
    }

    pub async fn desks(&self) -> Vec<Desk> {
        self.state.read().await.desks.items().to_vec()
    }

    pub async fn desk(&self, id: &str) -> Option<Desk> {
        self.state.read().await.desks.get(id).cloned()
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.read().await.users.items().to_vec()
    }

    pub async fn user(&self, id: &str) -> Option<User> {
        self.state.read().await.users.get(id).cloned()
    }

    /// Resolved members of a desk; empty for unknown desks.
    pub async fn desk_members(&self, desk_id: &str) -> Vec<User> {
        self.state
            .read()
            .await
            .members
            .members(desk_id)
            .map(<[User]>::to_vec)
            .unwrap_or_default()
    }

    pub fn selector(&self) -> &CurrentDeskSelector {
        &self.selector
    }

    pub async fn current_desk_id(&self) -> Result<Option<String>, StorageError> {
        self.selector.current_desk_id().await
    }

    pub async fn set_current_desk_id(&self, desk_id: Option<&str>) -> Result<(), StorageError> {
        self.selector.set_current_desk_id(desk_id).await
    }

    pub async fn set_current_desk(&self, desk: Option<&Desk>) -> Result<(), StorageError> {
        self.set_current_desk_id(desk.map(|d| d.id.as_str())).await
    }

    /// The selected desk looked up in the loaded registry. `None` when nothing
    /// is selected, the id is unknown, or desks have not been loaded.
    pub async fn current_desk(&self) -> Result<Option<Desk>, StorageError> {
        let Some(id) = self.current_desk_id().await? else {
            return Ok(None);
        };
        Ok(self.desk(&id).await)
    }

    /// The selected desk fetched fresh from the API, bypassing the registry.
    pub async fn fetch_current_desk(&self) -> Result<Option<Desk>, DeskError> {
        let Some(id) = self.current_desk_id().await? else {
            return Ok(None);
        };
        Ok(Some(self.source.get_desk(&id).await?))
    }

    /// Desks the user belongs to, via the user's `<self>/desks` sub-resource.
    pub async fn fetch_user_desks(&self, user: &User) -> Result<Vec<Desk>, ApiError> {
        let self_href = user
            .self_href()
            .ok_or_else(|| ApiError::MissingLink(format!("user {}", user.id)))?;
        let page = self
            .source
            .get_desks_by_href(&href::child(self_href, "desks"))
            .await?;
        Ok(page.items)
    }
}

async fn load(
    source: Arc<dyn DeskSource>,
    state: Arc<RwLock<DeskState>>,
    page_size: u32,
) -> Result<(), LoadError> {
    let page = source
        .query_desks(page_size)
        .await
        .map_err(|e| LoadError::Desks(Arc::new(e)))?;
    warn_if_truncated("desks", &page);
    let desks = DeskRegistry::from_items(page.items);
    tracing::info!(count = desks.len(), "fetched desks");
    state.write().await.desks = desks;

    let page = source
        .list_users(1, page_size)
        .await
        .map_err(|e| LoadError::Users(Arc::new(e)))?;
    warn_if_truncated("users", &page);
    let users = UserDirectory::from_items(page.items);
    tracing::info!(count = users.len(), "fetched users");

    let mut guard = state.write().await;
    let state = &mut *guard;
    state.members = MembershipIndex::build(&state.desks, &users);
    state.users = users;
    Ok(())
}

fn warn_if_truncated<T>(collection: &str, page: &Collection<T>) {
    if let Some(total) = page.truncated_total() {
        tracing::warn!(
            collection,
            fetched = page.items.len(),
            total,
            "collection exceeds page size, extra items ignored"
        );
    }
}
