//! Event handlers of the post page.
//!
//! [`Controller`] owns the session, the category list, the edit target and
//! the [`Page`] model. Handlers take `&self`, so several may be in flight at
//! once; locks are only held between awaits. Post handlers live in
//! `posts.rs`, login/signup/logout in `auth.rs`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::client::ApiClient;
use crate::config::{welcome_text, LOGIN_LABEL, LOGOUT_LABEL};
use crate::core::errors::ClientError;
use crate::core::helpers::lock;
use crate::core::store::KeyValueStore;
use crate::models::models::{Post, PostId};
use crate::page::Page;
use crate::session::Session;
use crate::templates::render_post_list;

pub struct Controller<S> {
    pub(crate) api: ApiClient,
    pub(crate) store: S,
    pub(crate) session: Mutex<Session>,
    pub(crate) page: Mutex<Page>,
    pub(crate) categories: Mutex<Vec<String>>,
    /// Records behind `page.posts`, kept to re-render on identity changes.
    pub(crate) shown: Mutex<Vec<Post>>,
    pub(crate) edit_target: Mutex<Option<PostId>>,
    list_seq: AtomicU64,
}

impl<S: KeyValueStore> Controller<S> {
    /// Build a controller over `store`, restoring any persisted session.
    pub fn new(api: ApiClient, store: S, default_base_url: &str) -> Result<Self, ClientError> {
        let session = Session::load(&store, default_base_url)?;
        let mut page = Page::default();
        page.base_url_input = session.base_url.clone();
        let controller = Controller {
            api,
            store,
            session: Mutex::new(session),
            page: Mutex::new(page),
            categories: Mutex::new(Vec::new()),
            shown: Mutex::new(Vec::new()),
            edit_target: Mutex::new(None),
            list_seq: AtomicU64::new(0),
        };
        controller.refresh_auth_affordances();
        Ok(controller)
    }

    /// Page bootstrap: categories and posts are loaded side by side; a
    /// failure of one does not stop the other.
    pub async fn start(&self) -> Result<(), ClientError> {
        let (categories, posts) = tokio::join!(self.load_categories(), self.load_posts());
        self.refresh_auth_affordances();
        categories.and(posts)
    }

    pub fn page(&self) -> MutexGuard<'_, Page> {
        lock(&self.page)
    }

    pub fn snapshot(&self) -> Page {
        self.page().clone()
    }

    pub fn session(&self) -> Session {
        lock(&self.session).clone()
    }

    pub fn categories(&self) -> Vec<String> {
        lock(&self.categories).clone()
    }

    pub fn edit_target(&self) -> Option<PostId> {
        lock(&self.edit_target).clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Base URL currently typed into the page.
    pub(crate) fn base_url(&self) -> String {
        let typed = self.page().base_url_input.trim().to_string();
        if typed.is_empty() {
            lock(&self.session).base_url.clone()
        } else {
            typed
        }
    }

    pub(crate) fn token(&self) -> Option<String> {
        lock(&self.session).token().map(str::to_string)
    }

    pub(crate) fn viewer(&self) -> Option<String> {
        lock(&self.session).username().map(str::to_string)
    }

    /// Log a failed action and show its message in the alert modal.
    pub(crate) fn fail(&self, action: &str, err: ClientError) -> ClientError {
        tracing::error!(action, error = %err, "action failed");
        self.page().show_alert(err.user_message());
        err
    }

    /// Ticket for a request that will replace the post list.
    pub(crate) fn next_list_ticket(&self) -> u64 {
        self.list_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// False once a newer list request has been issued.
    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        self.list_seq.load(Ordering::SeqCst) == ticket
    }

    pub(crate) fn show_posts(&self, posts: Vec<Post>) {
        let blocks = render_post_list(&posts, self.viewer().as_deref());
        *lock(&self.shown) = posts;
        let mut page = self.page();
        page.posts = blocks;
        page.notice = None;
    }

    pub(crate) fn show_notice(&self, message: String) {
        lock(&self.shown).clear();
        let mut page = self.page();
        page.posts.clear();
        page.notice = Some(message);
    }

    /// Re-apply author gating to the displayed posts for the current viewer.
    pub(crate) fn rerender(&self) {
        let blocks = render_post_list(&lock(&self.shown), self.viewer().as_deref());
        self.page().posts = blocks;
    }

    /// Auth button label, welcome text and author-gated controls.
    pub(crate) fn refresh_auth_affordances(&self) {
        let username = self.viewer();
        {
            let mut page = self.page();
            match username.as_deref() {
                Some(name) => {
                    page.auth_button_label = LOGOUT_LABEL.to_string();
                    page.welcome_text = welcome_text(name);
                }
                None => {
                    page.auth_button_label = LOGIN_LABEL.to_string();
                    page.welcome_text.clear();
                }
            }
        }
        self.rerender();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AUTH_TOKEN_KEY, BASE_URL_KEY, USERNAME_KEY};
    use crate::core::store::MemoryStore;
    use crate::page::Modal;

    #[test]
    fn new_restores_persisted_session_into_page() {
        let store = MemoryStore::new();
        store.set(BASE_URL_KEY, "http://saved/api").unwrap();
        store.set(AUTH_TOKEN_KEY, "t").unwrap();
        store.set(USERNAME_KEY, "ann").unwrap();

        let c = Controller::new(ApiClient::new(), store, "http://default/api").unwrap();

        let page = c.page();
        assert_eq!(page.base_url_input, "http://saved/api");
        assert_eq!(page.auth_button_label, "Logout");
        assert_eq!(page.welcome_text, "Welcome, ann!");
        assert!(!page.is_open(Modal::Alert));
    }

    #[test]
    fn new_falls_back_to_default_base_url() {
        let c = Controller::new(ApiClient::new(), MemoryStore::new(), "http://default/api").unwrap();
        assert_eq!(c.page().base_url_input, "http://default/api");
        assert_eq!(c.page().auth_button_label, "Login");
    }
}
