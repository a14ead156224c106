use crate::categories::select_for_edit;
use crate::config::{ANONYMOUS_AUTHOR, DELETE_CONFIRM_MESSAGE, LOGIN_REQUIRED_MESSAGE};
use crate::controller::Controller;
use crate::core::errors::ClientError;
use crate::core::helpers::lock;
use crate::core::query_params::PostQuery;
use crate::core::store::KeyValueStore;
use crate::models::models::{PostDraft, PostId};
use crate::page::{Modal, PostForm};
use crate::templates::apply_like;

impl<S: KeyValueStore> Controller<S> {
    pub async fn load_categories(&self) -> Result<(), ClientError> {
        let base_url = self.base_url();
        let token = self.token();
        let categories = self
            .api
            .categories(&base_url, token.as_deref())
            .await
            .map_err(|e| self.fail("loading categories", e))?;
        tracing::debug!(count = categories.len(), "categories loaded");

        self.page().selects.populate(&categories);
        *lock(&self.categories) = categories;
        Ok(())
    }

    /// Fetch the post list with the page's filter and sort controls and
    /// render it. The typed base URL is remembered for the next run.
    pub async fn load_posts(&self) -> Result<(), ClientError> {
        let base_url = self.base_url();
        let query = {
            let page = self.page();
            PostQuery::from_controls(
                page.selects.filter_value(),
                &page.sort_field,
                &page.sort_direction,
            )
        };
        self.set_base_url(&base_url);

        let token = self.token();
        let ticket = self.next_list_ticket();
        let result = self.api.list_posts(&base_url, token.as_deref(), &query).await;
        if !self.is_latest(ticket) {
            tracing::debug!(ticket, "discarding stale post list response");
            return result.map(|_| ());
        }
        let posts = result.map_err(|e| self.fail("loading posts", e))?;
        tracing::debug!(count = posts.len(), "posts loaded");
        self.show_posts(posts);
        Ok(())
    }

    /// Put `base_url` in the page input and persist it for the next run.
    pub fn set_base_url(&self, base_url: &str) {
        if let Err(e) = lock(&self.session).set_base_url(&self.store, base_url) {
            tracing::warn!(error = %e, "could not persist base url");
        }
        self.page().base_url_input = base_url.to_string();
    }

    /// Search with the page's search input. An empty query reloads the
    /// full list; a server error (e.g. nothing found) replaces the list
    /// with the server's message.
    pub async fn search_posts(&self) -> Result<(), ClientError> {
        let query = self.page().search_input.trim().to_string();
        if query.is_empty() {
            return self.load_posts().await;
        }
        let base_url = self.base_url();

        let token = self.token();
        let ticket = self.next_list_ticket();
        let result = self
            .api
            .search_posts(&base_url, token.as_deref(), &query)
            .await;
        if !self.is_latest(ticket) {
            tracing::debug!(ticket, "discarding stale search response");
            return result.map(|_| ());
        }
        match result {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), %query, "search results");
                self.show_posts(posts);
                Ok(())
            }
            Err(ClientError::Api { status, message }) => {
                tracing::info!(status = status.as_u16(), %message, "search returned no posts");
                self.show_notice(message.clone());
                Err(ClientError::Api { status, message })
            }
            Err(e) => Err(self.fail("searching posts", e)),
        }
    }

    /// Like a post and update its counter in place. Returns the new count
    /// when the server sent one.
    pub async fn like_post(&self, id: &PostId) -> Result<Option<u64>, ClientError> {
        let base_url = self.base_url();
        let token = self.token();
        let data = self
            .api
            .like_post(&base_url, token.as_deref(), id)
            .await
            .map_err(|e| self.fail("liking post", e))?;

        let Some(likes) = data.likes else {
            tracing::warn!(post = %id, "like response carried no count");
            return Ok(None);
        };
        if let Some(post) = lock(&self.shown).iter_mut().find(|p| &p.id == id) {
            post.likes = likes;
        }
        if !apply_like(&mut self.page().posts, id, likes) {
            tracing::debug!(post = %id, "liked post is not displayed");
        }
        Ok(Some(likes))
    }

    /// Open the add form. Anonymous users get a login prompt instead and
    /// no request is made.
    pub fn open_add_modal(&self) -> Result<(), ClientError> {
        if !lock(&self.session).is_authenticated() {
            self.page().show_alert(LOGIN_REQUIRED_MESSAGE);
            return Err(ClientError::NotLoggedIn);
        }
        let categories = self.categories();
        let mut page = self.page();
        page.add_form = PostForm::default();
        page.selects.reset_add(&categories);
        page.open_modal(Modal::Add);
        Ok(())
    }

    pub fn close_add_modal(&self) {
        self.page().close_modal(Modal::Add);
    }

    /// Create a post from the add form. On failure the form and modal are
    /// left as they are so the user can correct and resubmit.
    pub async fn submit_add(&self) -> Result<(), ClientError> {
        let draft = {
            let page = self.page();
            self.draft(&page.add_form, page.add_category())
        };
        let base_url = self.base_url();
        let token = self.token();

        let created = self
            .api
            .create_post(&base_url, token.as_deref(), &draft)
            .await
            .map_err(|e| self.fail("adding post", e))?;
        tracing::info!(post = %created.get("id").unwrap_or(&serde_json::Value::Null), "post added");

        {
            let mut page = self.page();
            page.close_modal(Modal::Add);
            page.add_form = PostForm::default();
        }
        let _ = self.load_posts().await;
        Ok(())
    }

    /// Open the edit form for a displayed post and mark it as the edit
    /// target.
    pub fn open_edit_modal(&self, id: &PostId) -> Result<(), ClientError> {
        let post = lock(&self.shown).iter().find(|p| &p.id == id).cloned();
        let Some(post) = post else {
            let err = ClientError::UnknownPost(id.clone());
            return Err(self.fail("opening edit form", err));
        };
        let categories = self.categories();

        *lock(&self.edit_target) = Some(post.id.clone());
        let mut page = self.page();
        page.edit_form = PostForm {
            title: post.title.clone(),
            content: post.content.clone(),
        };
        if let Some(select) = page.selects.edit.as_mut() {
            select_for_edit(select, &categories, &post.category);
        }
        page.open_modal(Modal::Edit);
        Ok(())
    }

    pub fn close_edit_modal(&self) {
        lock(&self.edit_target).take();
        self.page().close_modal(Modal::Edit);
    }

    /// Send the edit form for the current edit target. The target is
    /// consumed; if the update fails it is put back while the modal stays
    /// open.
    pub async fn submit_update(&self) -> Result<(), ClientError> {
        let Some(id) = lock(&self.edit_target).take() else {
            return Err(self.fail("updating post", ClientError::NoEditTarget));
        };
        let draft = {
            let page = self.page();
            self.draft(&page.edit_form, page.edit_category())
        };
        let base_url = self.base_url();
        let token = self.token();

        match self
            .api
            .update_post(&base_url, token.as_deref(), &id, &draft)
            .await
        {
            Ok(_) => {
                tracing::info!(post = %id, "post updated");
                self.page().close_modal(Modal::Edit);
                let _ = self.load_posts().await;
                Ok(())
            }
            Err(e) => {
                lock(&self.edit_target).get_or_insert(id);
                Err(self.fail("updating post", e))
            }
        }
    }

    /// Delete a post after `confirm` accepts the question. Returns false
    /// when the user declined and nothing was sent.
    pub async fn delete_post<F>(&self, id: &PostId, confirm: F) -> Result<bool, ClientError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_CONFIRM_MESSAGE) {
            tracing::debug!(post = %id, "delete cancelled");
            return Ok(false);
        }
        let base_url = self.base_url();
        let token = self.token();

        self.api
            .delete_post(&base_url, token.as_deref(), id)
            .await
            .map_err(|e| self.fail("deleting post", e))?;
        tracing::info!(post = %id, "post deleted");

        let _ = self.load_posts().await;
        Ok(true)
    }

    fn draft(&self, form: &PostForm, category: &str) -> PostDraft {
        PostDraft {
            title: form.title.clone(),
            content: form.content.clone(),
            category: category.to_string(),
            author: self.viewer().unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
        }
    }
}
