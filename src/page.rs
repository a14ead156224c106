//! Headless model of the page the controller drives.

use std::collections::BTreeSet;

use crate::categories::{CategorySelects, Select};
use crate::config::LOGIN_LABEL;
use crate::templates::PostBlock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modal {
    Add,
    Edit,
    Login,
    Signup,
    LogoutConfirm,
    Alert,
}

/// Title/content fields of the add and edit forms. The category lives in
/// the matching select.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub base_url_input: String,
    pub sort_field: String,
    pub sort_direction: String,
    pub search_input: String,
    pub selects: CategorySelects,
    pub posts: Vec<PostBlock>,
    /// Shown in place of the post list, e.g. "no posts found" from search.
    pub notice: Option<String>,
    pub add_form: PostForm,
    pub edit_form: PostForm,
    pub login_form: CredentialsForm,
    pub signup_form: CredentialsForm,
    pub alert_message: Option<String>,
    pub auth_button_label: String,
    pub welcome_text: String,
    open: BTreeSet<Modal>,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            base_url_input: String::new(),
            sort_field: String::new(),
            sort_direction: String::new(),
            search_input: String::new(),
            selects: CategorySelects::default(),
            posts: Vec::new(),
            notice: None,
            add_form: PostForm::default(),
            edit_form: PostForm::default(),
            login_form: CredentialsForm::default(),
            signup_form: CredentialsForm::default(),
            alert_message: None,
            auth_button_label: LOGIN_LABEL.to_string(),
            welcome_text: String::new(),
            open: BTreeSet::new(),
        }
    }
}

impl Page {
    pub fn open_modal(&mut self, modal: Modal) {
        self.open.insert(modal);
    }

    pub fn close_modal(&mut self, modal: Modal) {
        self.open.remove(&modal);
        if modal == Modal::Alert {
            self.alert_message = None;
        }
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.open.contains(&modal)
    }

    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.alert_message = Some(message.into());
        self.open.insert(Modal::Alert);
    }

    pub fn block(&self, id: &str) -> Option<&PostBlock> {
        self.posts.iter().find(|b| b.post_id.as_str() == id)
    }

    /// Value of a category select, `""` when absent or unselected.
    pub fn add_category(&self) -> &str {
        self.selects.add.as_ref().map(|s| s.value()).unwrap_or("")
    }

    pub fn edit_category(&self) -> &str {
        self.selects.edit.as_ref().map(|s| s.value()).unwrap_or("")
    }

    /// Choose the filter category. A value not among the loaded categories
    /// is added as an option first. Returns false when the page has no
    /// filter select.
    pub fn set_filter_category(&mut self, category: &str) -> bool {
        choose(self.selects.filter.as_mut(), category)
    }

    pub fn set_add_category(&mut self, category: &str) -> bool {
        choose(self.selects.add.as_mut(), category)
    }

    pub fn set_edit_category(&mut self, category: &str) -> bool {
        choose(self.selects.edit.as_mut(), category)
    }
}

fn choose(select: Option<&mut Select>, value: &str) -> bool {
    match select {
        Some(select) => {
            select.choose(value);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_alert_clears_message() {
        let mut page = Page::default();
        page.show_alert("boom");
        assert!(page.is_open(Modal::Alert));
        page.close_modal(Modal::Alert);
        assert!(!page.is_open(Modal::Alert));
        assert_eq!(page.alert_message, None);
    }
}
