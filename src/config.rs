use std::path::PathBuf;

// === Storage keys ===
pub const BASE_URL_KEY: &str = "apiBaseUrl";
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USERNAME_KEY: &str = "username";

// === UI strings ===
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";
pub const SELECT_CATEGORY_LABEL: &str = "Select Category";
pub const LOGIN_LABEL: &str = "Login";
pub const LOGOUT_LABEL: &str = "Logout";
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";
pub const LOGIN_REQUIRED_MESSAGE: &str = "You need to login to add a post.";
pub const DELETE_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this post?";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed.";

const DEFAULT_BASE_URL: &str = "http://localhost:5002/api";

pub fn default_base_url() -> String {
    std::env::var("POSTBOARD_BASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Location of the persisted client state.
///
/// `POSTBOARD_STATE_FILE` wins; otherwise `<config dir>/postboard/state.json`,
/// falling back to the working directory when the platform has no config dir.
pub fn state_file() -> PathBuf {
    if let Some(path) = std::env::var_os("POSTBOARD_STATE_FILE") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join("postboard"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("state.json")
}

pub fn welcome_text(username: &str) -> String {
    format!("Welcome, {}!", username)
}

pub fn like_counter_id(post_id: &str) -> String {
    format!("like-count-{}", post_id)
}
