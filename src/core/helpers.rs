use std::sync::{Mutex, MutexGuard, PoisonError};

/// Join a user-typed base URL and an API path.
///
/// A trailing `/` on the base is dropped so `http://host/api/` and
/// `http://host/api` address the same routes.
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Lock ignoring poisoning; guarded values here stay consistent between
/// statements.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn post_path(id: &str) -> String {
    format!("/posts/{}", urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("http://h/api", "/posts"), "http://h/api/posts");
        assert_eq!(join_url("http://h/api/", "/posts"), "http://h/api/posts");
        assert_eq!(join_url(" http://h/api ", "posts"), "http://h/api/posts");
    }

    #[test]
    fn post_path_encodes_id() {
        assert_eq!(post_path("7"), "/posts/7");
        assert_eq!(post_path("a b"), "/posts/a%20b");
    }
}
