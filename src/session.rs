use crate::config::{AUTH_TOKEN_KEY, BASE_URL_KEY, USERNAME_KEY};
use crate::core::errors::StoreError;
use crate::core::store::KeyValueStore;

/// Token and username of a logged-in user. Kept together so one never
/// exists without the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Auth {
    pub token: String,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub base_url: String,
    pub auth: Option<Auth>,
}

impl Session {
    /// Read the persisted session. A token without a username (or the
    /// reverse) loads as anonymous.
    pub fn load(store: &dyn KeyValueStore, default_base_url: &str) -> Result<Self, StoreError> {
        let base_url = store
            .get(BASE_URL_KEY)?
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| default_base_url.to_string());

        let token = store.get(AUTH_TOKEN_KEY)?.filter(|t| !t.is_empty());
        let username = store.get(USERNAME_KEY)?.filter(|u| !u.is_empty());
        let auth = match (token, username) {
            (Some(token), Some(username)) => Some(Auth { token, username }),
            (None, None) => None,
            _ => {
                tracing::warn!("persisted session is missing its token or username; starting anonymous");
                None
            }
        };

        Ok(Session { base_url, auth })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.username.as_str())
    }

    pub fn set_base_url(&mut self, store: &dyn KeyValueStore, base_url: &str) -> Result<(), StoreError> {
        self.base_url = base_url.to_string();
        store.set(BASE_URL_KEY, base_url)
    }

    pub fn sign_in(&mut self, store: &dyn KeyValueStore, auth: Auth) -> Result<(), StoreError> {
        store.set(AUTH_TOKEN_KEY, &auth.token)?;
        store.set(USERNAME_KEY, &auth.username)?;
        self.auth = Some(auth);
        Ok(())
    }

    /// Forget the user locally. The in-memory session is cleared even when
    /// the store cannot be written.
    pub fn sign_out(&mut self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        self.auth = None;
        let token = store.delete(AUTH_TOKEN_KEY);
        let username = store.delete(USERNAME_KEY);
        token.and(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;

    #[test]
    fn half_session_loads_anonymous() {
        let store = MemoryStore::new();
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        let session = Session::load(&store, "http://d/api").unwrap();
        assert_eq!(session.auth, None);
        assert_eq!(session.base_url, "http://d/api");
    }

    #[test]
    fn sign_in_and_out_round_trip_through_store() {
        let store = MemoryStore::new();
        let mut session = Session::load(&store, "http://d/api").unwrap();
        session
            .sign_in(&store, Auth { token: "t".into(), username: "ann".into() })
            .unwrap();

        let reloaded = Session::load(&store, "http://d/api").unwrap();
        assert_eq!(reloaded.username(), Some("ann"));

        session.sign_out(&store).unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USERNAME_KEY).unwrap(), None);
    }
}
