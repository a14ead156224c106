use crate::controller::Controller;
use crate::core::errors::ClientError;
use crate::core::helpers::lock;
use crate::core::store::KeyValueStore;
use crate::models::models::Credentials;
use crate::page::{CredentialsForm, Modal};
use crate::session::Auth;

impl<S: KeyValueStore> Controller<S> {
    /// Log in and switch the page to the authenticated view.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let base_url = self.base_url();
        let creds = Credentials { username, password };
        let data = self
            .api
            .login(&base_url, &creds)
            .await
            .map_err(|e| self.fail("logging in", e))?;

        let Some(token) = data.token.filter(|t| !t.is_empty()) else {
            return Err(self.fail("logging in", ClientError::MissingToken));
        };
        let auth = Auth {
            token,
            username: username.to_string(),
        };
        let saved = lock(&self.session).sign_in(&self.store, auth);
        saved.map_err(|e| self.fail("saving session", e.into()))?;
        tracing::info!(username, "logged in");

        {
            let mut page = self.page();
            page.close_modal(Modal::Login);
            page.login_form = CredentialsForm::default();
        }
        self.refresh_auth_affordances();
        let _ = self.load_posts().await;
        Ok(())
    }

    pub async fn submit_login(&self) -> Result<(), ClientError> {
        let form = self.page().login_form.clone();
        self.login(&form.username, &form.password).await
    }

    /// Register, then log in with the same credentials.
    pub async fn signup(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let base_url = self.base_url();
        let creds = Credentials { username, password };
        self.api
            .register(&base_url, &creds)
            .await
            .map_err(|e| self.fail("signing up", e))?;
        tracing::info!(username, "registered");

        self.login(username, password).await?;
        let mut page = self.page();
        page.close_modal(Modal::Signup);
        page.signup_form = CredentialsForm::default();
        Ok(())
    }

    pub async fn submit_signup(&self) -> Result<(), ClientError> {
        let form = self.page().signup_form.clone();
        self.signup(&form.username, &form.password).await
    }

    /// Forget the session locally; no request is made to the server. Owned
    /// post controls disappear at once, then the list is reloaded.
    pub async fn logout(&self) {
        let cleared = lock(&self.session).sign_out(&self.store);
        if let Err(e) = cleared {
            tracing::warn!(error = %e, "could not clear persisted session");
        }
        tracing::info!("logged out");
        self.refresh_auth_affordances();
        let _ = self.load_posts().await;
    }

    /// The auth button: confirm logout when logged in, otherwise log in.
    pub fn toggle_auth(&self) {
        let authenticated = lock(&self.session).is_authenticated();
        let modal = if authenticated {
            Modal::LogoutConfirm
        } else {
            Modal::Login
        };
        self.page().open_modal(modal);
    }

    pub async fn confirm_logout(&self) {
        self.page().close_modal(Modal::LogoutConfirm);
        self.logout().await;
    }

    pub fn open_login_modal(&self) {
        self.page().open_modal(Modal::Login);
    }

    pub fn close_login_modal(&self) {
        self.page().close_modal(Modal::Login);
    }

    pub fn open_signup_modal(&self) {
        self.page().open_modal(Modal::Signup);
    }

    pub fn close_signup_modal(&self) {
        self.page().close_modal(Modal::Signup);
    }

    pub fn close_logout_modal(&self) {
        self.page().close_modal(Modal::LogoutConfirm);
    }

    pub fn close_alert(&self) {
        self.page().close_modal(Modal::Alert);
    }

    /// "Log in" button of the alert shown to anonymous users.
    pub fn alert_login(&self) {
        let mut page = self.page();
        page.close_modal(Modal::Alert);
        page.open_modal(Modal::Login);
    }
}
