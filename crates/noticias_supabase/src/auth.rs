use noticias_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::SupabaseClient;

/// An authenticated session, as returned by the password grant. The auth
/// protocol itself is the provider's; we only carry its tokens around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

impl SupabaseClient {
    /// Signs in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url());
        let res = self
            .authed(self.http().post(&url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Error::Auth(format!("sign in failed: {}", res.status())));
        }
        let session: Session = res.json().await?;
        Ok(session)
    }

    /// Revokes the session's tokens.
    pub async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url());
        let res = self
            .http()
            .post(&url)
            .header("apikey", self.key())
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Error::Auth(format!("sign out failed: {}", res.status())));
        }
        Ok(())
    }
}

/// Single owner of the current session. Components that care about auth
/// state subscribe once and watch for changes, instead of each leaf
/// wiring up its own listener.
pub struct SessionContext {
    tx: watch::Sender<Option<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    // send_replace stores the value even when nobody is subscribed yet;
    // send() would discard it without a live receiver.
    pub fn set(&self, session: Session) {
        info!("🔐 session established");
        self.tx.send_replace(Some(session));
    }

    pub fn clear(&self) {
        info!("🔓 session cleared");
        self.tx.send_replace(None);
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: None,
            expires_in: None,
            user: None,
        }
    }

    #[tokio::test]
    async fn subscribers_see_set_and_clear() {
        let ctx = SessionContext::new();
        let mut rx = ctx.subscribe();
        assert!(rx.borrow().is_none());

        ctx.set(session("tok"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().access_token, "tok");

        ctx.clear();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn current_reflects_latest_state() {
        let ctx = SessionContext::new();
        assert!(ctx.current().is_none());
        ctx.set(session("abc"));
        assert_eq!(ctx.current().unwrap().access_token, "abc");
        ctx.clear();
        assert!(ctx.current().is_none());
    }

    #[test]
    fn set_takes_effect_with_no_subscribers() {
        // no subscribe() call anywhere: the stored value must still change
        let ctx = SessionContext::new();
        ctx.set(session("solo"));
        assert_eq!(ctx.current().unwrap().access_token, "solo");

        let rx = ctx.subscribe();
        assert_eq!(rx.borrow().as_ref().unwrap().access_token, "solo");
    }
}
