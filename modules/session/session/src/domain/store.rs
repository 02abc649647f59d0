//! The session store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::{ExposeSecret, SecretString};
use session_sdk::{AuthUser, Location, SessionState, SessionStorage, keys};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::token;
use crate::config::SessionConfig;

/// Holds the current authenticated identity and keeps durable storage in
/// step with it.
///
/// State is published through a [`watch`] channel: readers take a
/// [`snapshot`](Self::snapshot) or [`subscribe`](Self::subscribe) to changes.
/// All mutators take `&self`, so the store can be shared behind an `Arc`.
///
/// No method returns an error. Token problems resolve to a logged-out state,
/// storage failures are logged and the in-memory transition still happens.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    initialized: AtomicBool,
}

impl SessionStore {
    #[must_use]
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            storage,
            clock,
            config,
            state,
            initialized: AtomicBool::new(false),
        }
    }

    /// Current session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Adopt `token` and `email` as the current session and persist them.
    ///
    /// No validation happens here; callers decide whether the token is
    /// acceptable.
    pub fn login(&self, token: SecretString, email: &str) {
        self.write_storage(keys::TOKEN, token.expose_secret());
        self.write_storage(keys::USER_EMAIL, email);

        self.state.send_modify(|s| {
            s.token = Some(token);
            s.user = Some(AuthUser {
                email: email.to_owned(),
            });
        });
        info!(email = %email, "Session established");
    }

    /// Drop the current session and clear durable storage. Idempotent.
    pub fn logout(&self) {
        self.remove_storage(keys::TOKEN);
        self.remove_storage(keys::USER_EMAIL);

        let was_authenticated = self.is_authenticated();
        self.state.send_modify(|s| {
            s.token = None;
            s.user = None;
        });
        if was_authenticated {
            info!("Session cleared");
        } else {
            debug!("Logout on an unauthenticated session");
        }
    }

    /// Token as currently held in durable storage.
    ///
    /// Read at call time, so it reflects a logout performed anywhere against
    /// the same storage.
    #[must_use]
    pub fn stored_token(&self) -> Option<SecretString> {
        self.read_storage(keys::TOKEN).map(SecretString::from)
    }

    /// Restore a persisted session.
    ///
    /// Adopts the stored token and email when both are present and the token
    /// has not expired; otherwise logs out to clear partial or stale data.
    /// Clears the loading flag afterwards.
    pub fn restore(&self) {
        let stored_token = self.read_storage(keys::TOKEN);
        let stored_email = self.read_storage(keys::USER_EMAIL);

        match (stored_token, stored_email) {
            (Some(token), Some(email))
                if !token::is_token_expired(&token, self.clock.now_millis()) =>
            {
                self.state.send_modify(|s| {
                    s.token = Some(SecretString::from(token));
                    s.user = Some(AuthUser {
                        email: email.clone(),
                    });
                });
                info!(email = %email, "Restored persisted session");
            }
            (None, None) => {
                debug!("No persisted session");
                self.logout();
            }
            _ => {
                info!("Persisted session is incomplete or expired, discarding");
                self.logout();
            }
        }

        self.state.send_modify(|s| s.is_loading = false);
    }

    /// Adopt a token delivered on the landing location by an OAuth redirect.
    ///
    /// Does nothing when the location carries no token. An undecodable or
    /// expired token, or one without any identity hint, logs out. A valid
    /// token is adopted and the location is rewritten to the post-login path
    /// so the token no longer shows in it.
    pub fn capture_redirect(&self, location: &mut dyn Location) {
        let Some(raw) = location
            .query_param(&self.config.redirect_token_param)
            .filter(|t| !t.is_empty())
        else {
            return;
        };

        let now = self.clock.now_millis();
        let Some(claims) =
            token::decode_payload(&raw).filter(|claims| !token::is_expired_at(claims, now))
        else {
            warn!("Redirect token is malformed or expired");
            self.logout();
            return;
        };

        let Some(email) = claims.display_email().map(ToOwned::to_owned) else {
            warn!("Redirect token carries no identity hint");
            self.logout();
            return;
        };

        self.login(SecretString::from(raw), &email);
        location.replace(&self.config.post_login_path);
        debug!(path = %self.config.post_login_path, "Location rewritten after redirect login");
    }

    /// Restore the persisted session, then capture any redirect token.
    ///
    /// Runs once per store; later calls are ignored.
    pub fn initialize(&self, location: &mut dyn Location) {
        if self.initialized.swap(true, Ordering::AcqRel) {
            debug!("Session store already initialized");
            return;
        }
        self.restore();
        self.capture_redirect(location);
    }

    fn read_storage(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read session storage");
                None
            }
        }
    }

    fn write_storage(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "Failed to write session storage");
        }
    }

    fn remove_storage(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "Failed to clear session storage");
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use session_sdk::{StorageError, UrlLocation};
    use tracing_test::traced_test;

    use super::*;
    use crate::domain::{FixedClock, InMemoryStorage};

    const NOW_SECS: i64 = 1_700_000_000;

    fn token_with(payload: &serde_json::Value) -> String {
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("eyJhbGciOiJIUzI1NiJ9.{body}.sig")
    }

    fn valid_token(email: &str) -> String {
        token_with(&serde_json::json!({ "exp": NOW_SECS + 3600, "email": email }))
    }

    fn expired_token() -> String {
        token_with(&serde_json::json!({ "exp": NOW_SECS - 1, "email": "old@example.com" }))
    }

    fn store_with(storage: Arc<InMemoryStorage>) -> SessionStore {
        SessionStore::new(
            storage,
            Arc::new(FixedClock::at_secs(NOW_SECS)),
            SessionConfig::default(),
        )
    }

    fn stored(storage: &InMemoryStorage, key: &str) -> Option<String> {
        storage.get(key).unwrap()
    }

    #[test]
    fn login_persists_and_authenticates() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());

        store.login(SecretString::from("tok"), "fabiano@example.com");

        assert_eq!(stored(&storage, keys::TOKEN).as_deref(), Some("tok"));
        assert_eq!(
            stored(&storage, keys::USER_EMAIL).as_deref(),
            Some("fabiano@example.com")
        );
        let state = store.snapshot();
        assert!(state.is_authenticated());
        assert_eq!(state.email(), Some("fabiano@example.com"));
        assert_eq!(
            state.token.as_ref().map(ExposeSecret::expose_secret),
            Some("tok")
        );
    }

    #[test]
    fn logout_clears_everything_and_is_idempotent() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());
        store.login(SecretString::from("tok"), "a@example.com");

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(stored(&storage, keys::TOKEN), None);
        assert_eq!(stored(&storage, keys::USER_EMAIL), None);

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(stored(&storage, keys::TOKEN), None);
    }

    #[test]
    fn restore_adopts_valid_persisted_session() {
        let storage = Arc::new(InMemoryStorage::new());
        let token = valid_token("ding@example.com");
        storage.set(keys::TOKEN, &token).unwrap();
        storage.set(keys::USER_EMAIL, "ding@example.com").unwrap();

        let store = store_with(storage.clone());
        assert!(store.is_loading());
        store.restore();

        let state = store.snapshot();
        assert!(!state.is_loading);
        assert!(state.is_authenticated());
        assert_eq!(state.email(), Some("ding@example.com"));
        assert_eq!(
            state.token.as_ref().map(ExposeSecret::expose_secret),
            Some(token.as_str())
        );
        assert_eq!(stored(&storage, keys::TOKEN), Some(token));
    }

    #[test]
    fn restore_discards_expired_session() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.set(keys::TOKEN, &expired_token()).unwrap();
        storage.set(keys::USER_EMAIL, "old@example.com").unwrap();

        let store = store_with(storage.clone());
        store.restore();

        assert!(!store.is_loading());
        assert!(!store.is_authenticated());
        assert_eq!(stored(&storage, keys::TOKEN), None);
        assert_eq!(stored(&storage, keys::USER_EMAIL), None);
    }

    #[test]
    fn restore_discards_partial_record() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.set(keys::TOKEN, &valid_token("x@example.com")).unwrap();

        let store = store_with(storage.clone());
        store.restore();

        assert!(!store.is_authenticated());
        assert_eq!(stored(&storage, keys::TOKEN), None);
    }

    #[test]
    fn redirect_without_token_is_noop() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());
        store.login(SecretString::from("existing"), "keep@example.com");

        let mut loc = UrlLocation::parse("https://play.example/home?tab=games").unwrap();
        store.capture_redirect(&mut loc);

        assert!(store.is_authenticated());
        assert_eq!(loc.url().as_str(), "https://play.example/home?tab=games");
    }

    #[test]
    fn redirect_with_valid_token_logs_in_and_cleans_location() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());
        let token = valid_token("alireza@example.com");

        let mut loc =
            UrlLocation::parse(&format!("https://play.example/oauth?token={token}")).unwrap();
        store.capture_redirect(&mut loc);

        assert!(store.is_authenticated());
        assert_eq!(store.snapshot().email(), Some("alireza@example.com"));
        assert_eq!(stored(&storage, keys::TOKEN), Some(token));
        assert_eq!(loc.url().as_str(), "https://play.example/dashboard");
        assert_eq!(loc.query_param("token"), None);
    }

    #[test]
    fn redirect_falls_back_to_preferred_username_then_sub() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());
        let token = token_with(&serde_json::json!({
            "exp": NOW_SECS + 60,
            "preferred_username": "wesley",
            "sub": "sub-1",
        }));

        let mut loc = UrlLocation::parse(&format!("https://p.example/?token={token}")).unwrap();
        store.capture_redirect(&mut loc);
        assert_eq!(store.snapshot().email(), Some("wesley"));

        let token = token_with(&serde_json::json!({ "exp": NOW_SECS + 60, "sub": "sub-1" }));
        let mut loc = UrlLocation::parse(&format!("https://p.example/?token={token}")).unwrap();
        store.capture_redirect(&mut loc);
        assert_eq!(store.snapshot().email(), Some("sub-1"));
    }

    #[test]
    fn redirect_adopts_token_with_numeric_sub() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());
        let token = token_with(&serde_json::json!({
            "exp": NOW_SECS + 3600,
            "email": "a@example.com",
            "sub": 42,
        }));

        let mut loc = UrlLocation::parse(&format!("https://p.example/?token={token}")).unwrap();
        store.capture_redirect(&mut loc);

        assert!(store.is_authenticated());
        assert_eq!(store.snapshot().email(), Some("a@example.com"));
        assert_eq!(stored(&storage, keys::TOKEN), Some(token));
        assert_eq!(loc.url().as_str(), "https://p.example/dashboard");

        let restarted = store_with(storage);
        restarted.restore();
        assert!(restarted.is_authenticated());
    }

    #[test]
    fn redirect_with_expired_token_logs_out() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());
        store.login(SecretString::from("existing"), "keep@example.com");

        let mut loc =
            UrlLocation::parse(&format!("https://p.example/?token={}", expired_token())).unwrap();
        store.capture_redirect(&mut loc);

        assert!(!store.is_authenticated());
        assert_eq!(stored(&storage, keys::TOKEN), None);
        assert!(loc.query_param("token").is_some());
    }

    #[test]
    fn redirect_with_garbage_token_logs_out() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage);

        let mut loc = UrlLocation::parse("https://p.example/?token=not.a.jwt").unwrap();
        store.capture_redirect(&mut loc);

        assert!(!store.is_authenticated());
    }

    #[test]
    fn redirect_without_identity_hint_logs_out() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());
        let token = token_with(&serde_json::json!({ "exp": NOW_SECS + 60 }));

        let mut loc = UrlLocation::parse(&format!("https://p.example/?token={token}")).unwrap();
        store.capture_redirect(&mut loc);

        assert!(!store.is_authenticated());
        assert_eq!(stored(&storage, keys::USER_EMAIL), None);
    }

    #[test]
    fn initialize_runs_once() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = store_with(storage.clone());
        let mut loc = UrlLocation::parse("https://p.example/").unwrap();

        store.initialize(&mut loc);
        assert!(!store.is_loading());

        store.login(SecretString::from("later"), "later@example.com");
        store.initialize(&mut loc);
        assert!(store.is_authenticated());
    }

    #[test]
    fn redirect_token_wins_over_restored_session() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.set(keys::TOKEN, &valid_token("old@example.com")).unwrap();
        storage.set(keys::USER_EMAIL, "old@example.com").unwrap();
        let store = store_with(storage.clone());

        let fresh = valid_token("new@example.com");
        let mut loc = UrlLocation::parse(&format!("https://p.example/cb?token={fresh}")).unwrap();
        store.initialize(&mut loc);

        assert_eq!(store.snapshot().email(), Some("new@example.com"));
        assert_eq!(stored(&storage, keys::TOKEN), Some(fresh));
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let store = store_with(Arc::new(InMemoryStorage::new()));
        let mut rx = store.subscribe();

        store.login(SecretString::from("tok"), "sub@example.com");
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());

        store.logout();
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_authenticated());
    }

    struct BrokenStorage;

    impl SessionStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::corrupt("unreadable"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::corrupt("read-only"))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::corrupt("read-only"))
        }
    }

    #[test]
    #[traced_test]
    fn storage_failures_are_logged_not_raised() {
        let store = SessionStore::new(
            Arc::new(BrokenStorage),
            Arc::new(FixedClock::at_secs(NOW_SECS)),
            SessionConfig::default(),
        );

        store.restore();
        assert!(!store.is_loading());
        assert!(!store.is_authenticated());

        store.login(SecretString::from("tok"), "mem@example.com");
        assert!(store.is_authenticated());
        assert!(logs_contain("Failed to write session storage"));
    }
}
