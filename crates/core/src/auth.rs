//! Session authentication.
//!
//! Issues, validates, and revokes opaque session tokens, and owns the
//! password hashing policy. Passwords are stored as unsalted SHA-256 hex
//! digests — a known weakness kept deliberately so logins keep working
//! against existing user documents (see DESIGN.md); do not copy this scheme
//! into a new system.

use crate::models::{from_doc, to_doc, Session, User};
use crate::store::{collections, DocumentStore, Filter};
use crate::{CoreError, CoreResult};
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Fixed session lifetime; there is no sliding-window renewal.
pub const SESSION_LIFETIME_HOURS: i64 = 24;

/// Successful login: the issued token plus the canonical username.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session_token: String,
    pub username: String,
}

/// Service for signup, login, and session verification.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<DocumentStore>,
}

impl AuthService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Deterministic one-way digest of a password.
    ///
    /// Used at signup and again at login for comparison; equal inputs always
    /// produce equal digests.
    pub fn hash_password(plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Registers a new user.
    ///
    /// Fails with `Conflict` when the username OR the email is already taken.
    /// The existence pre-check and the insert are not atomic; two concurrent
    /// signups for the same identity can race.
    pub fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        domain: &str,
    ) -> CoreResult<()> {
        let taken = Filter::any([Filter::eq("username", username), Filter::eq("email", email)]);
        if self.store.find_one(collections::USERS, &taken)?.is_some() {
            return Err(CoreError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let user = User {
            id: String::new(),
            username: username.to_string(),
            email: email.to_string(),
            password: Self::hash_password(password),
            domain: domain.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_one(collections::USERS, to_doc(&user)?)?;
        Ok(())
    }

    /// Checks credentials and issues a session token.
    ///
    /// A wrong username and a wrong password yield the same generic outcome
    /// so responses never reveal whether an account exists.
    pub fn login(&self, username: &str, password: &str) -> CoreResult<LoginOutcome> {
        let filter =
            Filter::eq("username", username).and("password", Self::hash_password(password));
        let Some(doc) = self.store.find_one(collections::USERS, &filter)? else {
            return Err(CoreError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        };
        let user: User = from_doc(doc)?;
        let session_token = self.issue_session(&user)?;
        Ok(LoginOutcome {
            session_token,
            username: user.username,
        })
    }

    /// Stores a fresh session with a fixed 24-hour expiry.
    fn issue_session(&self, user: &User) -> CoreResult<String> {
        let mut token_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut token_bytes);
        let session_token = hex::encode(token_bytes);

        let created_at = Utc::now();
        let session = Session {
            user_id: user.id.clone(),
            username: user.username.clone(),
            session_token: session_token.clone(),
            created_at,
            expires_at: created_at + Duration::hours(SESSION_LIFETIME_HOURS),
        };
        self.store
            .insert_one(collections::SESSIONS, to_doc(&session)?)?;
        Ok(session_token)
    }

    /// Returns the session's username when the token exists and has not
    /// expired. Expiry is checked lazily at read time; expired records are
    /// never swept.
    pub fn verify(&self, session_token: &str) -> CoreResult<String> {
        let filter = Filter::eq("session_token", session_token);
        let Some(doc) = self.store.find_one(collections::SESSIONS, &filter)? else {
            return Err(CoreError::Unauthorized(
                "Invalid or expired session".to_string(),
            ));
        };
        let session: Session = from_doc(doc)?;
        if session.expires_at <= Utc::now() {
            return Err(CoreError::Unauthorized(
                "Invalid or expired session".to_string(),
            ));
        }
        Ok(session.username)
    }

    /// Deletes the session record. Revoking an absent token is not an error.
    pub fn revoke(&self, session_token: &str) -> CoreResult<()> {
        self.store
            .delete_one(collections::SESSIONS, &Filter::eq("session_token", session_token))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(Arc::new(DocumentStore::open_in_memory().unwrap()))
    }

    #[test]
    fn test_hash_password_is_deterministic_and_collision_free() {
        assert_eq!(
            AuthService::hash_password("secret"),
            AuthService::hash_password("secret")
        );
        assert_ne!(
            AuthService::hash_password("secret"),
            AuthService::hash_password("secret2")
        );
        assert_eq!(AuthService::hash_password("secret").len(), 64);
    }

    #[test]
    fn test_signup_conflicts_on_username_or_email() {
        let auth = service();
        auth.signup("bob", "bob@x.com", "secret", "chem").unwrap();

        let by_username = auth
            .signup("bob", "other@x.com", "secret", "chem")
            .expect_err("duplicate username should conflict");
        assert!(matches!(by_username, CoreError::Conflict(_)));

        let by_email = auth
            .signup("alice", "bob@x.com", "secret", "chem")
            .expect_err("duplicate email should conflict");
        assert!(matches!(by_email, CoreError::Conflict(_)));
    }

    #[test]
    fn test_login_verify_logout_flow() {
        let auth = service();
        auth.signup("bob", "bob@x.com", "secret", "chem").unwrap();

        let outcome = auth.login("bob", "secret").unwrap();
        assert_eq!(outcome.username, "bob");
        assert_eq!(outcome.session_token.len(), 64, "256 bits hex encoded");

        assert_eq!(auth.verify(&outcome.session_token).unwrap(), "bob");

        auth.revoke(&outcome.session_token).unwrap();
        let err = auth
            .verify(&outcome.session_token)
            .expect_err("revoked session should not verify");
        assert!(matches!(err, CoreError::Unauthorized(_)));

        // Revoking again is idempotent.
        auth.revoke(&outcome.session_token).unwrap();
    }

    #[test]
    fn test_login_rejects_wrong_password_and_unknown_user_identically() {
        let auth = service();
        auth.signup("bob", "bob@x.com", "secret", "chem").unwrap();

        let wrong_password = auth.login("bob", "wrong").expect_err("wrong password");
        let unknown_user = auth.login("nobody", "secret").expect_err("unknown user");

        let (CoreError::Unauthorized(a), CoreError::Unauthorized(b)) =
            (wrong_password, unknown_user)
        else {
            panic!("both failures should be Unauthorized");
        };
        assert_eq!(a, b, "responses must not reveal which part was wrong");
    }

    #[test]
    fn test_expired_session_fails_verify_without_revocation() {
        let store = Arc::new(DocumentStore::open_in_memory().unwrap());
        let auth = AuthService::new(store.clone());

        let stale = Session {
            user_id: "u1".to_string(),
            username: "bob".to_string(),
            session_token: "stale-token".to_string(),
            created_at: Utc::now() - Duration::hours(48),
            expires_at: Utc::now() - Duration::hours(24),
        };
        store
            .insert_one(collections::SESSIONS, to_doc(&stale).unwrap())
            .unwrap();

        let err = auth
            .verify("stale-token")
            .expect_err("expired session should not verify");
        assert!(matches!(err, CoreError::Unauthorized(_)));
    }

    #[test]
    fn test_tokens_are_unique_per_login() {
        let auth = service();
        auth.signup("bob", "bob@x.com", "secret", "chem").unwrap();
        let first = auth.login("bob", "secret").unwrap();
        let second = auth.login("bob", "secret").unwrap();
        assert_ne!(first.session_token, second.session_token);
    }
}
