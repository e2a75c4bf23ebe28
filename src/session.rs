// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use clap::ValueEnum;
use inflector::Inflector as _;
use log::{info, warn};
use rand::{distributions::Alphanumeric, Rng as _};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use tabled::Tabled;
use tokio::sync::watch;

const GUEST_DISPLAY_NAME: &str = "Guest";
const TOKEN_LENGTH: usize = 48;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    fn for_email(email: &str) -> Self {
        let email = email.to_lowercase();
        if email.contains("admin") {
            Self::Admin
        } else if email.contains("editor") {
            Self::Editor
        } else {
            Self::Viewer
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.to_possible_value().ok_or(std::fmt::Error)?;
        write!(f, "{}", value.get_name().to_title_case())
    }
}

/// What the user typed to sign in. The password is accepted as-is; checking it
/// is the business of whoever issued the token.
pub(crate) struct Login {
    pub(crate) email: String,
    pub(crate) password: SecretString,
    pub(crate) token: Option<SecretString>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Session {
    #[tabled(rename = "User ID")]
    user_id: u64,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "E-mail")]
    email: String,
    #[tabled(rename = "Role")]
    role: Role,
    #[serde(serialize_with = "expose_token")]
    #[tabled(skip)]
    session_token: SecretString,
}

fn expose_token<S: Serializer>(token: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(token.expose_secret())
}

impl Session {
    fn from_login(login: Login) -> Self {
        if login.password.expose_secret().is_empty() {
            warn!("Signing in {} with an empty password", login.email);
        }

        let local_part = login
            .email
            .split_once('@')
            .map_or(login.email.as_str(), |(local, _)| local);
        let display_name = match local_part.to_title_case() {
            name if name.is_empty() => GUEST_DISPLAY_NAME.to_owned(),
            name => name,
        };
        let session_token = login.token.unwrap_or_else(|| {
            SecretString::new(
                rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(TOKEN_LENGTH)
                    .map(char::from)
                    .collect(),
            )
        });

        Self {
            user_id: 1,
            display_name,
            role: Role::for_email(&login.email),
            email: login.email,
            session_token,
        }
    }

    pub(crate) fn display_name(&self) -> &str {
        &self.display_name
    }

    pub(crate) fn email(&self) -> &str {
        &self.email
    }

    pub(crate) const fn role(&self) -> Role {
        self.role
    }

    pub(crate) const fn token(&self) -> &SecretString {
        &self.session_token
    }
}

/// Owner of the current session. Everything else reads it through the
/// accessors or a [`watch::Receiver`]; only `login` and `logout` change it.
#[derive(Clone)]
pub(crate) struct SessionStore {
    state: Arc<watch::Sender<Option<Session>>>,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        Self::restore(None)
    }

    pub(crate) fn restore(session: Option<Session>) -> Self {
        let (state, _) = watch::channel(session);
        Self {
            state: Arc::new(state),
        }
    }

    pub(crate) fn login(&self, login: Login) -> Session {
        let session = Session::from_login(login);
        info!(
            "Signed in as {} with role {}",
            session.email(),
            session.role()
        );
        _ = self.state.send_replace(Some(session.clone()));
        session
    }

    /// Ends the session. Returns whether there was one to end, so callers
    /// racing to invalidate the same session can tell who got there first.
    pub(crate) fn logout(&self) -> bool {
        let ended = self.state.send_if_modified(|state| state.take().is_some());
        if ended {
            info!("Signed out");
        }
        ended
    }

    pub(crate) fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    pub(crate) fn is_logged_in(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub(crate) fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub(crate) fn has_role(&self, role: Role) -> bool {
        self.state
            .borrow()
            .as_ref()
            .map_or(false, |session| session.role == role)
    }

    pub(crate) fn display_name(&self) -> String {
        self.state.borrow().as_ref().map_or_else(
            || GUEST_DISPLAY_NAME.to_owned(),
            |session| session.display_name.clone(),
        )
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn login(email: &str) -> Login {
        Login {
            email: email.to_owned(),
            password: SecretString::new("hunter2".to_owned()),
            token: Some(SecretString::new("t0ken".to_owned())),
        }
    }

    #[test]
    fn anonymous_by_default() {
        let store = SessionStore::new();

        assert!(!store.is_logged_in());
        assert!(!store.is_admin());
        assert_eq!(store.display_name(), "Guest");
        assert!(store.current().is_none());
    }

    #[test]
    fn role_follows_email() {
        let store = SessionStore::new();

        assert_eq!(store.login(login("root.admin@example.com")).role(), Role::Admin);
        assert!(store.is_admin());
        assert_eq!(store.login(login("copy-editor@example.com")).role(), Role::Editor);
        assert!(store.has_role(Role::Editor));
        assert!(!store.is_admin());
        assert_eq!(store.login(login("jane@example.com")).role(), Role::Viewer);
    }

    #[test]
    fn display_name_from_local_part() {
        let store = SessionStore::new();
        _ = store.login(login("jane_doe@example.com"));

        assert_eq!(store.display_name(), "Jane Doe");
    }

    #[test]
    fn generates_token_when_none_supplied() {
        let store = SessionStore::new();
        let session = store.login(Login {
            token: None,
            ..login("jane@example.com")
        });

        assert_eq!(session.token().expose_secret().len(), TOKEN_LENGTH);
    }

    #[test]
    fn logout_reports_the_transition_once() {
        let store = SessionStore::new();
        _ = store.login(login("jane@example.com"));
        let mut rx = store.subscribe();
        _ = rx.borrow_and_update();

        assert!(store.logout());
        assert!(!store.logout());
        assert!(!store.is_logged_in());
        assert!(rx.has_changed().unwrap_or(false));
        assert!(rx.borrow_and_update().is_none());
        assert!(!rx.has_changed().unwrap_or(true));
    }

    #[test]
    fn persisted_token_round_trips() -> crate::error::Result<()> {
        let store = SessionStore::new();
        let session = store.login(login("jane@example.com"));

        let restored: Session = serde_json::from_str(&serde_json::to_string(&session)?)?;
        assert_eq!(restored.token().expose_secret(), "t0ken");
        assert_eq!(restored.role(), Role::Viewer);
        assert!(SessionStore::restore(Some(restored)).is_logged_in());
        Ok(())
    }
}
