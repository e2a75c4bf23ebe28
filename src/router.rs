// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use log::debug;
use tokio::sync::watch;
use url::form_urlencoded;

pub(crate) const HOME: &str = "/";
pub(crate) const LISTING: &str = "/products";
pub(crate) const LOGIN: &str = "/auth/login";
pub(crate) const RETURN_URL: &str = "returnUrl";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    pub(crate) fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: vec![],
        }
    }

    /// Splits a path such as `/products?page=2` into its path and decoded
    /// query pairs. Anything after a `#` is ignored.
    pub(crate) fn parse(location: &str) -> Self {
        let location = location.split_once('#').map_or(location, |(l, _)| l);
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let path = match path.trim_end_matches('/') {
            "" => HOME,
            trimmed => trimmed,
        };
        Self {
            path: path.to_owned(),
            query: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub(crate) fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// Tracks where the user currently is. Guards, resolvers and the fault
/// interpreter redirect through it.
#[derive(Clone)]
pub(crate) struct Router {
    current: Arc<watch::Sender<Location>>,
}

impl Router {
    pub(crate) fn new() -> Self {
        let (current, _) = watch::channel(Location::new(HOME));
        Self {
            current: Arc::new(current),
        }
    }

    pub(crate) fn current(&self) -> Location {
        self.current.borrow().clone()
    }

    pub(crate) fn navigate(&self, location: Location) {
        debug!("Navigating to {}", location);
        _ = self.current.send_replace(location);
    }

    /// Sends the user to the login view, remembering where they were so they
    /// can come back after signing in. Already being on the login view keeps
    /// the destination that was remembered the first time.
    pub(crate) fn redirect_to_login(&self) -> Location {
        let current = self.current();
        if current.path() == LOGIN {
            return current;
        }
        self.redirect_to_login_from(&current)
    }

    /// Sends the user to the login view on the way to `destination`.
    pub(crate) fn redirect_to_login_from(&self, destination: &Location) -> Location {
        let login = Location::new(LOGIN).with_query(RETURN_URL, destination.to_string());
        self.navigate(login.clone());
        login
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
