// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::debug;

use crate::{
    catalog::ProductService,
    config::Config,
    error::Result,
    http::{Credentials, FaultInterpreter, Pipeline, Reqwest, Retry, Transport},
    notify::Notifier,
    resolver::ProductResolver,
    router::{Location, Router},
    routes::{Navigation, RouteTable},
    session::SessionStore,
};

/// Everything a command needs, wired together once.
pub(crate) struct App {
    pub(crate) session: SessionStore,
    pub(crate) notifier: Notifier,
    pub(crate) router: Router,
    pub(crate) products: ProductService,
    pub(crate) routes: RouteTable,
}

impl App {
    pub(crate) fn new(config: &Config, session: SessionStore) -> Result<Self> {
        let transport = Reqwest::new(config.api_url.clone(), config.timeout())?;
        Ok(Self::with_transport(config, session, transport))
    }

    /// Builds the pipeline in front of `transport`. Credentials are attached
    /// first; retries happen innermost so a failure is only interpreted once
    /// every attempt has been made.
    pub(crate) fn with_transport<T: Transport + 'static>(
        config: &Config,
        session: SessionStore,
        transport: T,
    ) -> Self {
        let notifier = Notifier::new();
        let router = Router::new();
        let pipeline = Pipeline::new(transport)
            .with(Credentials::new(session.clone()))
            .with(FaultInterpreter::new(
                session.clone(),
                notifier.clone(),
                router.clone(),
            ))
            .with(Retry::new(config.retry_backoff()));
        debug!(
            "Talking to {} with {} retries; fallback policy: {}",
            config.api_url, config.retries, config.fallback
        );

        Self {
            products: ProductService::new(pipeline, config.retries, config.fallback),
            session,
            notifier,
            router,
            routes: RouteTable::standard(),
        }
    }

    pub(crate) fn resolver(&self) -> ProductResolver<'_> {
        ProductResolver::new(&self.products, &self.notifier, &self.router)
    }

    pub(crate) async fn open(&self, target: Location) -> Navigation {
        self.routes
            .navigate(target, &self.session, &self.router, &self.resolver())
            .await
    }
}
