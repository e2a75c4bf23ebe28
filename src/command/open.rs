// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{
    app::App,
    catalog::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, LISTING_PAGE_SIZE},
    error::Result,
    router::{Location, RETURN_URL},
    routes::{Navigation, View},
};

/// Go to a location the way a browser would, passing through the same guards
/// and loading the same data, and show what ends up on screen.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The location to open, such as `/products/3` or `/products?page=2`.
    #[clap()]
    location: String,
}

pub(crate) async fn render(app: &App, navigation: Navigation) -> String {
    let (view, location, product) = match navigation {
        Navigation::Redirected(location) => return format!("Redirected to {location}"),
        Navigation::Entered {
            view,
            location,
            product,
            ..
        } => (view, location, product),
    };

    match view {
        View::Home => format!("Welcome, {}!", app.session.display_name()),
        View::Listing => {
            let page = location
                .query_value("page")
                .and_then(|page| page.parse().ok())
                .unwrap_or(DEFAULT_PAGE);
            super::page_table(
                &app.products
                    .get_all_paginated(page, LISTING_PAGE_SIZE)
                    .await,
            )
        }
        View::Detail => product
            .as_ref()
            .map_or_else(String::new, super::product_card),
        View::Edit => product.as_ref().map_or_else(String::new, |product| {
            format!(
                "{}\nChange it with `update {} --name ...`.",
                super::product_card(product),
                product.id
            )
        }),
        View::New => "Add a product with `create --name ...`.".to_owned(),
        View::Dashboard => {
            let role = app
                .session
                .current()
                .map_or_else(String::new, |session| format!(" ({})", session.role()));
            let categories = app.products.get_categories().await.value().await;
            format!(
                "Signed in as {}{}\nCategories: {}",
                app.session.display_name(),
                role,
                categories.join(", ")
            )
        }
        View::Admin => super::products_table(
            &app.products
                .get_all(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
                .await,
        ),
        View::Login => match location.query_value(RETURN_URL) {
            Some(destination) => format!("Sign in with `login` to continue to {destination}."),
            None => "Sign in with `login`.".to_owned(),
        },
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        let navigation = app.open(Location::parse(&self.location)).await;
        println!("{}", render(app, navigation).await);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        app::tests::app,
        http::testing::MockTransport,
        session::tests::login,
    };

    use super::*;

    async fn open(app: &App, location: &str) -> String {
        render(app, app.open(Location::parse(location)).await).await
    }

    #[tokio::test(start_paused = true)]
    async fn detail_renders_offline() {
        let app = app(&MockTransport::unreachable());

        assert!(open(&app, "/products/2").await.contains("iPhone 15 Pro"));
    }

    #[tokio::test]
    async fn guarded_views_point_at_login() {
        let app = app(&MockTransport::unreachable());

        assert_eq!(
            open(&app, "/dashboard").await,
            "Redirected to /auth/login?returnUrl=%2Fdashboard"
        );
        assert_eq!(
            open(&app, "/auth/login?returnUrl=%2Fdashboard").await,
            "Sign in with `login` to continue to /dashboard."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dashboard_greets_the_user() {
        let app = app(&MockTransport::unreachable());
        _ = app.session.login(login("admin@example.com"));

        let screen = open(&app, "/dashboard").await;
        assert!(screen.starts_with("Signed in as Admin (Admin)"), "{screen}");
        assert!(screen.contains("Laptop, Phone, Audio, Tablet, Accessories"));
    }

    #[tokio::test(start_paused = true)]
    async fn listing_reads_the_page_from_the_query() {
        let app = app(&MockTransport::unreachable());

        let screen = open(&app, "/products?page=2").await;
        assert!(screen.ends_with("Page 2 of 1 (5 products)"), "{screen}");
    }
}
