// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Which view each location leads to, and what has to hold before the user
//! may enter it.

use log::{debug, warn};

use crate::{
    catalog::Product,
    resolver::ProductResolver,
    router::{Location, Router, LISTING, LOGIN},
    session::SessionStore,
};

const MAX_REDIRECTS: usize = 8;
const WILDCARD: &str = "**";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum View {
    Home,
    Listing,
    Detail,
    New,
    Edit,
    Dashboard,
    Admin,
    Login,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Guard {
    /// Lets signed-in users in and sends everyone else to the login view.
    Authenticated,
    /// Only admins match the route. Anyone else falls through to the next
    /// route with the same path.
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Param(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Target {
    View(View),
    Redirect(&'static str),
}

#[derive(Clone, Debug)]
pub(crate) struct Route {
    pattern: Option<Vec<Segment>>,
    target: Target,
    guards: Vec<Guard>,
    resolve: Option<&'static str>,
}

impl Route {
    fn parse_pattern(pattern: &'static str) -> Option<Vec<Segment>> {
        (pattern != WILDCARD).then(|| {
            pattern
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(|segment| match segment.strip_prefix(':') {
                    Some(name) => Segment::Param(name),
                    None => Segment::Literal(segment),
                })
                .collect()
        })
    }

    /// A route to `view`. The pattern `**` matches every path.
    pub(crate) fn new(pattern: &'static str, view: View) -> Self {
        Self {
            pattern: Self::parse_pattern(pattern),
            target: Target::View(view),
            guards: vec![],
            resolve: None,
        }
    }

    pub(crate) fn redirect(pattern: &'static str, to: &'static str) -> Self {
        Self {
            pattern: Self::parse_pattern(pattern),
            target: Target::Redirect(to),
            guards: vec![],
            resolve: None,
        }
    }

    pub(crate) fn guarded(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Loads the product named by the path parameter `param` before entering.
    pub(crate) fn resolving(mut self, param: &'static str) -> Self {
        self.resolve = Some(param);
        self
    }

    fn matches(&self, path: &str) -> Option<Params> {
        let Some(pattern) = self.pattern.as_ref() else {
            return Some(Params::default());
        };

        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        if segments.len() != pattern.len() {
            return None;
        }

        let mut params = Params::default();
        for (expected, &actual) in pattern.iter().zip(&segments) {
            match *expected {
                Segment::Literal(literal) if literal == actual => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.0.push((name, actual.to_owned())),
            }
        }
        Some(params)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Params(Vec<(&'static str, String)>);

impl Params {
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|&&(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Navigation {
    Entered {
        view: View,
        location: Location,
        params: Params,
        product: Option<Product>,
    },
    /// The destination turned the user away; they ended up here instead.
    Redirected(Location),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a route. Routes are tried in the order they were registered.
    pub(crate) fn register(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub(crate) fn standard() -> Self {
        Self::new()
            .register(Route::redirect("/", "/home"))
            .register(Route::new("/home", View::Home))
            .register(Route::new(LISTING, View::Listing))
            .register(Route::new("/products/new", View::New).guarded(Guard::Authenticated))
            .register(Route::new("/products/:id", View::Detail).resolving("id"))
            .register(
                Route::new("/products/:id/edit", View::Edit)
                    .guarded(Guard::Authenticated)
                    .resolving("id"),
            )
            .register(Route::new("/dashboard", View::Dashboard).guarded(Guard::Authenticated))
            .register(Route::new("/admin", View::Admin).guarded(Guard::Admin))
            .register(Route::redirect("/admin", LISTING))
            .register(Route::new(LOGIN, View::Login))
            .register(Route::new(WILDCARD, View::Home))
    }

    fn find(&self, path: &str, session: &SessionStore) -> Option<(&Route, Params)> {
        self.routes.iter().find_map(|route| {
            let params = route.matches(path)?;
            if route.guards.contains(&Guard::Admin) && !session.is_admin() {
                debug!("{} needs an admin, so we are trying the next route", path);
                return None;
            }
            Some((route, params))
        })
    }

    /// Takes the user to `target`, following redirects, applying guards and
    /// loading whatever the view needs first.
    pub(crate) async fn navigate(
        &self,
        mut target: Location,
        session: &SessionStore,
        router: &Router,
        resolver: &ProductResolver<'_>,
    ) -> Navigation {
        for _ in 0..MAX_REDIRECTS {
            let Some((route, params)) = self.find(target.path(), session) else {
                break;
            };

            let view = match route.target {
                Target::Redirect(to) => {
                    debug!("{} redirects to {}", target, to);
                    target = Location::new(to);
                    continue;
                }
                Target::View(view) => view,
            };

            if route.guards.contains(&Guard::Authenticated) && !session.is_logged_in() {
                return Navigation::Redirected(router.redirect_to_login_from(&target));
            }

            let product = match route.resolve {
                Some(param) => match resolver.resolve(params.get(param)).await {
                    Some(product) => Some(product),
                    None => return Navigation::Redirected(router.current()),
                },
                None => None,
            };

            router.navigate(target.clone());
            return Navigation::Entered {
                view,
                location: target,
                params,
                product,
            };
        }

        warn!("Navigating to {} did not lead to any view", target);
        Navigation::Redirected(router.current())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        catalog::{tests::service, FallbackPolicy, ProductService},
        http::testing::MockTransport,
        notify::Notifier,
        router::RETURN_URL,
        session::tests::login,
    };

    use super::*;

    struct Harness {
        products: ProductService,
        notifier: Notifier,
        router: Router,
        session: SessionStore,
        transport: std::sync::Arc<MockTransport>,
    }

    impl Harness {
        fn new() -> Self {
            let transport = MockTransport::unreachable();
            Self {
                products: service(&transport, FallbackPolicy::Always),
                notifier: Notifier::new(),
                router: Router::new(),
                session: SessionStore::new(),
                transport,
            }
        }

        async fn open(&self, location: &str) -> Navigation {
            let resolver = ProductResolver::new(&self.products, &self.notifier, &self.router);
            RouteTable::standard()
                .navigate(Location::parse(location), &self.session, &self.router, &resolver)
                .await
        }
    }

    fn entered_view(navigation: &Navigation) -> Option<View> {
        match *navigation {
            Navigation::Entered { view, .. } => Some(view),
            Navigation::Redirected(_) => None,
        }
    }

    #[test]
    fn patterns_capture_params() {
        let route = Route::new("/products/:id/edit", View::Edit);

        assert_eq!(
            route.matches("/products/12/edit").as_ref().and_then(|p| p.get("id")),
            Some("12")
        );
        assert!(route.matches("/products/12").is_none());
        assert!(route.matches("/orders/12/edit").is_none());
        assert!(Route::new(WILDCARD, View::Home).matches("/any/thing").is_some());
    }

    #[tokio::test]
    async fn root_redirects_home() {
        let harness = Harness::new();

        assert_eq!(entered_view(&harness.open("/").await), Some(View::Home));
        assert_eq!(harness.router.current().path(), "/home");
        assert_eq!(entered_view(&harness.open("/nowhere").await), Some(View::Home));
    }

    #[tokio::test]
    async fn literal_routes_win_over_params() {
        let harness = Harness::new();
        _ = harness.session.login(login("jane@example.com"));

        assert_eq!(entered_view(&harness.open("/products/new").await), Some(View::New));
        assert_eq!(harness.transport.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn detail_view_carries_its_product() {
        let harness = Harness::new();

        match harness.open("/products/5").await {
            Navigation::Entered {
                view,
                product,
                params,
                ..
            } => {
                assert_eq!(view, View::Detail);
                assert_eq!(params.get("id"), Some("5"));
                assert_eq!(product.map(|p| p.name), Some("MacBook Air M3".to_owned()));
            }
            Navigation::Redirected(location) => panic!("redirected to {location}"),
        }
        assert_eq!(harness.router.current().path(), "/products/5");
    }

    #[tokio::test]
    async fn bad_ids_end_on_the_listing() {
        let harness = Harness::new();

        for location in ["/products/-1", "/products/abc"] {
            let navigation = harness.open(location).await;
            assert_eq!(navigation, Navigation::Redirected(Location::new(LISTING)));
        }
        assert_eq!(harness.transport.count(), 0);
    }

    #[tokio::test]
    async fn anonymous_users_are_sent_to_login() {
        let harness = Harness::new();

        match harness.open("/products/2/edit").await {
            Navigation::Redirected(location) => {
                assert_eq!(location.path(), LOGIN);
                assert_eq!(location.query_value(RETURN_URL), Some("/products/2/edit"));
            }
            Navigation::Entered { view, .. } => panic!("entered {view:?}"),
        }
        assert_eq!(harness.transport.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn signed_in_users_may_edit() {
        let harness = Harness::new();
        _ = harness.session.login(login("editor@example.com"));

        assert_eq!(entered_view(&harness.open("/products/2/edit").await), Some(View::Edit));
    }

    #[tokio::test]
    async fn admin_route_falls_through_for_everyone_else() {
        let harness = Harness::new();
        _ = harness.session.login(login("jane@example.com"));
        assert_eq!(entered_view(&harness.open("/admin").await), Some(View::Listing));

        _ = harness.session.login(login("admin@example.com"));
        assert_eq!(entered_view(&harness.open("/admin").await), Some(View::Admin));
    }

    #[tokio::test]
    async fn redirect_loops_stop() {
        let harness = Harness::new();
        let resolver = ProductResolver::new(&harness.products, &harness.notifier, &harness.router);
        let table = RouteTable::new()
            .register(Route::redirect("/a", "/b"))
            .register(Route::redirect("/b", "/a"));

        let navigation = table
            .navigate(Location::new("/a"), &harness.session, &harness.router, &resolver)
            .await;
        assert_eq!(navigation, Navigation::Redirected(Location::new("/")));
    }
}
