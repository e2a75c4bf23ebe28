// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Weak};

use futures_util::{
    future::{BoxFuture, Shared},
    lock::Mutex,
    FutureExt as _,
};

type Load<T> = Shared<BoxFuture<'static, T>>;

/// A handle on a cached value. The value stays cached for as long as at least
/// one handle is alive.
pub(crate) struct Subscription<T: Clone> {
    load: Arc<Load<T>>,
}

impl<T: Clone> Subscription<T> {
    /// Waits for the load this handle shares to finish. Every handle on the
    /// same load sees the same value.
    pub(crate) async fn value(&self) -> T {
        (*self.load).clone().await
    }
}

impl<T: Clone> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            load: Arc::clone(&self.load),
        }
    }
}

/// Holds at most one load of a value. The cache only keeps a weak reference,
/// so dropping the last [`Subscription`] forgets the value.
pub(crate) struct Cache<T: Clone> {
    slot: Mutex<Weak<Load<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Cache<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(Weak::new()),
        }
    }

    /// Joins the current load, or starts a new one with `load` if nothing is
    /// cached.
    pub(crate) async fn subscribe<F>(&self, load: F) -> Subscription<T>
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(current) = slot.upgrade() {
            return Subscription { load: current };
        }

        let fresh = Arc::new(load().shared());
        *slot = Arc::downgrade(&fresh);
        Subscription { load: fresh }
    }

    pub(crate) async fn clear(&self) {
        *self.slot.lock().await = Weak::new();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting(loads: &Arc<AtomicUsize>) -> impl FnOnce() -> BoxFuture<'static, usize> {
        let loads = Arc::clone(loads);
        move || async move { loads.fetch_add(1, Ordering::SeqCst) + 1 }.boxed()
    }

    #[tokio::test]
    async fn subscribers_share_one_load() {
        let cache = Cache::new();
        let loads = Arc::new(AtomicUsize::new(0));

        let first = cache.subscribe(counting(&loads)).await;
        let second = cache.subscribe(counting(&loads)).await;
        assert_eq!(first.value().await, 1);
        assert_eq!(second.value().await, 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn last_subscriber_releases_the_value() {
        let cache = Cache::new();
        let loads = Arc::new(AtomicUsize::new(0));

        let first = cache.subscribe(counting(&loads)).await;
        assert_eq!(first.value().await, 1);
        drop(first);

        let second = cache.subscribe(counting(&loads)).await;
        assert_eq!(second.value().await, 2);
    }

    #[tokio::test]
    async fn clearing_starts_over() {
        let cache = Cache::new();
        let loads = Arc::new(AtomicUsize::new(0));

        let first = cache.subscribe(counting(&loads)).await;
        assert_eq!(first.value().await, 1);
        cache.clear().await;

        let second = cache.subscribe(counting(&loads)).await;
        assert_eq!(second.value().await, 2);
        assert_eq!(first.value().await, 1);
    }
}
