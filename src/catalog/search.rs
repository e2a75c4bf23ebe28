// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Search-as-you-type over a stream of terms.

use std::time::Duration;

use futures_util::{
    future::{BoxFuture, Fuse, FusedFuture as _, OptionFuture},
    FutureExt as _, Stream, StreamExt as _,
};
use log::trace;
use tokio::{
    sync::mpsc,
    time::{self, Instant},
};

use crate::error::{Internal, Result};

use super::{Product, ProductService};

pub(crate) const DEBOUNCE_MS: u64 = 300;
pub(crate) const DEBOUNCE: Duration = Duration::from_millis(DEBOUNCE_MS);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Results {
    pub(crate) term: String,
    pub(crate) products: Vec<Product>,
}

/// Feeds `terms` to [`ProductService::search`] and sends the answers to
/// `results`.
///
/// A term is only searched for once no newer term has arrived for `debounce`,
/// and only if it differs from the term searched for last. Starting a search
/// abandons the previous one, so every result sent belongs to the newest
/// search. Returns when `terms` ends and the last search has answered.
pub(crate) async fn run<S>(
    service: &ProductService,
    terms: S,
    debounce: Duration,
    results: mpsc::Sender<Results>,
) -> Result<()>
where
    S: Stream<Item = String> + Send,
{
    let mut terms = Box::pin(terms.fuse());
    let mut open = true;
    let mut pending: Option<String> = None;
    let mut accepted: Option<String> = None;
    let mut in_flight: OptionFuture<Fuse<BoxFuture<'_, Results>>> = None.into();

    let quiet = time::sleep(debounce);
    tokio::pin!(quiet);

    loop {
        tokio::select! {
            term = terms.next(), if open => match term {
                Some(term) => {
                    trace!("Search term {:?} received", term);
                    pending = Some(term);
                    quiet.as_mut().reset(Instant::now() + debounce);
                }
                None => open = false,
            },
            () = &mut quiet, if pending.is_some() => {
                let Some(term) = pending.take() else { continue };
                if accepted.as_ref() == Some(&term) {
                    trace!("Search term {:?} is unchanged", term);
                    continue;
                }

                accepted = Some(term.clone());
                in_flight = Some(
                    async move {
                        let products = service.search(&term).await;
                        Results { term, products }
                    }
                    .boxed()
                    .fuse(),
                )
                .into();
            },
            Some(found) = &mut in_flight, if !in_flight.is_terminated() => {
                results.send(found).await.map_err(Internal::from)?;
                in_flight = None.into();
            },
            else => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_stream::wrappers::ReceiverStream;

    use crate::{
        catalog::{tests::service, FallbackPolicy},
        http::{
            testing::{json, MockTransport},
            StatusCode,
        },
    };

    use super::*;

    async fn search(
        transport: &Arc<MockTransport>,
        script: Vec<(u64, &'static str)>,
    ) -> Result<Vec<Results>> {
        let service = service(transport, FallbackPolicy::Always);
        let (terms_tx, terms_rx) = mpsc::channel(16);
        let (results_tx, mut results_rx) = mpsc::channel(16);

        let typist = tokio::spawn(async move {
            for (after_ms, term) in script {
                time::sleep(Duration::from_millis(after_ms)).await;
                if terms_tx.send(term.to_owned()).await.is_err() {
                    break;
                }
            }
        });
        run(&service, ReceiverStream::new(terms_rx), DEBOUNCE, results_tx).await?;
        typist.await?;

        let mut delivered = vec![];
        while let Ok(found) = results_rx.try_recv() {
            delivered.push(found);
        }
        Ok(delivered)
    }

    fn echo() -> Arc<MockTransport> {
        MockTransport::delayed(Duration::from_millis(50), |req| {
            let term = req
                .query
                .iter()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            Ok(json(
                StatusCode::OK,
                &serde_json::json!([{
                    "id": 1,
                    "name": term,
                    "price": 1.0,
                    "stock": 1,
                    "category": "Audio",
                }]),
            ))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_settled_term_is_searched() -> Result<()> {
        let transport = echo();

        let delivered = search(&transport, vec![(0, "a"), (100, "ab"), (100, "abc")]).await?;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].term, "abc");
        assert_eq!(delivered[0].products[0].name, "abc");
        assert_eq!(transport.count(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_terms_are_searched_once() -> Result<()> {
        let transport = echo();

        let delivered = search(&transport, vec![(0, "air"), (400, "air")]).await?;
        assert_eq!(delivered.len(), 1);
        assert_eq!(transport.count(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn newer_terms_supersede_slow_searches() -> Result<()> {
        let transport = MockTransport::delayed(Duration::from_secs(2), |_| {
            Ok(json(StatusCode::OK, &serde_json::json!([])))
        });

        let delivered = search(&transport, vec![(0, "air"), (400, "mac")]).await?;
        assert_eq!(
            delivered.iter().map(|r| r.term.as_str()).collect::<Vec<_>>(),
            vec!["mac"]
        );
        assert_eq!(transport.count(), 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn blank_terms_answer_empty_without_a_call() -> Result<()> {
        let transport = echo();

        let delivered = search(&transport, vec![(0, "  ")]).await?;
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].products.is_empty());
        assert_eq!(transport.count(), 0);
        Ok(())
    }
}
