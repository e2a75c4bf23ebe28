// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use clap::ValueEnum;
use inflector::Inflector as _;
use log::warn;
use serde::Serialize;
use serde_with::{serde_as, DurationMilliSeconds};
use tokio::sync::broadcast;

const CAPACITY: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Kind {
    Success,
    Error,
    Info,
    Warning,
}

impl Kind {
    const fn duration(self) -> Duration {
        Duration::from_millis(match self {
            Self::Success | Self::Info => 3000,
            Self::Warning => 4000,
            Self::Error => 5000,
        })
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.to_possible_value().ok_or(std::fmt::Error)?;
        write!(f, "{}", value.get_name().to_title_case())
    }
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Notification {
    #[serde(rename = "type")]
    kind: Kind,
    message: String,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<Duration>,
}

impl Notification {
    pub(crate) fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: Some(kind.duration()),
        }
    }

    pub(crate) const fn kind(&self) -> Kind {
        self.kind
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

/// Fan-out of transient user notices. Emitting never fails: a notice nobody is
/// listening for is simply dropped.
#[derive(Clone)]
pub(crate) struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub(crate) fn notify(&self, notification: Notification) {
        _ = self.tx.send(notification);
    }

    pub(crate) fn success(&self, message: impl Into<String>) {
        self.notify(Notification::new(Kind::Success, message));
    }

    pub(crate) fn error(&self, message: impl Into<String>) {
        self.notify(Notification::new(Kind::Error, message));
    }

    pub(crate) fn info(&self, message: impl Into<String>) {
        self.notify(Notification::new(Kind::Info, message));
    }

    pub(crate) fn warning(&self, message: impl Into<String>) {
        self.notify(Notification::new(Kind::Warning, message));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum NoticeFormat {
    Text,
    Json,
}

/// Writes notices to standard error until every [`Notifier`] feeding `rx` is
/// gone.
pub(crate) async fn print(mut rx: broadcast::Receiver<Notification>, format: NoticeFormat) {
    loop {
        match rx.recv().await {
            Ok(notification) => match format {
                NoticeFormat::Text => {
                    eprintln!("{}: {}", notification.kind(), notification.message());
                }
                NoticeFormat::Json => match serde_json::to_string(&notification) {
                    Ok(line) => eprintln!("{line}"),
                    Err(e) => warn!("We could not encode a notification: {}", e),
                },
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("{} notifications were dropped before they could be shown", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
        let mut notifications = vec![];
        while let Ok(notification) = rx.try_recv() {
            notifications.push(notification);
        }
        notifications
    }

    #[test]
    fn durations_by_kind() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        notifier.success("saved");
        notifier.error("broken");
        notifier.info("fyi");
        notifier.warning("careful");

        let durations = drain(&mut rx)
            .into_iter()
            .map(|n| n.duration.map(|d| d.as_millis()))
            .collect::<Vec<_>>();
        assert_eq!(
            durations,
            vec![Some(3000), Some(5000), Some(3000), Some(4000)]
        );
    }

    #[test]
    fn serializes_as_ui_event() -> crate::error::Result<()> {
        let value = serde_json::to_value(Notification::new(Kind::Warning, "Session expired"))?;

        assert_eq!(
            value,
            serde_json::json!({
                "type": "warning",
                "message": "Session expired",
                "duration": 4000,
            })
        );
        Ok(())
    }

    #[test]
    fn emitting_without_listeners_is_fine() {
        Notifier::new().error("nobody hears this");
    }
}
