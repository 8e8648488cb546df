//! Long-polling loop for Telegram Bot API `getUpdates`.
//!
//! Updates are handled one at a time in arrival order. A failed update is
//! logged and skipped; a failed poll backs off and retries.

use std::future::Future;
use std::time::Duration;

use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::User;
use crate::infrastructure::config::PollingConfig;

use super::types::Update;
use super::TelegramAdapter;

/// Delay before the first retry of a failed poll
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Exponential backoff between failed polls
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(max: Duration) -> Self {
        Self {
            current: INITIAL_BACKOFF.min(max),
            max,
        }
    }

    /// Delay to wait now; doubles the next one up to the cap.
    /// A server-provided `retry_after` takes precedence.
    pub fn next_delay(&mut self, retry_after: Option<u64>) -> Duration {
        let delay = match retry_after {
            Some(secs) => Duration::from_secs(secs),
            None => self.current,
        };
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = INITIAL_BACKOFF.min(self.max);
    }
}

/// Drives the dispatcher from Telegram long polling
pub struct Poller<'a> {
    adapter: &'a TelegramAdapter,
    dispatcher: &'a MessageDispatcher,
    timeout_seconds: u64,
    backoff: Backoff,
    offset: i64,
}

impl<'a> Poller<'a> {
    pub fn new(adapter: &'a TelegramAdapter, dispatcher: &'a MessageDispatcher, config: &PollingConfig) -> Self {
        Self {
            adapter,
            dispatcher,
            timeout_seconds: config.timeout_seconds,
            backoff: Backoff::new(Duration::from_secs(config.max_backoff_seconds)),
            offset: 0,
        }
    }

    /// Offset of the next update to request
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Poll until `shutdown` resolves.
    ///
    /// Returns an error only when Telegram rejects the token, since no
    /// amount of retrying can recover from that.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), BotError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!("Starting message loop...");

        loop {
            let result = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping message loop");
                    return Ok(());
                }
                result = self.adapter.get_updates(self.offset, self.timeout_seconds) => result,
            };

            match result {
                Ok(updates) => {
                    self.backoff.reset();
                    if !updates.is_empty() {
                        tracing::debug!("Received {} updates", updates.len());
                    }
                    self.process_updates(updates).await;
                }
                Err(e) if e.is_unauthorized() => {
                    tracing::error!("Telegram rejected the bot token: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.backoff.next_delay(e.retry_after());
                    tracing::warn!("getUpdates failed: {}; retrying in {:?}", e, delay);

                    tokio::select! {
                        _ = &mut shutdown => {
                            tracing::info!("Shutdown requested, stopping message loop");
                            return Ok(());
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Dispatch a batch of updates and advance the offset past them.
    /// Returns how many replies were sent.
    pub async fn process_updates(&mut self, updates: Vec<Update>) -> usize {
        let mut replied = 0;

        for update in updates {
            // Acknowledge every update, even those we drop
            self.offset = self.offset.max(update.update_id + 1);

            let Some(msg) = update.message else {
                continue;
            };

            if msg.from.as_ref().is_some_and(|u| u.is_bot) {
                tracing::debug!("Ignoring message from bot in chat {}", msg.chat.id);
                continue;
            }

            // Media messages carry their command in the caption
            let text = msg.text.as_deref().or(msg.caption.as_deref());
            let sender = msg.from.as_ref().map(User::from);
            let message = self
                .dispatcher
                .parser()
                .parse(msg.chat.id.to_string(), text, sender);

            if self.dispatcher.handle(self.adapter, &message).await {
                replied += 1;
            }
        }

        replied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_cap() {
        let mut backoff = Backoff::new(Duration::from_secs(5));
        let delays: Vec<u64> = (0..5).map(|_| backoff.next_delay(None).as_secs()).collect();
        assert_eq!(delays, [1, 2, 4, 5, 5]);

        backoff.reset();
        assert_eq!(backoff.next_delay(None), Duration::from_secs(1));
    }

    #[test]
    fn backoff_saturates_with_huge_cap() {
        let mut backoff = Backoff::new(Duration::from_secs(u64::MAX));
        for _ in 0..80 {
            backoff.next_delay(None);
        }
        assert_eq!(backoff.next_delay(None), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn backoff_honors_retry_after() {
        let mut backoff = Backoff::new(Duration::from_secs(30));
        assert_eq!(backoff.next_delay(Some(12)), Duration::from_secs(12));
    }
}
