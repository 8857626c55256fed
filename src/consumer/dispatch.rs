//! Dispatch loop: one consumer per queue, routing events to handlers.
//!
//! Each queue gets its own sequential loop; the two loops run as
//! independent tasks sharing the database handle. Wakeups come from
//! Postgres NOTIFY (channel named after the queue) with a poll-interval
//! fallback, so the loops stay responsive even if a notification is lost.

use crate::codec;
use crate::consumer::{EXTINGUISH_QUEUE, REGISTER_QUEUE, registrar, updater};
use crate::db::Db;
use crate::db::pgmq::QueueMessage;
use crate::error::{Error, Result};
use crate::telemetry::message::start_message_span;
use crate::telemetry::metrics;
use opentelemetry::KeyValue;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{Instrument, error, info, warn};

/// Configuration for the dispatch loop.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Visibility timeout (seconds) for pgmq reads. An unacknowledged
    /// message reappears after this long.
    pub visibility_timeout: i32,
    /// Poll interval fallback when no NOTIFY arrives.
    pub poll_interval: std::time::Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            visibility_timeout: 30,
            poll_interval: std::time::Duration::from_secs(5),
        }
    }
}

/// The dispatch loop. Owns both queue subscriptions until shutdown.
pub struct Dispatcher {
    db: Arc<Db>,
    config: DispatchConfig,
    shutdown: Arc<Notify>,
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            config: self.config.clone(),
            shutdown: Arc::clone(&self.shutdown),
        }
    }
}

impl Dispatcher {
    pub fn new(db: Arc<Db>, config: DispatchConfig) -> Self {
        Self {
            db,
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Signal both consumer loops to shut down.
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }

    /// Run both consumer loops until shutdown.
    pub async fn run(&self) -> Result<()> {
        let register = {
            let d = self.clone();
            tokio::spawn(async move { d.consume(REGISTER_QUEUE).await })
        };
        let extinguish = {
            let d = self.clone();
            tokio::spawn(async move { d.consume(EXTINGUISH_QUEUE).await })
        };

        let (r, e) = tokio::join!(register, extinguish);
        r.map_err(|e| Error::Other(format!("register consumer panicked: {e}")))??;
        e.map_err(|e| Error::Other(format!("extinguish consumer panicked: {e}")))??;
        Ok(())
    }

    /// Sequential consumer loop for one queue.
    async fn consume(&self, queue: &str) -> Result<()> {
        let mut listener = sqlx::postgres::PgListener::connect_with(self.db.pool()).await?;
        listener.listen(queue).await?;

        info!(queue, "consumer started");

        loop {
            // Wait for: shutdown, notification, or poll timeout
            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!(queue, "consumer shutting down");
                    return Ok(());
                }
                notif = listener.recv() => {
                    if let Err(e) = notif {
                        warn!(queue, "listener error: {e}, falling back to poll");
                    }
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            // Drain whatever is available (whether notified or polling)
            if let Err(e) = self.drain(queue).await {
                error!(queue, "drain error: {e}");
            }
        }
    }

    /// Read and handle messages until the queue is empty.
    async fn drain(&self, queue: &str) -> Result<()> {
        while let Some(msg) = self
            .db
            .read_message(queue, self.config.visibility_timeout)
            .await?
        {
            let span = start_message_span(queue, msg.msg_id);
            self.handle_message(queue, msg).instrument(span).await?;
        }
        Ok(())
    }

    /// Decode, route, and acknowledge one message.
    ///
    /// Ack-after-success: the message is deleted only once the handler's
    /// store mutation has succeeded, so a transient store failure leaves it
    /// in the queue for redelivery (both handlers are idempotent).
    /// Permanently malformed payloads are the exception — redelivery cannot
    /// fix them, so they are logged, counted, and acknowledged.
    async fn handle_message(&self, queue: &str, msg: QueueMessage) -> Result<()> {
        let outcome = self.route(queue, &msg).await;

        match outcome {
            Ok(()) => self.db.ack_message(queue, msg.msg_id).await,
            Err(e) if e.is_permanent() => {
                error!(queue, msg_id = msg.msg_id, "dropping malformed message: {e}");
                metrics::decode_failures().add(1, &[KeyValue::new("queue", queue.to_string())]);
                self.db.ack_message(queue, msg.msg_id).await
            }
            Err(e) => {
                error!(
                    queue,
                    msg_id = msg.msg_id,
                    read_ct = msg.read_ct,
                    "handler failed, leaving message for redelivery: {e}"
                );
                Ok(())
            }
        }
    }

    async fn route(&self, queue: &str, msg: &QueueMessage) -> Result<()> {
        let event = codec::decode_value(msg.payload.clone())?;

        match queue {
            REGISTER_QUEUE => registrar::handle(&self.db, event).await,
            EXTINGUISH_QUEUE => updater::handle(&self.db, event).await,
            other => Err(Error::Other(format!("no handler for queue {other}"))),
        }
    }
}
