use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use sqlx::postgres::PgListener;
use sqlx::{Pool, Postgres};

/// Channel the waitlist table's trigger NOTIFYs on.
pub const WAITLIST_CHANNEL: &str = "waitlist_changes";

type Handler = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    handlers: Mutex<HashMap<u64, Handler>>,
    next_id: AtomicU64,
}

/// Fan-out point for "the waitlist changed" signals. Notifications carry no
/// payload; every handler must treat a firing as "re-fetch", never as a
/// delta, and must stay safe to run more often than strictly needed.
#[derive(Clone, Default)]
pub struct ChangeFeed {
    registry: Arc<Registry>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        ChangeFeed::default()
    }

    /// Register a handler. The handler stays registered until the returned
    /// subscription is released, which happens exactly once.
    pub fn subscribe(&self, handler: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .handlers
            .lock()
            .unwrap()
            .insert(id, Box::new(handler));

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Fire every registered handler once.
    pub fn notify(&self) {
        let handlers = self.registry.handlers.lock().unwrap();
        for handler in handlers.values() {
            handler();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.handlers.lock().unwrap().len()
    }

    /// Listen for NOTIFYs from the waitlist trigger and fan them out. On a
    /// dropped connection the listener reconnects and fires once anyway, so
    /// consumers re-fetch anything they missed while disconnected.
    pub async fn run(self, pool: Pool<Postgres>) -> Result<(), sqlx::Error> {
        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(WAITLIST_CHANNEL).await?;

        tracing::info!("listening for waitlist changes on '{}'", WAITLIST_CHANNEL);

        loop {
            match listener.recv().await {
                Ok(_) => self.notify(),
                Err(err) => {
                    tracing::error!("waitlist change listener error: {}", err);
                    self.notify();
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }
}

pub struct Subscription {
    registry: Weak<Registry>,
    id: u64,
}

impl Subscription {
    /// Release the registration now. Dropping the subscription does the
    /// same; either way the handler is removed exactly once.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.handlers.lock().unwrap().remove(&self.id);
        }
    }
}
