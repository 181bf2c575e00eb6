//! Refresh Coordinator
//!
//! Exchanges the refresh credential for a new access credential. At most
//! one exchange runs at a time: the first caller starts it and stores a
//! shared future, later callers await that same future, and every one of
//! them receives the same outcome.
//!
//! The slot is cleared by the exchange itself after the hub has applied
//! the result, so a caller arriving afterwards already sees the new access
//! credential in the token store and does not start another exchange.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use platform::transport::HttpTransport;

use crate::application::hub::SessionHub;
use crate::domain::repository::SessionPersistence;
use crate::domain::value_object::credential::AccessToken;
use crate::error::RefreshFailure;
use crate::infra::auth_api::AuthApi;

pub type RefreshOutcome = Result<AccessToken, RefreshFailure>;

type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

struct InFlight {
    generation: u64,
    future: SharedRefresh,
}

type Slot = Arc<StdMutex<Option<InFlight>>>;

pub struct RefreshCoordinator<T, P> {
    hub: Arc<SessionHub<P>>,
    api: AuthApi<T>,
    in_flight: Slot,
    generation: AtomicU64,
    exchanges: AtomicU64,
}

impl<T, P> RefreshCoordinator<T, P>
where
    T: HttpTransport + Send + Sync + 'static,
    P: SessionPersistence + Send + Sync + 'static,
{
    pub fn new(hub: Arc<SessionHub<P>>, api: AuthApi<T>) -> Self {
        Self {
            hub,
            api,
            in_flight: Arc::new(StdMutex::new(None)),
            generation: AtomicU64::new(0),
            exchanges: AtomicU64::new(0),
        }
    }

    /// Number of exchanges started by this coordinator
    pub fn exchanges_started(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    /// Whether an exchange is currently running
    pub fn is_refreshing(&self) -> bool {
        lock(&self.in_flight).is_some()
    }

    /// Obtain a usable access credential after `rejected` was refused
    ///
    /// - exchange in flight: join it
    /// - the token store already holds a different credential (another
    ///   caller's exchange settled in between): return it, no exchange
    /// - otherwise start a new exchange
    pub async fn refresh_after(&self, rejected: Option<&AccessToken>) -> RefreshOutcome {
        let future = {
            let mut slot = lock(&self.in_flight);
            match slot.as_ref() {
                Some(flight) => {
                    tracing::debug!(generation = flight.generation, "Joining in-flight refresh");
                    flight.future.clone()
                }
                None => {
                    if let Some(current) = self.hub.tokens().current() {
                        if rejected != Some(&current) {
                            return Ok(current);
                        }
                    }
                    let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
                    let future = self.exchange(generation);
                    *slot = Some(InFlight {
                        generation,
                        future: future.clone(),
                    });
                    future
                }
            }
        };
        future.await
    }

    /// Refresh unconditionally (startup, explicit refresh)
    pub async fn refresh(&self) -> RefreshOutcome {
        let rejected = self.hub.tokens().current();
        self.refresh_after(rejected.as_ref()).await
    }

    fn exchange(&self, generation: u64) -> SharedRefresh {
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        let hub = Arc::clone(&self.hub);
        let api = self.api.clone();
        let slot = Arc::clone(&self.in_flight);

        async move {
            tracing::debug!(generation, "Refresh exchange started");
            let outcome = match hub.refresh_credential().await {
                None => {
                    tracing::info!("No refresh credential");
                    hub.fail_refresh(None).await;
                    Err(RefreshFailure::no_credential())
                }
                Some(used) => match api.refresh(&used).await {
                    Ok(grant) => hub.apply_refresh(&used, grant).await,
                    Err(e) => {
                        e.log();
                        let failure = RefreshFailure::from(&e);
                        hub.fail_refresh(Some(&used)).await;
                        Err(failure)
                    }
                },
            };

            {
                let mut slot = lock(&slot);
                if slot.as_ref().is_some_and(|f| f.generation == generation) {
                    *slot = None;
                }
            }

            tracing::debug!(generation, ok = outcome.is_ok(), "Refresh exchange settled");
            outcome
        }
        .boxed()
        .shared()
    }
}

// The slot only ever holds a complete value; a poisoned lock is still usable
fn lock(slot: &Slot) -> MutexGuard<'_, Option<InFlight>> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
