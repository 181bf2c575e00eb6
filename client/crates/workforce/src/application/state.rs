//! Shared State Container Plumbing
//!
//! Every container publishes its state through a `watch` channel and
//! tracks the same two flags: an operation in progress, and the last
//! failure.

use std::future::Future;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::{ErrorReport, WorkforceResult};

/// Progress of the container's latest operation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadStatus {
    pub loading: bool,
    pub error: Option<ErrorReport>,
}

/// State with a [`LoadStatus`]
pub trait Tracked {
    fn load_status(&mut self) -> &mut LoadStatus;
}

/// Run `work`, publishing progress, and `apply` its result on success
///
/// The error of a failed operation is kept in state and also returned.
pub(crate) async fn tracked<S, T, F>(
    state: &watch::Sender<S>,
    work: F,
    apply: impl FnOnce(&mut S, &T),
) -> WorkforceResult<T>
where
    S: Tracked,
    F: Future<Output = WorkforceResult<T>>,
{
    state.send_modify(|s| {
        let status = s.load_status();
        status.loading = true;
        status.error = None;
    });

    let result = work.await;

    state.send_modify(|s| {
        match &result {
            Ok(value) => apply(s, value),
            Err(e) => s.load_status().error = Some(ErrorReport::from(e)),
        }
        s.load_status().loading = false;
    });
    if let Err(e) = &result {
        e.log();
    }
    result
}
