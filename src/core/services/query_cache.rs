use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Notify;

use crate::core::errors::{OverseeError, Result};
use crate::core::models::query::{
    ErrorInfo, QueryDocument, QueryKey, QueryRequest, QueryResponse, QueryResult, ResultShape,
};
use crate::core::traits::transport::QueryTransport;

type Observer<T> = Rc<dyn Fn(&QueryResult<T>)>;

/// Handle returned by `QueryCache::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Per-key cache state.
struct Slot<T> {
    /// `None` once invalidated with nothing in flight.
    result: Option<QueryResult<T>>,
    /// Bumped on every fetch and every invalidation. A response is only
    /// written if its fetch still holds the current value.
    seq: u64,
    in_flight: Option<u64>,
    settled: Rc<Notify>,
}

enum Step<T> {
    Hit(QueryResult<T>),
    Join(Rc<Notify>),
    Fetch { seq: u64, announce: bool },
}

/// Cache-first client for the remote query service.
///
/// Designed for a single-threaded event loop: state lives in `RefCell`s and
/// every write completes between two await points. Observers run after the
/// write, with no borrow held, so they may call back into the cache.
pub struct QueryCache<T, C> {
    transport: C,
    slots: RefCell<HashMap<QueryKey, Slot<T>>>,
    observers: RefCell<HashMap<QueryKey, Vec<(SubscriptionId, Observer<T>)>>>,
    next_subscription: Cell<u64>,
}

impl<T, C> QueryCache<T, C>
where
    T: DeserializeOwned,
    C: QueryTransport,
{
    pub fn new(transport: C) -> Self {
        Self {
            transport,
            slots: RefCell::new(HashMap::new()),
            observers: RefCell::new(HashMap::new()),
            next_subscription: Cell::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn transport(&self) -> &C {
        &self.transport
    }

    /// Resolve `document` with `variables`.
    ///
    /// - Cached success: returned as is, sharing the same rows.
    /// - Fetch in flight for the key: waits for it instead of issuing another.
    /// - Otherwise: publishes `Loading`, fetches, publishes the outcome.
    ///
    /// Failures come back as `QueryResult::Error`; this never returns `Err`.
    pub async fn execute(&self, document: &QueryDocument, variables: Value) -> QueryResult<T> {
        let key = QueryKey::new(document, &variables);
        let request = QueryRequest {
            document: document.clone(),
            variables,
        };
        let mut joined = false;

        loop {
            match self.next_step(&key, joined) {
                Step::Hit(result) => {
                    debug!("cache hit for {key} ({:?})", result.status());
                    return result;
                }
                Step::Join(settled) => {
                    debug!("joining in-flight fetch for {key}");
                    joined = true;
                    settled.notified().await;
                }
                Step::Fetch { seq, announce } => {
                    let mut claim = FetchClaim {
                        slots: &self.slots,
                        key: &key,
                        seq,
                        armed: true,
                    };
                    if announce {
                        self.notify_observers(&key, &QueryResult::Loading);
                    }
                    debug!("fetching {key} (seq {seq})");

                    let outcome = match self.transport.send(&request).await {
                        Ok(response) => normalize(&document.result_shape, response),
                        Err(e) => Err(e),
                    };
                    let result = match outcome {
                        Ok(rows) => QueryResult::Success(Rc::new(rows)),
                        Err(e) => QueryResult::Error(ErrorInfo::from(e)),
                    };

                    claim.armed = false;
                    if self.settle(&key, seq, &result) {
                        self.notify_observers(&key, &result);
                        return result;
                    }
                    debug!("discarding stale response for {key} (seq {seq})");
                }
            }
        }
    }

    /// Current state for `key`, without fetching.
    #[allow(dead_code)]
    pub fn peek(&self, key: &QueryKey) -> Option<QueryResult<T>> {
        self.slots
            .borrow()
            .get(key)
            .and_then(|slot| slot.result.clone())
    }

    /// Drop the cached result for `key` so the next `execute` fetches again.
    ///
    /// A response still in flight for the key is discarded when it lands.
    /// Returns `false` if the key was never fetched.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let mut slots = self.slots.borrow_mut();
        let Some(slot) = slots.get_mut(key) else {
            return false;
        };
        slot.seq += 1;
        // An in-flight fetch keeps the entry in `Loading` until a newer one settles.
        if slot.in_flight.take().is_none() {
            slot.result = None;
        }
        debug!("invalidated {key}");
        true
    }

    /// Register `callback` to run on every state transition of `key`.
    pub fn subscribe(
        &self,
        key: &QueryKey,
        callback: impl Fn(&QueryResult<T>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.observers
            .borrow_mut()
            .entry(key.clone())
            .or_default()
            .push((id, Rc::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    #[allow(dead_code)]
    pub fn unsubscribe(&self, key: &QueryKey, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let Some(list) = observers.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        before != list.len()
    }

    /// Decide what `execute` does next for `key`, claiming a fetch if needed.
    fn next_step(&self, key: &QueryKey, joined: bool) -> Step<T> {
        let mut slots = self.slots.borrow_mut();
        let Some(slot) = slots.get_mut(key) else {
            slots.insert(
                key.clone(),
                Slot {
                    result: Some(QueryResult::Loading),
                    seq: 1,
                    in_flight: Some(1),
                    settled: Rc::new(Notify::new()),
                },
            );
            return Step::Fetch {
                seq: 1,
                announce: true,
            };
        };

        if slot.in_flight.is_some() {
            return Step::Join(Rc::clone(&slot.settled));
        }

        match &slot.result {
            Some(hit @ QueryResult::Success(_)) => return Step::Hit(hit.clone()),
            // Waiters on a failed fetch get its error; new callers retry.
            Some(err @ QueryResult::Error(_)) if joined => return Step::Hit(err.clone()),
            _ => {}
        }

        let announce = !matches!(slot.result, Some(QueryResult::Loading));
        slot.seq += 1;
        slot.in_flight = Some(slot.seq);
        slot.result = Some(QueryResult::Loading);
        Step::Fetch {
            seq: slot.seq,
            announce,
        }
    }

    /// Store the outcome of fetch `seq` if it is still current.
    fn settle(&self, key: &QueryKey, seq: u64, result: &QueryResult<T>) -> bool {
        let settled = {
            let mut slots = self.slots.borrow_mut();
            let Some(slot) = slots.get_mut(key) else {
                return false;
            };
            if slot.seq != seq {
                return false;
            }
            slot.in_flight = None;
            slot.result = Some(result.clone());
            Rc::clone(&slot.settled)
        };
        settled.notify_waiters();
        true
    }

    fn notify_observers(&self, key: &QueryKey, result: &QueryResult<T>) {
        let callbacks: Vec<Observer<T>> = self
            .observers
            .borrow()
            .get(key)
            .map(|list| list.iter().map(|(_, cb)| Rc::clone(cb)).collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback(result);
        }
    }
}

/// Ownership of an in-flight fetch, held across the transport await.
///
/// If the `execute` future is dropped mid-fetch, the slot is released and
/// waiters are woken so one of them fetches again.
struct FetchClaim<'a, T> {
    slots: &'a RefCell<HashMap<QueryKey, Slot<T>>>,
    key: &'a QueryKey,
    seq: u64,
    armed: bool,
}

impl<T> Drop for FetchClaim<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let settled = {
            let Ok(mut slots) = self.slots.try_borrow_mut() else {
                return;
            };
            let Some(slot) = slots.get_mut(self.key) else {
                return;
            };
            if slot.seq != self.seq {
                return;
            }
            slot.seq += 1;
            slot.in_flight = None;
            slot.result = None;
            Rc::clone(&slot.settled)
        };
        debug!("fetch for {} abandoned (seq {})", self.key, self.seq);
        settled.notify_waiters();
    }
}

/// Turn a service envelope into typed rows, in response order.
fn normalize<T: DeserializeOwned>(shape: &ResultShape, response: QueryResponse) -> Result<Vec<T>> {
    if !response.errors.is_empty() {
        let message = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(OverseeError::Service { message });
    }

    let root = shape.root_field.as_str();
    let mut data = response.data.ok_or_else(|| OverseeError::Schema {
        detail: "response carried neither data nor errors".into(),
    })?;
    let rows = data
        .get_mut(root)
        .map(Value::take)
        .ok_or_else(|| OverseeError::Schema {
            detail: format!("field '{root}' missing from response data"),
        })?;

    let Value::Array(items) = rows else {
        return Err(OverseeError::Schema {
            detail: format!("field '{root}' is not a list"),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| OverseeError::Schema {
                detail: format!("row {i} of '{root}': {e}"),
            })
        })
        .collect()
}
