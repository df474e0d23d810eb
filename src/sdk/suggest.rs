//! Debounced place suggestions for text fields.
//!
//! Every keystroke restarts a per-field timer. When a field has been quiet for
//! the debounce interval its latest text is looked up, first in the
//! [`SuggestionCache`] and then through the geocoder. Results come back as
//! [`SuggestionDelivery`] messages on a channel; the owner passes each one to
//! [`SuggestionEngine::accept`], which drops it if the field has moved on.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::sdk::routing::{cache::SuggestionCache, service::GeocodeProvider};
use crate::sdk::waypoints::WaypointId;

/// Shorter input never triggers a lookup.
pub const MIN_QUERY_CHARS: usize = 3;
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Search,
    Waypoint(WaypointId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionDelivery {
    pub field: FieldId,
    /// Text the lookup was made for.
    pub query: String,
    pub names: Vec<String>,
}

#[derive(Debug, Default)]
struct FieldState {
    current_text: String,
    timer: Option<JoinHandle<()>>,
}

pub struct SuggestionEngine<G: ?Sized> {
    provider: Arc<G>,
    cache: SuggestionCache,
    debounce: Duration,
    fields: HashMap<FieldId, FieldState>,
    deliveries: mpsc::UnboundedSender<SuggestionDelivery>,
}

impl<G: GeocodeProvider + ?Sized + 'static> SuggestionEngine<G> {
    pub fn new(
        provider: Arc<G>,
        cache: SuggestionCache,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionDelivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Self {
            provider,
            cache,
            debounce,
            fields: HashMap::new(),
            deliveries: tx,
        };
        (engine, rx)
    }

    /// Records the field's text and, from three characters on, (re)arms its
    /// debounce timer. Returns whether a timer was armed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_text_changed(&mut self, field: FieldId, text: &str) -> bool {
        let state = self.fields.entry(field).or_default();
        state.current_text = text.to_string();

        if text.chars().count() < MIN_QUERY_CHARS {
            return false;
        }

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let provider = Arc::clone(&self.provider);
        let cache = self.cache.clone();
        let tx = self.deliveries.clone();
        let query = text.to_string();
        let debounce = self.debounce;

        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // Nothing below awaits, so an abort can no longer cancel the lookup.
            dispatch(provider, cache, tx, field, query);
        }));
        true
    }

    /// Records text written into the field by the program rather than typed.
    /// Any armed timer is cancelled and in-flight deliveries become stale.
    pub fn set_current_text(&mut self, field: FieldId, text: &str) {
        let state = self.fields.entry(field).or_default();
        state.current_text = text.to_string();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Staleness check at the delivery point.
    pub fn accept(&self, delivery: SuggestionDelivery) -> Option<SuggestionDelivery> {
        match self.fields.get(&delivery.field) {
            Some(state) if state.current_text == delivery.query => Some(delivery),
            _ => {
                log::debug!(
                    "Dropping stale suggestions for {:?} (query \"{}\")",
                    delivery.field,
                    delivery.query
                );
                None
            }
        }
    }

    pub fn current_text(&self, field: FieldId) -> Option<&str> {
        self.fields.get(&field).map(|s| s.current_text.as_str())
    }

    /// Stops tracking a field that no longer exists.
    pub fn forget(&mut self, field: FieldId) {
        if let Some(state) = self.fields.remove(&field) {
            if let Some(timer) = state.timer {
                timer.abort();
            }
        }
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }
}

impl<G: ?Sized> Drop for SuggestionEngine<G> {
    fn drop(&mut self) {
        for state in self.fields.values_mut() {
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
        }
    }
}

fn dispatch<G: GeocodeProvider + ?Sized + 'static>(
    provider: Arc<G>,
    cache: SuggestionCache,
    tx: mpsc::UnboundedSender<SuggestionDelivery>,
    field: FieldId,
    query: String,
) {
    if let Some(names) = cache.get(&query) {
        log::debug!("[CACHE HIT] suggestions for \"{}\"", query);
        deliver(&tx, SuggestionDelivery { field, query, names });
        return;
    }

    tokio::spawn(async move {
        let names = match provider.suggest(&query, SUGGESTION_LIMIT).await {
            Ok(names) => {
                cache.put(&query, names.clone());
                names
            }
            Err(err) => {
                log::warn!("Suggestion lookup for \"{}\" failed: {}", query, err);
                Vec::new()
            }
        };
        deliver(&tx, SuggestionDelivery { field, query, names });
    });
}

fn deliver(tx: &mpsc::UnboundedSender<SuggestionDelivery>, delivery: SuggestionDelivery) {
    if tx.send(delivery).is_err() {
        log::debug!("Suggestion receiver is gone; result discarded");
    }
}
