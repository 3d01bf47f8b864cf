//! The delivery route: an ordered list of stops plus its persisted settings.

use chrono::NaiveTime;
use uuid::Uuid;

use ttm_core::{
    read_json, write_json, KeyValueStore, OrderMode, Stop, StopPatch, StoreError, MODE_KEY,
    ORIGIN_KEY, STOPS_KEY,
};

/// In-memory route edits. Persist with [`RouteRepository::save_stops`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    #[must_use]
    pub fn new(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    #[must_use]
    pub fn into_stops(self) -> Vec<Stop> {
        self.stops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn add(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    /// Returns `false` when no stop has this id.
    pub fn update(&mut self, id: Uuid, patch: StopPatch) -> bool {
        match self.stops.iter_mut().find(|s| s.id == id) {
            Some(stop) => {
                stop.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Returns the removed stop, if any.
    pub fn remove(&mut self, id: Uuid) -> Option<Stop> {
        let idx = self.stops.iter().position(|s| s.id == id)?;
        Some(self.stops.remove(idx))
    }

    /// Move the stop with `id` to `new_index` (clamped to the end).
    ///
    /// Returns `false` when no stop has this id.
    pub fn reorder(&mut self, id: Uuid, new_index: usize) -> bool {
        let Some(idx) = self.stops.iter().position(|s| s.id == id) else {
            return false;
        };
        let stop = self.stops.remove(idx);
        let target = new_index.min(self.stops.len());
        self.stops.insert(target, stop);
        true
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    /// The stops in presentation order for `mode`.
    #[must_use]
    pub fn ordered(&self, mode: OrderMode) -> Vec<Stop> {
        order_stops(&self.stops, mode)
    }
}

/// `Manual` keeps the given order. `Time` sorts by delivery time, earliest
/// first; stops without a parseable time keep their relative order at the end.
#[must_use]
pub fn order_stops(stops: &[Stop], mode: OrderMode) -> Vec<Stop> {
    let mut ordered = stops.to_vec();
    if mode == OrderMode::Time {
        ordered.sort_by_key(|s| {
            let time = s
                .time
                .as_deref()
                .and_then(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok());
            (time.is_none(), time)
        });
    }
    ordered
}

/// Route persistence over any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct RouteRepository<S> {
    store: S,
    default_origin: String,
}

impl<S: KeyValueStore> RouteRepository<S> {
    pub fn new(store: S, default_origin: impl Into<String>) -> Self {
        Self {
            store,
            default_origin: default_origin.into(),
        }
    }

    /// Saved stops; empty when nothing (or nothing valid) is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn load_stops(&self) -> Result<Vec<Stop>, StoreError> {
        Ok(read_json(&self.store, STOPS_KEY)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    pub fn save_stops(&mut self, stops: &[Stop]) -> Result<(), StoreError> {
        write_json(&mut self.store, STOPS_KEY, stops)?;
        tracing::info!(count = stops.len(), "route saved");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    pub fn clear_stops(&mut self) -> Result<(), StoreError> {
        self.store.remove(STOPS_KEY)?;
        tracing::info!("route cleared");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn load_route(&self) -> Result<Route, StoreError> {
        self.load_stops().map(Route::new)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    pub fn save_route(&mut self, route: &Route) -> Result<(), StoreError> {
        self.save_stops(route.stops())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn load_mode(&self) -> Result<OrderMode, StoreError> {
        Ok(self
            .store
            .get(MODE_KEY)?
            .map_or(OrderMode::Manual, |raw| OrderMode::parse(&raw)))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    pub fn save_mode(&mut self, mode: OrderMode) -> Result<(), StoreError> {
        self.store.set(MODE_KEY, mode.as_str())
    }

    /// Saved origin, or the configured default when none (or a blank one) is saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn load_origin(&self) -> Result<String, StoreError> {
        Ok(self
            .store
            .get(ORIGIN_KEY)?
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| self.default_origin.clone()))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    pub fn save_origin(&mut self, origin: &str) -> Result<(), StoreError> {
        self.store.set(ORIGIN_KEY, origin.trim())
    }
}

#[cfg(test)]
#[path = "route_test.rs"]
mod tests;
