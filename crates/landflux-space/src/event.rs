//! Distributed events: timestamped key/value records attached to
//! spatial units.
//!
//! Events are inserted at data-load time and read-only during
//! simulation. Each event carries an ordered string-to-string info
//! mapping; duplicate keys are rejected at insertion.

use std::error::Error;
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Errors from event construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventError {
    /// An info key was added twice.
    DuplicateInfo {
        /// The duplicated key.
        key: String,
    },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateInfo { key } => write!(f, "event info key '{key}' already exists"),
        }
    }
}

impl Error for EventError {}

/// One distributed event: a timestamp plus an ordered info mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    date: DateTime<Utc>,
    infos: IndexMap<String, String>,
}

impl Event {
    /// New event at the given date with no infos.
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            infos: IndexMap::new(),
        }
    }

    /// Timestamp of the event.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Add one info entry. Duplicate keys are rejected.
    pub fn add_info(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EventError> {
        let key = key.into();
        if self.infos.contains_key(&key) {
            return Err(EventError::DuplicateInfo { key });
        }
        self.infos.insert(key, value.into());
        Ok(())
    }

    /// Whether an info key exists.
    pub fn has_info(&self, key: &str) -> bool {
        self.infos.contains_key(key)
    }

    /// Info value as a raw string.
    pub fn info_as_str(&self, key: &str) -> Option<&str> {
        self.infos.get(key).map(String::as_str)
    }

    /// Info value parsed as `i64`.
    pub fn info_as_i64(&self, key: &str) -> Option<i64> {
        self.infos.get(key)?.parse().ok()
    }

    /// Info value parsed as `f64`.
    pub fn info_as_f64(&self, key: &str) -> Option<f64> {
        self.infos.get(key)?.parse().ok()
    }

    /// Whether the info at `key` equals `value` as a string.
    pub fn is_info_equal(&self, key: &str, value: &str) -> bool {
        self.info_as_str(key) == Some(value)
    }

    /// Number of info entries.
    pub fn infos_count(&self) -> usize {
        self.infos.len()
    }

    /// Iterate `(key, value)` pairs in insertion order.
    pub fn infos(&self) -> impl Iterator<Item = (&str, &str)> {
        self.infos.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Chronologically ordered collection of events on one spatial unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventCollection {
    events: Vec<Event>,
}

impl EventCollection {
    /// New empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, keeping the collection sorted by date.
    ///
    /// Events with equal dates keep their insertion order.
    pub fn insert(&mut self, event: Event) {
        let idx = self
            .events
            .partition_point(|existing| existing.date() <= event.date());
        self.events.insert(idx, event);
    }

    /// All events, chronologically.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events with `begin <= date <= end`, chronologically.
    pub fn events_between(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.date() >= begin && e.date() <= end)
    }

    /// Number of events in the collection.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the collection holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2001, 5, d, h, 0, 0).unwrap()
    }

    #[test]
    fn duplicate_info_keys_rejected() {
        let mut event = Event::new(date(1, 0));
        event.add_info("molecule", "pesticide-a").unwrap();
        assert_eq!(
            event.add_info("molecule", "pesticide-b"),
            Err(EventError::DuplicateInfo {
                key: "molecule".into()
            })
        );
        assert_eq!(event.infos_count(), 1);
    }

    #[test]
    fn typed_info_getters() {
        let mut event = Event::new(date(1, 0));
        event.add_info("amount", "1.5").unwrap();
        event.add_info("count", "3").unwrap();
        event.add_info("label", "spreading").unwrap();

        assert_eq!(event.info_as_f64("amount"), Some(1.5));
        assert_eq!(event.info_as_i64("count"), Some(3));
        assert_eq!(event.info_as_str("label"), Some("spreading"));
        assert_eq!(event.info_as_i64("label"), None);
        assert!(event.is_info_equal("label", "spreading"));
        assert!(!event.is_info_equal("label", "harvest"));
    }

    #[test]
    fn insertion_keeps_chronological_order() {
        let mut events = EventCollection::new();
        events.insert(Event::new(date(3, 0)));
        events.insert(Event::new(date(1, 0)));
        events.insert(Event::new(date(2, 0)));

        let dates: Vec<_> = events.events().iter().map(Event::date).collect();
        assert_eq!(dates, vec![date(1, 0), date(2, 0), date(3, 0)]);
    }

    proptest::proptest! {
        #[test]
        fn insertion_order_never_matters(offsets in proptest::collection::vec(0i64..500, 1..32)) {
            let mut events = EventCollection::new();
            for &off in &offsets {
                events.insert(Event::new(date(1, 0) + chrono::Duration::minutes(off)));
            }
            let dates: Vec<_> = events.events().iter().map(Event::date).collect();
            let mut sorted = dates.clone();
            sorted.sort();
            proptest::prop_assert_eq!(dates, sorted);
        }
    }

    #[test]
    fn events_between_is_a_closed_interval() {
        let mut events = EventCollection::new();
        for d in 1..=5 {
            events.insert(Event::new(date(d, 0)));
        }
        let hits: Vec<_> = events
            .events_between(date(2, 0), date(4, 0))
            .map(Event::date)
            .collect();
        assert_eq!(hits, vec![date(2, 0), date(3, 0), date(4, 0)]);
    }
}
