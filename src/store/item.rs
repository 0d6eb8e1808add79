//! Items written to the store.

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use uuid::Uuid;

/// One persisted record: a fresh id, a formatted timestamp and optional
/// extra string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Unique identifier, generated per item.
    pub id: Uuid,
    /// Write time formatted with [`Item::TIME_FORMAT`].
    pub time: String,
    /// Additional attributes stored alongside `id` and `time`.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl Item {
    /// Timestamp format, e.g. `2024-03-05 04:07:09 PM`.
    pub const TIME_FORMAT: &'static str = "%Y-%m-%d %I:%M:%S %p";

    /// Attribute name of the identifier.
    pub const ID_FIELD: &'static str = "id";

    /// Attribute name of the timestamp.
    pub const TIME_FIELD: &'static str = "time";

    /// Create a log entry stamped with the current local time.
    pub fn log_entry() -> Self {
        Self::at(Local::now())
    }

    /// Create a log entry stamped with the given time.
    pub fn at<Tz>(when: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            id: Uuid::new_v4(),
            time: when.format(Self::TIME_FORMAT).to_string(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an extra attribute. `id` and `time` cannot be overridden.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if name != Self::ID_FIELD && name != Self::TIME_FIELD {
            self.attributes.insert(name, value.into());
        }
        self
    }

    /// All fields as name/value pairs, `id` and `time` first.
    pub fn fields(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        [
            (Self::ID_FIELD, self.id.to_string()),
            (Self::TIME_FIELD, self.time.clone()),
        ]
        .into_iter()
        .chain(
            self.attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn timestamp_uses_twelve_hour_clock() {
        let when = Utc.with_ymd_and_hms(2024, 3, 5, 16, 7, 9).unwrap();
        let item = Item::at(when);
        assert_eq!(item.time, "2024-03-05 04:07:09 PM");

        let morning = Utc.with_ymd_and_hms(2024, 3, 5, 0, 30, 0).unwrap();
        assert_eq!(Item::at(morning).time, "2024-03-05 12:30:00 AM");
    }

    #[test]
    fn log_entry_time_parses_back() {
        let item = Item::log_entry();
        assert!(NaiveDateTime::parse_from_str(&item.time, Item::TIME_FORMAT).is_ok());
    }

    #[test]
    fn ids_are_unique_v4() {
        let ids: HashSet<Uuid> = (0..256).map(|_| Item::log_entry().id).collect();
        assert_eq!(ids.len(), 256);
        assert!(ids.iter().all(|id| id.get_version_num() == 4));
    }

    #[test]
    fn extra_attributes_cannot_shadow_key_fields() {
        let item = Item::log_entry()
            .with_attribute("id", "spoofed")
            .with_attribute("source", "test");

        let fields: Vec<(&str, String)> = item.fields().collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("id", item.id.to_string()));
        assert_eq!(fields[2], ("source", "test".to_string()));
    }

    #[test]
    fn serializes_flat() {
        let item = Item::log_entry().with_attribute("source", "test");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], item.id.to_string());
        assert_eq!(json["source"], "test");
    }
}
