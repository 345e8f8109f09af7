//! Data types for the message store.

use std::{collections::BTreeMap, fmt};

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// Platform-assigned identity of a conversational peer.
///
/// Stored as the decimal string form so the on-disk keys stay stable no
/// matter how the platform represents ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One stored text with its capture time. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub text: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    pub fn new(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }
}

/// Ordered, append-only sequence of entries for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserLog(Vec<Entry>);

impl UserLog {
    pub fn push(&mut self, entry: Entry) {
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entry texts in insertion order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.text.as_str())
    }
}

impl From<Vec<Entry>> for UserLog {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

/// Full contents of the store, keyed by user.
pub type Snapshot = BTreeMap<UserId, UserLog>;

/// Total number of entries across all users.
pub fn entry_count(snapshot: &Snapshot) -> usize {
    snapshot.values().map(UserLog::len).sum()
}

/// ISO-8601 timestamps.
///
/// Written as RFC 3339 in UTC. Older files may carry naive timestamps
/// without an offset; those are read as UTC.
mod timestamp {
    use {
        chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc},
        serde::{Deserialize, Deserializer, Serializer, de::Error as _},
    };

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, chrono::TimeZone};

    #[test]
    fn user_id_from_integer() {
        let id = UserId::from(42_i64);
        assert_eq!(id.as_str(), "42");
        assert_eq!(UserId::from("alice").as_str(), "alice");
    }

    #[test]
    fn entry_serializes_iso_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 5).unwrap();
        let json = serde_json::to_value(Entry::new("buy milk", ts)).unwrap();
        assert_eq!(json["text"], "buy milk");
        assert_eq!(json["timestamp"], "2024-03-01T18:00:05Z");
    }

    #[test]
    fn entry_reads_naive_timestamp_as_utc() {
        let entry: Entry = serde_json::from_str(
            r#"{"text": "call mom", "timestamp": "2024-03-01T18:00:05.123456"}"#,
        )
        .unwrap();
        assert_eq!(
            entry.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 5).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
    }

    #[test]
    fn entry_rejects_garbage_timestamp() {
        let parsed = serde_json::from_str::<Entry>(r#"{"text": "x", "timestamp": "yesterday"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn snapshot_uses_user_ids_as_object_keys() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            UserId::from(42_i64),
            UserLog::from(vec![Entry::new("a", ts), Entry::new("b", ts)]),
        );
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["42"][1]["text"], "b");
        assert_eq!(entry_count(&snapshot), 2);
    }
}
