//! Rating-prompt action timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::keys;

/// A user's response to a rating prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// The user went on to rate the app.
    Rated,
    /// The user dismissed the prompt.
    Declined,
    /// The user chose to send feedback instead.
    Feedback,
}

impl ActionKind {
    /// All kinds, in the order timestamps are read back.
    pub const ALL: [Self; 3] = [Self::Rated, Self::Declined, Self::Feedback];

    /// The persisted key for this action's timestamp.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Rated => keys::RATED_TIMESTAMP,
            Self::Declined => keys::DECLINED_TIMESTAMP,
            Self::Feedback => keys::FEEDBACK_TIMESTAMP,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Rated => 0,
            Self::Declined => 1,
            Self::Feedback => 2,
        }
    }

    /// Short lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rated => "rated",
            Self::Declined => "declined",
            Self::Feedback => "feedback",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a stored epoch-millisecond timestamp.
///
/// # Errors
///
/// Returns `TrackerError::InvalidValue` if `raw` is not a decimal integer.
pub fn parse_millis(key: &str, raw: &str) -> Result<i64, TrackerError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| TrackerError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

/// What the store holds for one action's timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum StoredTimestamp {
    /// Never recorded, or cleared by a reset.
    #[default]
    Absent,
    /// Recorded at this many milliseconds since the Unix epoch.
    At(i64),
    /// Present but not a decimal integer; holds the raw value.
    Invalid(String),
}

impl StoredTimestamp {
    /// Decode the raw value read from `key`.
    #[must_use]
    pub fn decode(key: &str, raw: Option<&str>) -> Self {
        match raw {
            None => Self::Absent,
            Some(raw) => match parse_millis(key, raw) {
                Ok(millis) => Self::At(millis),
                Err(_) => Self::Invalid(raw.to_string()),
            },
        }
    }

    /// The recorded time, if present and valid.
    #[must_use]
    pub fn millis(&self) -> Option<i64> {
        match self {
            Self::At(millis) => Some(*millis),
            Self::Absent | Self::Invalid(_) => None,
        }
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Whether the stored value could not be decoded.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// The last recorded time of each action, in [rated, declined, feedback] order.
///
/// Each entry is decoded on its own: a corrupt value marks only that entry
/// [`StoredTimestamp::Invalid`] and leaves the others readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTimestamps {
    entries: [(ActionKind, StoredTimestamp); 3],
}

impl Default for ActionTimestamps {
    fn default() -> Self {
        Self::empty()
    }
}

impl ActionTimestamps {
    /// Timestamps with no action recorded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: ActionKind::ALL.map(|kind| (kind, StoredTimestamp::Absent)),
        }
    }

    /// Build from the raw `(key, value)` pairs returned by the store.
    ///
    /// Pairs for unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut timestamps = Self::empty();
        for (key, value) in pairs {
            let key = key.as_ref();
            let Some(kind) = ActionKind::ALL.into_iter().find(|kind| kind.key() == key) else {
                continue;
            };
            let stored = StoredTimestamp::decode(key, value.as_ref().map(|raw| raw.as_ref()));
            timestamps.set(kind, stored);
        }
        timestamps
    }

    /// Entries in [rated, declined, feedback] order.
    #[must_use]
    pub fn entries(&self) -> &[(ActionKind, StoredTimestamp); 3] {
        &self.entries
    }

    /// What the store holds for `kind`.
    #[must_use]
    pub fn entry(&self, kind: ActionKind) -> &StoredTimestamp {
        &self.entries[kind.index()].1
    }

    /// The recorded time of `kind`, in epoch milliseconds.
    ///
    /// `None` for both absent and invalid entries; use [`entry`](Self::entry)
    /// to tell them apart.
    #[must_use]
    pub fn get(&self, kind: ActionKind) -> Option<i64> {
        self.entry(kind).millis()
    }

    pub(crate) fn set(&mut self, kind: ActionKind, stored: StoredTimestamp) {
        self.entries[kind.index()] = (kind, stored);
    }

    /// When the user last rated.
    #[must_use]
    pub fn rated(&self) -> Option<i64> {
        self.get(ActionKind::Rated)
    }

    /// When the user last declined.
    #[must_use]
    pub fn declined(&self) -> Option<i64> {
        self.get(ActionKind::Declined)
    }

    /// When the user last gave feedback.
    #[must_use]
    pub fn feedback(&self) -> Option<i64> {
        self.get(ActionKind::Feedback)
    }

    /// The recorded time of `kind` as a UTC date-time.
    #[must_use]
    pub fn as_datetime(&self, kind: ActionKind) -> Option<DateTime<Utc>> {
        self.get(kind).and_then(DateTime::from_timestamp_millis)
    }

    /// The most recent valid action of any kind.
    #[must_use]
    pub fn latest(&self) -> Option<(ActionKind, i64)> {
        self.entries
            .iter()
            .filter_map(|(kind, stored)| stored.millis().map(|m| (*kind, m)))
            .max_by_key(|(_, millis)| *millis)
    }

    /// Entries whose stored value could not be decoded, with the raw value.
    pub fn invalid(&self) -> impl Iterator<Item = (ActionKind, &str)> + '_ {
        self.entries.iter().filter_map(|(kind, stored)| match stored {
            StoredTimestamp::Invalid(raw) => Some((*kind, raw.as_str())),
            StoredTimestamp::Absent | StoredTimestamp::At(_) => None,
        })
    }

    /// Whether nothing at all is stored for any action.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, stored)| stored.is_absent())
    }
}
