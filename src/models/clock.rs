//! `HH:MM` wall-clock times for serde, also accepting `HH:MM:SS`.

use crate::models::error::ValidationError;
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, ValidationError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| ValidationError::MalformedTime(s.to_string()))
}

pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format("%H:%M").to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_time(&s).map_err(serde::de::Error::custom)
}

/// Same format for a list of times.
pub mod list {
    use super::parse_time;
    use chrono::NaiveTime;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(times: &[NaiveTime], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(times.len()))?;
        for t in times {
            seq.serialize_element(&t.format("%H:%M").to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<NaiveTime>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| parse_time(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Same format for an optional list of times; absent or null means `None`.
pub mod option_list {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        times: &Option<Vec<NaiveTime>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match times {
            Some(times) => super::list::serialize(times, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<NaiveTime>>, D::Error> {
        Option::<Vec<String>>::deserialize(deserializer)?
            .map(|raw| {
                raw.iter()
                    .map(|s| super::parse_time(s).map_err(serde::de::Error::custom))
                    .collect::<Result<Vec<NaiveTime>, D::Error>>()
            })
            .transpose()
    }
}
