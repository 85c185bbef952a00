//! `dd-MM-yyyy HH:mm:ss` timestamps shared by the success and error bodies.
//!
//! Use with `#[serde(with = "crate::utils::timestamp")]` on a `DateTime<Utc>` field.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// chrono format string for the wire timestamp
pub const FORMAT: &str = "%d-%m-%Y %H:%M:%S";

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
