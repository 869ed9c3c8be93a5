//! Epoch-seconds wire encoding for match timestamps.
//!
//! A timestamp of `0` (or `null`, or an absent field) is the "unset"
//! sentinel: a match without an end time is still being played.
//!
//! Use with `#[serde(with = "crate::unix_time", default)]` on an
//! `Option<DateTime<Utc>>` field.

use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

const UNSET: i64 = 0;

pub fn is_unset(secs: i64) -> bool {
    secs == UNSET
}

/// Converts a wire value to a timestamp. Returns `Ok(None)` for the unset
/// sentinel and `Err` for values chrono cannot represent.
pub fn from_epoch(secs: i64) -> Result<Option<DateTime<Utc>>, String> {
    if is_unset(secs) {
        return Ok(None);
    }
    DateTime::from_timestamp(secs, 0)
        .map(Some)
        .ok_or_else(|| format!("timestamp {} is out of range", secs))
}

pub fn to_epoch(time: Option<DateTime<Utc>>) -> i64 {
    time.map_or(UNSET, |t| t.timestamp())
}

pub fn serialize<S>(time: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(to_epoch(*time))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(secs) => from_epoch(secs).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamp {
        #[serde(with = "crate::unix_time", default)]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_decode_epoch_seconds() {
        let stamp: Stamp = serde_json::from_str(r#"{"at": 1679684400}"#).unwrap();
        assert_eq!(
            stamp.at,
            Some(Utc.with_ymd_and_hms(2023, 3, 24, 19, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unset_sentinels() {
        for raw in [r#"{"at": 0}"#, r#"{"at": null}"#, r#"{}"#] {
            let stamp: Stamp = serde_json::from_str(raw).unwrap();
            assert_eq!(stamp.at, None, "{} should decode as unset", raw);
        }
    }

    #[test]
    fn test_rejects_non_integer() {
        assert!(serde_json::from_str::<Stamp>(r#"{"at": "yesterday"}"#).is_err());
        assert!(serde_json::from_str::<Stamp>(r#"{"at": 1.5}"#).is_err());
        assert!(serde_json::from_str::<Stamp>(&format!(r#"{{"at": {}}}"#, i64::MAX)).is_err());
    }

    #[test]
    fn test_encode() {
        let stamp = Stamp {
            at: Some(Utc.with_ymd_and_hms(2023, 3, 24, 19, 32, 0).unwrap()),
        };
        assert_eq!(serde_json::to_string(&stamp).unwrap(), r#"{"at":1679686320}"#);
        assert_eq!(serde_json::to_string(&Stamp { at: None }).unwrap(), r#"{"at":0}"#);
    }
}
