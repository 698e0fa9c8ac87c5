//! Durations as integer milliseconds in config files.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Writes whole milliseconds; sub-millisecond parts are dropped and
/// anything past `u64::MAX` ms is pinned there.
pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

/// Reads a non-negative integer count of milliseconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

pub mod option {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => super::serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pause {
        #[serde(with = "super")]
        wait: Duration,
        #[serde(with = "super::option")]
        window: Option<Duration>,
    }

    #[test]
    fn whole_milliseconds_on_the_wire() {
        let p = Pause {
            wait: Duration::from_micros(1_500_700),
            window: None,
        };
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"wait":1500,"window":null}"#);
        let back: Pause = serde_json::from_str(r#"{"wait":250,"window":900}"#).unwrap();
        assert_eq!(back.window, Some(Duration::from_millis(900)));
        assert!(serde_json::from_str::<Pause>(r#"{"wait":-1,"window":null}"#).is_err());
    }
}
