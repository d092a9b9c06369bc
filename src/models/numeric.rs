//! Deserializers for numbers the API sometimes sends as strings.

use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::{self, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

fn convert<T, E>(raw: NumberOrText) -> Result<Option<T>, E>
where
    T: FromStr + TryFrom<i64> + TryFrom<u64>,
    <T as FromStr>::Err: Display,
    E: de::Error,
{
    match raw {
        NumberOrText::Signed(n) => T::try_from(n)
            .map(Some)
            .map_err(|_| E::custom(format!("number out of range: {n}"))),
        NumberOrText::Unsigned(n) => T::try_from(n)
            .map(Some)
            .map_err(|_| E::custom(format!("number out of range: {n}"))),
        NumberOrText::Text(s) if s.trim().is_empty() => Ok(None),
        NumberOrText::Text(s) => s.trim().parse().map(Some).map_err(E::custom),
    }
}

pub fn required<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<i64> + TryFrom<u64>,
    <T as FromStr>::Err: Display,
{
    convert::<T, D::Error>(NumberOrText::deserialize(deserializer)?)?
        .ok_or_else(|| de::Error::custom("expected a number, got an empty string"))
}

pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<i64> + TryFrom<u64>,
    <T as FromStr>::Err: Display,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(raw) => convert(raw),
        None => Ok(None),
    }
}
