//! Statistics scraped from the preload blob embedded in a game page.
//!
//! The page assigns a large JSON object to `GEEK.geekitemPreload`. Only
//! `item.stats` is read; everything after the first complete JSON value is
//! ignored, so the closing brace never has to be located by hand.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::StatsError;
use crate::model::GameStats;

/// Literal marker preceding the preload object.
pub const PRELOAD_MARKER: &str = "GEEK.geekitemPreload";

#[derive(Deserialize)]
struct Preload {
    item: PreloadItem,
}

#[derive(Deserialize)]
struct PreloadItem {
    stats: PreloadStats,
}

#[derive(Deserialize)]
struct PreloadStats {
    #[serde(deserialize_with = "numeric_string")]
    average: f64,
    #[serde(deserialize_with = "numeric_string")]
    avgweight: f64,
    #[serde(deserialize_with = "numeric_string")]
    baverage: f64,
    #[serde(deserialize_with = "numeric_string")]
    usersrated: u32,
}

/// The page sends numbers as strings ("7.5"); plain numbers are accepted too.
fn numeric_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numeric<T> {
        Text(String),
        Number(T),
    }

    match Numeric::<T>::deserialize(deserializer)? {
        Numeric::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Numeric::Number(n) => Ok(n),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Extract [`GameStats`] from the raw bytes of a game page.
pub fn extract_stats(html: &[u8]) -> Result<GameStats, StatsError> {
    let marker = find(html, PRELOAD_MARKER.as_bytes())
        .ok_or(StatsError::MarkerNotFound(PRELOAD_MARKER))?;
    let rest = &html[marker + PRELOAD_MARKER.len()..];

    let brace = rest
        .iter()
        .position(|&b| b == b'{')
        .ok_or(StatsError::ObjectStartNotFound)?;

    let mut values = serde_json::Deserializer::from_slice(&rest[brace..]).into_iter::<Preload>();
    let preload = values.next().ok_or(StatsError::ObjectStartNotFound)??;

    let stats = preload.item.stats;
    Ok(GameStats {
        average: stats.average,
        avg_weight: stats.avgweight,
        bayes_average: stats.baverage,
        users_rated: stats.usersrated,
    })
}
