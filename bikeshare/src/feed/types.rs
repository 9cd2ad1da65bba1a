//! Raw wire types for the station feed.
//!
//! Field names follow the feed's own camelCase naming. The feed is not
//! strict about numeric typing (counts and coordinates sometimes arrive as
//! strings), so the numeric fields accept either form. Unknown fields such
//! as `statusValue` are ignored.

use serde::{Deserialize, Deserializer, de};

/// The full feed document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationFeed {
    #[serde(default)]
    pub execution_time: Option<String>,
    pub station_bean_list: Vec<StationDto>,
}

/// One raw station object as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    #[serde(deserialize_with = "u32_lenient")]
    pub id: u32,
    #[serde(default)]
    pub station_name: String,
    #[serde(default, deserialize_with = "u32_lenient")]
    pub available_docks: u32,
    #[serde(default, deserialize_with = "u32_lenient")]
    pub total_docks: u32,
    #[serde(default, deserialize_with = "u32_lenient")]
    pub available_bikes: u32,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "f64_lenient")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "i64_lenient")]
    pub status_key: i64,
    #[serde(default)]
    pub st_address_1: String,
    #[serde(default)]
    pub st_address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub altitude: String,
    #[serde(default)]
    pub test_station: bool,
    #[serde(default)]
    pub land_mark: String,
    #[serde(default)]
    pub last_communication_time: Option<String>,
}

/// A JSON value that is either a number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr<T> {
    Num(T),
    Str(String),
}

fn u32_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    match NumOrStr::<u32>::deserialize(de)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid integer: {s:?}"))),
    }
}

fn i64_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
    match NumOrStr::<i64>::deserialize(de)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid integer: {s:?}"))),
    }
}

fn f64_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    match NumOrStr::<f64>::deserialize(de)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number: {s:?}"))),
    }
}
