use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WorldError;

/// Generic key → string / key → sub-map container that scene nodes save to.
///
/// Storage format is up to the host; the map is plain serde data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialMap {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub maps: BTreeMap<String, SerialMap>,
}

impl SerialMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    pub fn set_map(&mut self, key: impl Into<String>, map: SerialMap) -> &mut Self {
        self.maps.insert(key.into(), map);
        self
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[inline]
    pub fn map(&self, key: &str) -> Option<&SerialMap> {
        self.maps.get(key)
    }

    pub fn require(&self, key: &str) -> Result<&str, WorldError> {
        self.get(key).ok_or_else(|| WorldError::MissingField(key.to_string()))
    }

    pub fn require_map(&self, key: &str) -> Result<&SerialMap, WorldError> {
        self.map(key).ok_or_else(|| WorldError::MissingField(key.to_string()))
    }

    /// Parses a required value.
    pub fn parse<T>(&self, key: &str) -> Result<T, WorldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.require(key)?;
        raw.parse().map_err(|e: T::Err| WorldError::Malformed {
            field: key.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// Parses an optional value; absent means `None`, malformed is an error.
    pub fn parse_opt<T>(&self, key: &str) -> Result<Option<T>, WorldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            None => Ok(None),
            Some(_) => self.parse(key).map(Some),
        }
    }
}
