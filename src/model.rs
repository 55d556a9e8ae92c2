//! Per-request parameter and model maps.
//!
//! [`ParamMap`] is the normalized, read-only view of request parameters that
//! param-style handlers receive. [`ModelMap`] is the attribute bag a handler
//! fills for the view layer.

use crate::dispatcher::{ParamVec, WebRequest};
use crate::error::ProcessingError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flat `name → value` request parameters.
///
/// Each name maps to exactly one value. When a name appears more than once the
/// **first** occurrence wins and later ones are ignored. Sources are read in
/// this order: path variables, query string, form body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamMap(BTreeMap<String, String>);

impl ParamMap {
    /// Build the map for one handler invocation.
    #[must_use]
    pub fn extract(request: &WebRequest, path_params: &ParamVec) -> Self {
        path_params
            .iter()
            .chain(request.params.iter())
            .map(|(k, v)| (&**k, v.as_str()))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Parameter value, or `None` when absent or blank.
    #[must_use]
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Parse a parameter, reporting malformed input as a bad request.
    ///
    /// Absent or blank values are `Ok(None)`.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, ProcessingError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_non_blank(name)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| {
                    ProcessingError::BadRequest(format!("parameter '{name}' is invalid: {e}"))
                })
            })
            .transpose()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = BTreeMap::new();
        for (k, v) in iter {
            map.entry(k.into()).or_insert_with(|| v.into());
        }
        ParamMap(map)
    }
}

/// Attributes handed from a handler to the view.
///
/// Serializes as a plain JSON object, which is what templates see as their
/// root context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ModelMap(Map<String, Value>);

impl ModelMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Serialize `value` and store it under `name`.
    pub fn add_attribute<T: Serialize + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<(), ProcessingError> {
        let value = serde_json::to_value(value)?;
        self.0.insert(name.into(), value);
        Ok(())
    }

    /// Builder form of [`ModelMap::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Look up a dotted path such as `errors.price`.
    #[must_use]
    pub fn lookup(&self, dotted: &str) -> Option<&Value> {
        let mut parts = dotted.split('.');
        let first = self.0.get(parts.next()?)?;
        parts.try_fold(first, |v, key| v.get(key))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<&ParamMap> for ModelMap {
    fn from(params: &ParamMap) -> Self {
        ModelMap(
            params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        )
    }
}
