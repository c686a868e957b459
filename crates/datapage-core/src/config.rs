//! Provider and pagination configuration.
//!
//! Every type here deserializes from any serde format. TOML is the
//! first-class text format via [`ProviderConfig::from_toml_str`].

use crate::{error::Error, page::SortOrder, sort::Sort};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, Visitor, value::MapAccessDeserializer},
};
use std::{fmt, marker::PhantomData};

///
/// CONSTANTS
///

/// Items per page when nothing else is configured.
pub const DEFAULT_LIMIT: i64 = 20;

/// Page numbers shown in the navigation window by default.
pub const DEFAULT_PAGE_WINDOW: usize = 10;

/// Query parameter carrying the one-based page number in links.
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size in links.
pub const DEFAULT_LIMIT_PARAM: &str = "per-page";

///
/// Setting
///
/// Tri-state option for pagination and sort.
/// `false` disables, absence selects the default, a table customizes.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Setting<T> {
    Disabled,
    #[default]
    Default,
    Custom(T),
}

impl<T> Setting<T> {
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    #[must_use]
    pub const fn custom(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => Some(value),
            _ => None,
        }
    }

    /// Map the custom payload, keeping the disabled/default state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Setting<U> {
        match self {
            Self::Disabled => Setting::Disabled,
            Self::Default => Setting::Default,
            Self::Custom(value) => Setting::Custom(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Setting<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Disabled, Self::Custom)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Setting<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SettingVisitor(PhantomData))
    }
}

///
/// SettingVisitor
///
/// `false` disables, null selects the default, a map is handed to `T` so
/// its own field errors surface unchanged.
///

struct SettingVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for SettingVisitor<T> {
    type Value = Setting<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`false` or a configuration table")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        if value {
            Err(E::invalid_value(de::Unexpected::Bool(true), &self))
        } else {
            Ok(Setting::Disabled)
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Setting::Default)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Setting::Default)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        Setting::deserialize(deserializer)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        T::deserialize(MapAccessDeserializer::new(map)).map(Setting::Custom)
    }
}

impl<T: Serialize> Serialize for Setting<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::Default => serializer.serialize_none(),
            Self::Custom(config) => config.serialize(serializer),
        }
    }
}

///
/// PaginationConfig
///
/// Recognized pagination options. Numeric values are never rejected;
/// the paginator clamps them when it calculates.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Items per page; `<= 0` means unlimited.
    pub limit: i64,
    pub sort: SortOrder,
    pub page_window: usize,
    /// Zero-based requested page.
    pub page: i64,
    /// Inclusive `[min, max]` applied to positive limits.
    pub limit_bounds: Option<[usize; 2]>,
    pub page_param: String,
    pub limit_param: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            sort: SortOrder::Asc,
            page_window: DEFAULT_PAGE_WINDOW,
            page: 0,
            limit_bounds: None,
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            limit_param: DEFAULT_LIMIT_PARAM.to_string(),
        }
    }
}

impl PaginationConfig {
    /// Prefix the link parameters with a provider id, as `{id}-page`.
    #[must_use]
    pub fn scoped(mut self, id: Option<&str>) -> Self {
        if let Some(id) = id {
            self.page_param = format!("{id}-{}", self.page_param);
            self.limit_param = format!("{id}-{}", self.limit_param);
        }

        self
    }
}

///
/// ProviderConfig
///
/// Provider-level options: identity, pagination, sort criteria and the
/// key field used to identify models.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub id: Option<String>,
    pub pagination: Setting<PaginationConfig>,
    pub sort: Setting<Sort>,
    pub key: Option<String>,
}

impl ProviderConfig {
    /// Parse a TOML document; every failure is a configuration error.
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(source)
            .map_err(|err| Error::invalid_configuration(err.to_string()))?;

        tracing::trace!(?config, "parsed provider configuration");

        Ok(config)
    }

    /// The sort criteria, if sorting is configured and non-empty.
    #[must_use]
    pub fn sort_criteria(&self) -> Option<&Sort> {
        self.sort.custom().filter(|sort| !sort.is_empty())
    }
}

///
/// TESTS
///
