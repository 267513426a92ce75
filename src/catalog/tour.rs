//! Tour record as it appears in the static JSON catalog

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder shown when a record carries no operator name
pub const DEFAULT_COMPANY: &str = "Local Operator";

/// One tour from the catalog. Read-only once loaded.
///
/// Every field except `name` is optional in the source data; missing,
/// `null` or mistyped values fall back to empty defaults instead of
/// rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub island: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_tags")]
    pub tags: Vec<String>,
    #[serde(
        default,
        rename = "qualityScore",
        alias = "quality",
        deserialize_with = "number_or_zero"
    )]
    pub quality: f64,
    #[serde(default, deserialize_with = "integer_or_zero")]
    pub availability: i64,
    #[serde(
        default,
        rename = "priceMin",
        deserialize_with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_min: Option<f64>,
    #[serde(
        default,
        rename = "priceMax",
        deserialize_with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_max: Option<f64>,
    #[serde(default, rename = "bookingLink", skip_serializing_if = "Option::is_none")]
    pub booking_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Tour {
    /// Minimal record, mostly useful for fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>, island: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            company: None,
            island: island.into(),
            location: None,
            description: None,
            tags: Vec::new(),
            quality: 0.0,
            availability: 0,
            price_min: None,
            price_max: None,
            booking_link: None,
            image: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_availability(mut self, availability: i64) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_price(mut self, min: f64, max: f64) -> Self {
        self.price_min = Some(min);
        self.price_max = Some(max);
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Operator name, or the placeholder when absent
    pub fn company_or_default(&self) -> &str {
        match self.company.as_deref() {
            Some(company) if !company.trim().is_empty() => company,
            _ => DEFAULT_COMPANY,
        }
    }

    /// Lower-cased, space-joined text the search matcher runs against:
    /// name, company, island, location, description and every tag.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.name];

        if let Some(company) = &self.company {
            parts.push(company);
        }
        parts.push(&self.island);
        if let Some(location) = &self.location {
            parts.push(location);
        }
        if let Some(description) = &self.description {
            parts.push(description);
        }
        parts.extend(self.tags.iter().map(String::as_str));

        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Price interval of the record, if it models one.
    ///
    /// A record with only one bound uses it for both ends.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        match (self.price_min, self.price_max) {
            (Some(min), Some(max)) => Some((min, max)),
            (Some(only), None) | (None, Some(only)) => Some((only, only)),
            (None, None) => None,
        }
    }

    pub fn has_price(&self) -> bool {
        self.price_min.is_some() || self.price_max.is_some()
    }

    /// Island name for display: "big island" becomes "Big Island", anything
    /// else gets its first letter capitalized.
    pub fn island_display(&self) -> String {
        if self.island.eq_ignore_ascii_case("big island") {
            return "Big Island".to_string();
        }

        let mut chars = self.island.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A number, or a string holding one. Anything else is `None`.
fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from_value(&Value::deserialize(deserializer)?))
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.unwrap_or(0.0))
}

/// Fractional counts are truncated
fn integer_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.map_or(0, |n| n as i64))
}

/// Non-string entries are dropped; a bare string is a single tag
fn string_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        Value::String(tag) => vec![tag],
        _ => Vec::new(),
    })
}

/// Catalogs use both numeric and string ids
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => s,
        Some(RawId::Int(n)) => n.to_string(),
        Some(RawId::Float(f)) => f.to_string(),
        None => String::new(),
    })
}
