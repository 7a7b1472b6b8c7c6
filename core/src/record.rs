use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// One catalog line. Every field is optional in the input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Non-string values are kept as `None` rather than failing the line.
    #[serde(default, deserialize_with = "string_values")]
    pub product_features: BTreeMap<String, Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_reviews: Vec<Review>,
}

/// A numeric review rating. Integer ratings keep their integer form on output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Integer(i64),
    Float(f64),
}

impl Rating {
    /// `None` for anything that is not a finite JSON number (strings, bools, null).
    pub fn from_value(value: &Value) -> Option<Rating> {
        let Value::Number(n) = value else { return None };
        if let Some(i) = n.as_i64() {
            return Some(Rating::Integer(i));
        }
        n.as_f64().filter(|f| f.is_finite()).map(Rating::Float)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Rating::Integer(i) => i as f64,
            Rating::Float(f) => f,
        }
    }
}

// Text formats carry a bare number; binary formats cannot self-describe, so
// they get an explicit variant tag.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PlainRating {
    Integer(i64),
    Float(f64),
}

#[derive(Serialize, Deserialize)]
enum TaggedRating {
    Integer(i64),
    Float(f64),
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match (*self, s.is_human_readable()) {
            (Rating::Integer(i), true) => PlainRating::Integer(i).serialize(s),
            (Rating::Float(f), true) => PlainRating::Float(f).serialize(s),
            (Rating::Integer(i), false) => TaggedRating::Integer(i).serialize(s),
            (Rating::Float(f), false) => TaggedRating::Float(f).serialize(s),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        if d.is_human_readable() {
            Ok(match PlainRating::deserialize(d)? {
                PlainRating::Integer(i) => Rating::Integer(i),
                PlainRating::Float(f) => Rating::Float(f),
            })
        } else {
            Ok(match TaggedRating::deserialize(d)? {
                TaggedRating::Integer(i) => Rating::Integer(i),
                TaggedRating::Float(f) => Rating::Float(f),
            })
        }
    }
}

/// A review entry reduced to its rating; text fields are not indexed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Review {
    pub rating: Option<Rating>,
}

impl Review {
    pub fn rated(rating: Rating) -> Self {
        Self { rating: Some(rating) }
    }
}

impl From<Value> for Review {
    fn from(value: Value) -> Self {
        Review { rating: value.get("rating").and_then(Rating::from_value) }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn string_values<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, Option<String>>, D::Error> {
    let raw: BTreeMap<String, Value> = null_as_default(d)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, Some(s)),
            _ => (k, None),
        })
        .collect())
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
