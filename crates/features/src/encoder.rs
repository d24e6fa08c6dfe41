//! Feature encoding for revenue prediction.
//!
//! This module turns a validated `MovieAttributes` into the `FeatureRecord`
//! the preprocessor expects: numerics pass through, Yes/No and franchise
//! collapse to 0/1, and genres expand into one indicator per vocabulary label.

use crate::schema::FeatureSchema;
use crate::types::{Genre, KNOWN_FRANCHISES, MovieAttributes, YesNo};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

/// A single named feature value
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub value: f64,
}

/// An ordered mapping from feature name to value.
///
/// Records produced by `FeatureEncoder` always follow
/// `FeatureSchema::CURRENT`. Records built with `from_pairs` can hold any
/// fields, which is how a mismatched record reaches the preprocessor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRecord {
    features: Vec<Feature>,
}

impl FeatureRecord {
    /// Build a record from `(name, value)` pairs, keeping their order.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            features: pairs
                .into_iter()
                .map(|(name, value)| Feature {
                    name: name.into(),
                    value,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Look up a value by feature name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.name.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.features.iter().map(|f| f.value).collect()
    }
}

impl<'a> IntoIterator for &'a FeatureRecord {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// Serialized as a JSON object whose keys keep the record order
impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.features.len()))?;
        for feature in &self.features {
            map.serialize_entry(&feature.name, &feature.value)?;
        }
        map.end()
    }
}

/// 1 for "Yes", 0 for "No"
pub fn yes_no_indicator(choice: YesNo) -> f64 {
    if choice.is_yes() { 1.0 } else { 0.0 }
}

/// 1 if the franchise is one the model knows about, 0 otherwise.
///
/// Identity beyond known/unknown is dropped: "Batman" and "Star Wars" both
/// encode as 1.
pub fn franchise_indicator(franchise: &str) -> f64 {
    if KNOWN_FRANCHISES.contains(&franchise) { 1.0 } else { 0.0 }
}

/// One 0/1 value per vocabulary genre, in `Genre::ALL` order.
pub fn genre_indicators(selected: &[Genre]) -> [f64; 21] {
    let selected: HashSet<Genre> = selected.iter().copied().collect();
    Genre::ALL.map(|genre| if selected.contains(&genre) { 1.0 } else { 0.0 })
}

/// Builds `FeatureRecord`s in the declared schema order.
///
/// Ranges are not re-checked here; the input layer validates before
/// encoding.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
}

impl FeatureEncoder {
    pub fn new() -> Self {
        Self {
            schema: FeatureSchema::CURRENT,
        }
    }

    /// Encode one form submission.
    pub fn encode(&self, attrs: &MovieAttributes) -> FeatureRecord {
        let scalars = [
            attrs.budget as f64,
            f64::from(attrs.running_time),
            f64::from(attrs.release_month),
            f64::from(attrs.release_year),
            attrs.director_popularity as f64,
            attrs.lead_actor_popularity as f64,
            yes_no_indicator(attrs.holiday_season),
            yes_no_indicator(attrs.has_sequel),
            franchise_indicator(&attrs.franchise),
        ];
        let genres = genre_indicators(&attrs.genres);

        let values = scalars.into_iter().chain(genres);
        let record = FeatureRecord::from_pairs(self.schema.names().zip(values));

        debug_assert_eq!(record.len(), self.schema.len());
        record
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}
