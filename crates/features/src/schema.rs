//! The declared feature schema.
//!
//! The preprocessor artifact is fitted against a specific, ordered list of
//! named columns. That list lives here, versioned, so the service can check
//! a loaded artifact against it at startup instead of failing deep inside a
//! transform.

use serde::Serialize;

/// Bump whenever a field is added, removed, renamed or reordered.
pub const SCHEMA_VERSION: u32 = 1;

/// Feature names, exactly as the preprocessor was fitted on them
pub mod names {
    pub const BUDGET: &str = "Budget";
    pub const RUNNING_TIME: &str = "Running Time";
    pub const RELEASE_MONTH: &str = "Release Month";
    pub const RELEASE_YEAR: &str = "Release Year";
    pub const DIRECTOR_POPULARITY: &str = "Director Popularity";
    pub const LEAD_ACTOR_POPULARITY: &str = "Lead Actor Popularity";
    pub const HOLIDAY_SEASON: &str = "Holiday Season";
    pub const HAS_SEQUEL: &str = "Has Sequel";
    pub const FRANCHISE: &str = "Franchise";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Passed through unchanged from the form
    Numeric,
    /// 0/1 derived from a categorical choice
    Indicator,
    /// 0/1 one-hot column for a genre label
    Genre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

const FIELDS: [FieldSpec; 30] = [
    field(names::BUDGET, FieldKind::Numeric),
    field(names::RUNNING_TIME, FieldKind::Numeric),
    field(names::RELEASE_MONTH, FieldKind::Numeric),
    field(names::RELEASE_YEAR, FieldKind::Numeric),
    field(names::DIRECTOR_POPULARITY, FieldKind::Numeric),
    field(names::LEAD_ACTOR_POPULARITY, FieldKind::Numeric),
    field(names::HOLIDAY_SEASON, FieldKind::Indicator),
    field(names::HAS_SEQUEL, FieldKind::Indicator),
    field(names::FRANCHISE, FieldKind::Indicator),
    // Genre one-hot columns, in `Genre::ALL` order
    field("Drama", FieldKind::Genre),
    field("Sport", FieldKind::Genre),
    field("Thriller", FieldKind::Genre),
    field("Fantasy", FieldKind::Genre),
    field("Animation", FieldKind::Genre),
    field("Crime", FieldKind::Genre),
    field("Sci-Fi", FieldKind::Genre),
    field("Action", FieldKind::Genre),
    field("Adventure", FieldKind::Genre),
    field("Romance", FieldKind::Genre),
    field("Documentary", FieldKind::Genre),
    field("Horror", FieldKind::Genre),
    field("Mystery", FieldKind::Genre),
    field("War", FieldKind::Genre),
    field("Family", FieldKind::Genre),
    field("Biography", FieldKind::Genre),
    field("Musical", FieldKind::Genre),
    field("Western", FieldKind::Genre),
    field("History", FieldKind::Genre),
    field("Comedy", FieldKind::Genre),
    field("Music", FieldKind::Genre),
];

/// An ordered list of typed feature fields plus its version.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureSchema {
    version: u32,
    fields: &'static [FieldSpec],
}

impl FeatureSchema {
    /// The schema the encoder produces and the artifacts must match
    pub const CURRENT: FeatureSchema = FeatureSchema {
        version: SCHEMA_VERSION,
        fields: &FIELDS,
    };

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Index of a field by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
