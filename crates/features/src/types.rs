//! Raw, user-facing movie attributes.
//!
//! This module defines what the prediction form collects before anything
//! is encoded:
//! - `Genre`: the fixed 21-label genre vocabulary
//! - `YesNo`: the two-way choice used by "Holiday Season" and "Has Sequel"
//! - `MovieAttributes`: one complete form submission
//!
//! The bounds constants mirror the limits of the input widgets.

use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

// =============================================================================
// Input bounds
// =============================================================================

pub const BUDGET_RANGE: RangeInclusive<u64> = 1_000_000..=1_000_000_000;
pub const RUNNING_TIME_RANGE: RangeInclusive<u64> = 60..=400;
pub const RELEASE_MONTH_RANGE: RangeInclusive<u64> = 1..=12;
pub const RELEASE_YEAR_RANGE: RangeInclusive<u64> = 1980..=2030;
/// Shared by director and lead actor popularity (average revenue in dollars)
pub const POPULARITY_RANGE: RangeInclusive<u64> = 0..=1_000_000_000;

/// Franchise choice meaning "not part of a franchise"
pub const NO_FRANCHISE: &str = "None";

/// Franchises the model knows about. Anything else encodes as 0.
pub const KNOWN_FRANCHISES: [&str; 5] = [
    "Avengers",
    "Harry Potter",
    "Star Wars",
    "Batman",
    "Spider-Man",
];

/// Choices offered by the franchise selector
pub const FRANCHISE_CHOICES: [&str; 6] = [
    NO_FRANCHISE,
    "Avengers",
    "Harry Potter",
    "Star Wars",
    "Batman",
    "Spider-Man",
];

// =============================================================================
// Genre
// =============================================================================

/// Movie genres understood by the revenue model.
///
/// The declaration order is the one-hot column order, so `Genre::ALL`
/// must never be reordered without regenerating the preprocessor artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Drama,
    Sport,
    Thriller,
    Fantasy,
    Animation,
    Crime,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Action,
    Adventure,
    Romance,
    Documentary,
    Horror,
    Mystery,
    War,
    Family,
    Biography,
    Musical,
    Western,
    History,
    Comedy,
    Music,
}

impl Genre {
    /// Every genre, in feature-vector order
    pub const ALL: [Genre; 21] = [
        Genre::Drama,
        Genre::Sport,
        Genre::Thriller,
        Genre::Fantasy,
        Genre::Animation,
        Genre::Crime,
        Genre::SciFi,
        Genre::Action,
        Genre::Adventure,
        Genre::Romance,
        Genre::Documentary,
        Genre::Horror,
        Genre::Mystery,
        Genre::War,
        Genre::Family,
        Genre::Biography,
        Genre::Musical,
        Genre::Western,
        Genre::History,
        Genre::Comedy,
        Genre::Music,
    ];

    /// The label used both on the form and as the feature name
    pub fn label(self) -> &'static str {
        match self {
            Genre::Drama => "Drama",
            Genre::Sport => "Sport",
            Genre::Thriller => "Thriller",
            Genre::Fantasy => "Fantasy",
            Genre::Animation => "Animation",
            Genre::Crime => "Crime",
            Genre::SciFi => "Sci-Fi",
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Romance => "Romance",
            Genre::Documentary => "Documentary",
            Genre::Horror => "Horror",
            Genre::Mystery => "Mystery",
            Genre::War => "War",
            Genre::Family => "Family",
            Genre::Biography => "Biography",
            Genre::Musical => "Musical",
            Genre::Western => "Western",
            Genre::History => "History",
            Genre::Comedy => "Comedy",
            Genre::Music => "Music",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = FeatureError;

    /// Case-insensitive match against the labels
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Genre::ALL
            .into_iter()
            .find(|genre| genre.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FeatureError::UnknownGenre(s.to_string()))
    }
}

// =============================================================================
// Yes / No
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YesNo::Yes => f.write_str("Yes"),
            YesNo::No => f.write_str("No"),
        }
    }
}

impl FromStr for YesNo {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(YesNo::Yes),
            "no" => Ok(YesNo::No),
            _ => Err(FeatureError::InvalidChoice {
                field: "yes/no",
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// MovieAttributes
// =============================================================================

/// One submission of the prediction form.
///
/// Field defaults match the form's initial widget values, so a JSON object
/// only needs the fields the user changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieAttributes {
    /// Production budget in dollars
    pub budget: u64,
    /// Minutes
    pub running_time: u16,
    pub release_month: u8,
    pub release_year: u16,
    /// Average revenue of the director's previous films
    pub director_popularity: u64,
    /// Average revenue of the lead actor's previous films
    pub lead_actor_popularity: u64,
    pub holiday_season: YesNo,
    pub has_sequel: YesNo,
    /// Franchise name as chosen on the form ("None" when standalone)
    pub franchise: String,
    /// Selected genres; order and duplicates carry no meaning
    pub genres: Vec<Genre>,
}

impl Default for MovieAttributes {
    fn default() -> Self {
        Self {
            budget: 50_000_000,
            running_time: 150,
            release_month: 6,
            release_year: 2025,
            director_popularity: 50_000_000,
            lead_actor_popularity: 50_000_000,
            holiday_season: YesNo::Yes,
            has_sequel: YesNo::Yes,
            franchise: NO_FRANCHISE.to_string(),
            genres: Vec::new(),
        }
    }
}

impl MovieAttributes {
    /// Check every input against the bounds the form enforces.
    ///
    /// Returns the first violation found, in form order. Franchise must be
    /// one of `FRANCHISE_CHOICES`.
    pub fn validate(&self) -> Result<()> {
        check_range("Budget", self.budget, &BUDGET_RANGE)?;
        check_range("Running Time", self.running_time.into(), &RUNNING_TIME_RANGE)?;
        check_range("Release Month", self.release_month.into(), &RELEASE_MONTH_RANGE)?;
        check_range("Release Year", self.release_year.into(), &RELEASE_YEAR_RANGE)?;
        check_range("Director Popularity", self.director_popularity, &POPULARITY_RANGE)?;
        check_range("Lead Actor Popularity", self.lead_actor_popularity, &POPULARITY_RANGE)?;

        if !FRANCHISE_CHOICES.contains(&self.franchise.as_str()) {
            return Err(FeatureError::InvalidChoice {
                field: "Franchise",
                value: self.franchise.clone(),
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: u64, range: &RangeInclusive<u64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(FeatureError::PreconditionViolation {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
