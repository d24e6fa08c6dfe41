//! # Features Crate
//!
//! This crate owns everything between the prediction form and the
//! preprocessor: the raw attribute types, the declared feature schema, and
//! the encoder that maps one onto the other.
//!
//! ## Main Components
//!
//! - **types**: Raw form inputs (MovieAttributes, Genre, YesNo) and their bounds
//! - **schema**: The versioned, ordered list of 30 feature fields
//! - **encoder**: FeatureEncoder and the FeatureRecord it produces
//! - **error**: Error types for input collection
//!
//! ## Example Usage
//!
//! ```ignore
//! use features::{FeatureEncoder, MovieAttributes, Genre};
//!
//! let attrs = MovieAttributes {
//!     genres: vec![Genre::Comedy, Genre::War],
//!     ..Default::default()
//! };
//! attrs.validate()?;
//!
//! let record = FeatureEncoder::new().encode(&attrs);
//! assert_eq!(record.len(), 30);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod schema;
pub mod encoder;

// Re-export commonly used types for convenience
pub use error::{FeatureError, Result};
pub use types::{
    Genre,
    MovieAttributes,
    YesNo,
    FRANCHISE_CHOICES,
    KNOWN_FRANCHISES,
    NO_FRANCHISE,
};
pub use schema::{FeatureSchema, FieldKind, FieldSpec, SCHEMA_VERSION};
pub use encoder::{Feature, FeatureEncoder, FeatureRecord};
