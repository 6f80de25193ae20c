//! Extraction core: pure functions over already-located page text.
//!
//! - [`normalize`]: numeric text coercion
//! - [`stability`]: release stability classification via [`ReleaseStabilityClassifier`]
//! - [`columns`] and [`usage`]: usage table parsing into a [`UsageTable`](crate::model::UsageTable)
//! - [`facts`]: download and install counts from the project information list
//! - [`releases`]: release identifiers from the release listing

pub mod columns;
pub mod facts;
pub mod normalize;
pub mod releases;
pub mod stability;
pub mod usage;

pub use columns::{ColumnLayout, LayoutError, VersionColumn};
pub use facts::{FactsError, InfoEntry};
pub use normalize::NumberError;
pub use releases::ReleaseBlock;
pub use stability::{ReleaseStabilityClassifier, StabilityError, StabilityMap, StabilityTier};
pub use usage::UsageError;
