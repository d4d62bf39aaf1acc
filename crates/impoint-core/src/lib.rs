//! impoint-core - Categorical label coding for point cloud widgets
//!
//! This crate owns the data/model side of a categorical scatter widget:
//! a stable integer encoding of category labels over a column of values,
//! with missing-value handling, relabeling semantics, per-label colors,
//! and change notification.
//!
//! # Key Components
//!
//! - **Label**: closed label domain (integer or text values)
//! - **LabelCoding**: the bijection between labels and codes `1..=K`
//!   (code 0 is reserved for missing)
//! - **Category**: a column's coded values, coding, and color palette,
//!   with relabel and bulk-recode operations
//! - **CategoryHandle**: single-owner shared handle with explicit
//!   subscriptions and sequential change notification

pub mod category;
pub mod coding;
pub mod color;
pub mod error;
pub mod events;
pub mod label;

pub use category::{Category, MissingLabelPolicy};
pub use coding::LabelCoding;
pub use color::{palette_color, Color, CATEGORICAL_PALETTE};
pub use error::{CategoryError, CategoryResult};
pub use events::{CategoryEvent, CategoryHandle, SubscriptionId};
pub use label::{Label, LabelDomain};
