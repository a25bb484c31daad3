// Copyright (C) 2018-2026 Daniel Mueller (deso@posteo.net)
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(
  clippy::assertions_on_constants,
  clippy::let_unit_value,
  clippy::redundant_field_names,
)]
#![warn(
  future_incompatible,
  missing_copy_implementations,
  missing_debug_implementations,
  missing_docs,
  rust_2018_compatibility,
  rust_2018_idioms,
  trivial_numeric_casts,
  unreachable_pub,
  unstable_features,
  unused_import_braces,
  unused_qualifications,
  unused_results,
)]

//! A crate providing a generic merge engine for record types.
//!
//! Given an "original" and an "updated" instance of the same [`Record`]
//! type, an [`EntityMerger`] overwrites the original's properties with
//! every value of the updated instance that is [present](Presence). A
//! record type may instead declare that it owns its merge semantics by
//! implementing [`Mergeable`], in which case the property based merge
//! is never consulted.
//!
//! ```rust
//! # #[cfg(feature = "derive")]
//! # {
//! use entity_merge::derive::Record;
//! use entity_merge::DataMerger;
//! use entity_merge::EntityMerger;
//!
//! #[derive(Debug, PartialEq, Record)]
//! struct User {
//!   name: String,
//!   age: u32,
//!   active: bool,
//! }
//!
//! let original = User { name: "Alice".to_string(), age: 0, active: false };
//! let updated = User { name: String::new(), age: 5, active: true };
//!
//! let merged = EntityMerger::new().merge(original, updated);
//! assert_eq!(merged, User { name: "Alice".to_string(), age: 5, active: true });
//! # }
//! ```

mod error;
mod merger;
mod mergeable;
mod presence;
mod property;
mod record;
pub mod resolve;

pub use self::error::Error;
pub use self::error::InvokeError;
pub use self::merger::DataMerger;
pub use self::merger::EntityMerger;
pub use self::mergeable::Mergeable;
pub use self::presence::Presence;
pub use self::property::MergePath;
pub use self::property::MergeReport;
pub use self::property::Outcome;
pub use self::property::Property;
pub use self::property::PropertyReport;
pub use self::record::MergeFn;
pub use self::record::Record;

/// A module providing custom derive functionality for `entity_merge`
/// related traits.
///
/// The module merely re-reports the procedural macros provided by the
/// `entity_merge_derive` crate.
#[cfg(feature = "derive")]
pub mod derive {
  pub use entity_merge_derive::*;
}
