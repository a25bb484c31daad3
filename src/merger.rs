// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::any::type_name;

use tracing::trace;

use crate::resolve::merge_properties;
use crate::resolve::merge_properties_reported;
use crate::Error;
use crate::MergePath;
use crate::MergeFn;
use crate::MergeReport;
use crate::Record;


/// Retrieve the merge capability of `T`, if it has one.
fn capability<T>() -> Option<MergeFn<T>>
where
  T: Record,
{
  let merge = T::merge_capability()?;
  trace!(record = type_name::<T>(), "delegating merge to record type");
  Some(merge)
}


/// A trait for merging an updated record into an original one.
pub trait DataMerger {
  /// Merge `updated` into `original` and return the merged record.
  fn merge<T>(&self, original: T, updated: T) -> T
  where
    T: Record;
}


/// The default [`DataMerger`].
///
/// The merger first queries the record type's merge capability. If the
/// type implements [`Mergeable`][crate::Mergeable] and declared so,
/// merging is left entirely to it. Otherwise the type's properties are
/// merged one by one, as done by [`merge_properties`]. In the latter
/// case the returned record is `original` itself, with all present
/// values of `updated` written to it.
///
/// The merger does not carry any state and may be shared freely among
/// threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityMerger {}

impl EntityMerger {
  /// Create a new `EntityMerger`.
  #[inline]
  pub fn new() -> Self {
    Self {}
  }

  /// Merge `updated` into `original`, additionally reporting what
  /// happened to each property.
  ///
  /// The merged record is the same as the one [`DataMerger::merge`]
  /// produces.
  pub fn merge_reported<T>(&self, original: T, updated: T) -> (T, MergeReport)
  where
    T: Record,
  {
    if let Some(merge) = capability::<T>() {
      (merge(original, updated), MergeReport::new(MergePath::Capability))
    } else {
      merge_properties_reported(original, updated)
    }
  }

  /// Merge two possibly absent records.
  ///
  /// Without an `original` there is nothing to merge into and an
  /// [`Error::MissingOriginal`] is reported. Without an `updated`
  /// record there is nothing to merge and `original` is returned as
  /// is.
  pub fn merge_optional<T>(&self, original: Option<T>, updated: Option<T>) -> Result<T, Error>
  where
    T: Record,
  {
    let original = original.ok_or(Error::MissingOriginal {
      record: type_name::<T>(),
    })?;

    match updated {
      Some(updated) => Ok(self.merge(original, updated)),
      None => Ok(original),
    }
  }
}

impl DataMerger for EntityMerger {
  fn merge<T>(&self, original: T, updated: T) -> T
  where
    T: Record,
  {
    if let Some(merge) = capability::<T>() {
      merge(original, updated)
    } else {
      merge_properties(original, updated)
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  use std::cell::Cell;

  use crate::resolve::field;
  use crate::Mergeable;
  use crate::Outcome;
  use crate::Property;


  thread_local! {
    static RESOLVED: Cell<usize> = Cell::new(0);
  }


  /// A record whose property table counts how often it got used.
  #[derive(Debug, PartialEq)]
  struct Counted {
    value: u32,
  }

  impl Record for Counted {
    const PROPERTIES: &'static [Property<Self>] = &[Property::new(
      "value",
      |original: &mut Self, updated: &Self| {
        RESOLVED.with(|resolved| resolved.set(resolved.get() + 1));
        field(&mut original.value, &updated.value)
      },
    )];
  }


  /// A record owning its merge, which sums up values.
  #[derive(Debug, PartialEq)]
  struct Summing {
    value: u32,
  }

  impl Mergeable for Summing {
    fn merge_with(self, updated: Self) -> Self {
      Self {
        value: self.value + updated.value,
      }
    }
  }

  impl Record for Summing {
    const PROPERTIES: &'static [Property<Self>] = &[Property::new(
      "value",
      |original: &mut Self, updated: &Self| {
        RESOLVED.with(|resolved| resolved.set(resolved.get() + 1));
        field(&mut original.value, &updated.value)
      },
    )];

    fn merge_capability() -> Option<MergeFn<Self>> {
      Some(<Self as Mergeable>::merge_with)
    }
  }


  fn resolved() -> usize {
    RESOLVED.with(Cell::get)
  }


  /// Check that records without merge capability are merged property
  /// by property.
  #[test]
  fn property_path() {
    let before = resolved();
    let merged = EntityMerger::new().merge(Counted { value: 1 }, Counted { value: 2 });
    assert_eq!(merged, Counted { value: 2 });
    assert_eq!(resolved(), before + 1);
  }

  /// Check that a record's merge capability takes precedence over the
  /// property based merge.
  #[test]
  fn capability_path() {
    let before = resolved();
    let merger = EntityMerger::new();
    let merged = merger.merge(Summing { value: 1 }, Summing { value: 2 });
    assert_eq!(merged, Summing { value: 3 });

    let (merged, report) = merger.merge_reported(Summing { value: 3 }, Summing { value: 4 });
    assert_eq!(merged, Summing { value: 7 });
    assert_eq!(report.path(), MergePath::Capability);
    assert!(report.is_empty());
    assert_eq!(resolved(), before);
  }

  /// Check that the merge capability is looked up only for records
  /// declaring one.
  #[test]
  fn capability_lookup() {
    assert!(capability::<Counted>().is_none());

    let merge = capability::<Summing>().unwrap();
    assert_eq!(merge(Summing { value: 2 }, Summing { value: 5 }), Summing { value: 7 });
  }

  /// Check that the reported merge yields the same record as the
  /// plain one.
  #[test]
  fn reported_merge_matches_plain_merge() {
    let merger = EntityMerger::new();
    let (merged, report) = merger.merge_reported(Counted { value: 1 }, Counted { value: 0 });
    assert_eq!(merged, merger.merge(Counted { value: 1 }, Counted { value: 0 }));
    assert_eq!(report.path(), MergePath::Properties);
    assert!(matches!(report.outcome("value"), Some(Outcome::Applied)));
  }

  /// Check our policy for absent records.
  #[test]
  fn optional_records() {
    let merger = EntityMerger::new();
    let merged = merger.merge_optional(Some(Counted { value: 1 }), Some(Counted { value: 5 }));
    assert_eq!(merged.unwrap(), Counted { value: 5 });

    let merged = merger.merge_optional(Some(Counted { value: 1 }), None);
    assert_eq!(merged.unwrap(), Counted { value: 1 });

    let error = merger
      .merge_optional(None, Some(Counted { value: 5 }))
      .unwrap_err();
    assert!(matches!(error, Error::MissingOriginal { .. }));
    assert!(error.to_string().contains("Counted"));
  }
}
