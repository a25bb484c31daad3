// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::slice::Iter;

use crate::InvokeError;


/// The outcome of merging a single property.
#[derive(Debug)]
pub enum Outcome {
  /// The updated value was written to the original record.
  Applied,
  /// The property has no write operation.
  SkippedNoSetter,
  /// The updated value is absent and did not overwrite anything.
  SkippedAbsentValue,
  /// The write operation reported an error.
  SkippedInvocationError(InvokeError),
}

impl Outcome {
  /// Check whether the property was written.
  #[inline]
  pub fn is_applied(&self) -> bool {
    matches!(self, Self::Applied)
  }
}


/// A descriptor of a single property of a record type `T`.
///
/// The descriptor pairs the property's read operation with its write
/// operation (if any) in a single merge handle. The handle reads the
/// property from the updated record, decides on presence, and writes
/// to the original. The functions in [`resolve`][crate::resolve]
/// provide the building blocks for such handles.
pub struct Property<T> {
  name: &'static str,
  type_name: Option<&'static str>,
  merge: fn(&mut T, &T) -> Outcome,
}

impl<T> Property<T> {
  /// Create a new property descriptor.
  pub const fn new(name: &'static str, merge: fn(&mut T, &T) -> Outcome) -> Self {
    Self {
      name,
      type_name: None,
      merge,
    }
  }

  /// Create a new property descriptor carrying the name of the
  /// property's declared type.
  pub const fn typed(
    name: &'static str,
    type_name: &'static str,
    merge: fn(&mut T, &T) -> Outcome,
  ) -> Self {
    Self {
      name,
      type_name: Some(type_name),
      merge,
    }
  }

  /// Retrieve the property's name.
  #[inline]
  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Retrieve the name of the property's declared type, if known.
  #[inline]
  pub fn type_name(&self) -> Option<&'static str> {
    self.type_name
  }

  /// Merge this property of `updated` into `original`.
  #[inline]
  pub fn merge(&self, original: &mut T, updated: &T) -> Outcome {
    (self.merge)(original, updated)
  }
}

impl<T> Clone for Property<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Property<T> {}

impl<T> Debug for Property<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("Property")
      .field("name", &self.name)
      .field("type_name", &self.type_name)
      .finish()
  }
}


/// The path a merge took.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergePath {
  /// The record type's own [`Mergeable`][crate::Mergeable]
  /// implementation performed the merge.
  Capability,
  /// The property based merge was used.
  Properties,
}


/// The outcome of merging one named property.
#[derive(Debug)]
pub struct PropertyReport {
  name: &'static str,
  outcome: Outcome,
}

impl PropertyReport {
  /// Retrieve the name of the property.
  #[inline]
  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Retrieve the outcome of merging the property.
  #[inline]
  pub fn outcome(&self) -> &Outcome {
    &self.outcome
  }
}


/// A report about a merge, listing the outcome of every property in
/// declaration order.
///
/// Reports of merges that took the [`MergePath::Capability`] path do
/// not contain any properties: the record type decided on its own what
/// to merge.
#[derive(Debug)]
pub struct MergeReport {
  path: MergePath,
  properties: Vec<PropertyReport>,
}

impl MergeReport {
  pub(crate) fn new(path: MergePath) -> Self {
    Self {
      path,
      properties: Vec::new(),
    }
  }

  pub(crate) fn with_capacity(path: MergePath, capacity: usize) -> Self {
    Self {
      path,
      properties: Vec::with_capacity(capacity),
    }
  }

  pub(crate) fn push(&mut self, name: &'static str, outcome: Outcome) {
    self.properties.push(PropertyReport { name, outcome })
  }

  /// Retrieve the path the merge took.
  #[inline]
  pub fn path(&self) -> MergePath {
    self.path
  }

  /// Retrieve an iterator over all reported properties.
  #[inline]
  pub fn iter(&self) -> Iter<'_, PropertyReport> {
    self.properties.iter()
  }

  /// Look up the outcome for the property with the given name.
  pub fn outcome(&self, name: &str) -> Option<&Outcome> {
    self
      .properties
      .iter()
      .find(|report| report.name == name)
      .map(PropertyReport::outcome)
  }

  /// Retrieve an iterator over the names of all applied properties.
  pub fn applied(&self) -> impl Iterator<Item = &'static str> + '_ {
    self
      .properties
      .iter()
      .filter(|report| report.outcome.is_applied())
      .map(PropertyReport::name)
  }

  /// Retrieve an iterator over all properties that were skipped.
  pub fn skipped(&self) -> impl Iterator<Item = &PropertyReport> + '_ {
    self
      .properties
      .iter()
      .filter(|report| !report.outcome.is_applied())
  }

  /// Check whether any property's write operation failed.
  ///
  /// Absent values and missing write operations are an expected part
  /// of a merge and not considered failures.
  pub fn has_failures(&self) -> bool {
    self
      .properties
      .iter()
      .any(|report| matches!(report.outcome, Outcome::SkippedInvocationError(..)))
  }

  /// Retrieve the number of reported properties.
  #[inline]
  pub fn len(&self) -> usize {
    self.properties.len()
  }

  /// Check whether the report contains no properties.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.properties.is_empty()
  }
}

impl<'report> IntoIterator for &'report MergeReport {
  type Item = &'report PropertyReport;
  type IntoIter = Iter<'report, PropertyReport>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
