// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

//! The property based merge of records.
//!
//! Merging walks the [`Record::PROPERTIES`] table of a type and, for
//! each property, reads the value from the updated record, checks it
//! for [presence](Presence), and writes it to the original record. It
//! is a best-effort procedure: a property that lacks a write operation
//! or whose write operation fails is left untouched and the merge
//! carries on with the next one.
//!
//! Besides the merge itself, this module contains the building blocks
//! out of which [`Property`][crate::Property] merge handles are made.

use std::any::type_name;
use std::error::Error as StdError;

use tracing::debug;

use crate::InvokeError;
use crate::MergePath;
use crate::MergeReport;
use crate::Outcome;
use crate::Presence;
use crate::Record;


/// A trait for the result of a property's write operation.
///
/// Write operations may either be infallible, returning `()`, or
/// report errors through a `Result`.
pub trait SetResult {
  /// Convert the write operation's result into a `Result`.
  fn into_result(self) -> Result<(), InvokeError>;
}

impl SetResult for () {
  #[inline]
  fn into_result(self) -> Result<(), InvokeError> {
    Ok(())
  }
}

impl<E> SetResult for Result<(), E>
where
  E: Into<Box<dyn StdError + Send + Sync>>,
{
  #[inline]
  fn into_result(self) -> Result<(), InvokeError> {
    self.map_err(InvokeError::new)
  }
}


/// Merge a plain field: overwrite `target` with a clone of `value` if
/// the latter is present.
pub fn field<V>(target: &mut V, value: &V) -> Outcome
where
  V: Presence + Clone,
{
  if !value.is_present() {
    return Outcome::SkippedAbsentValue
  }

  target.clone_from(value);
  Outcome::Applied
}

/// Merge a property without a write operation.
///
/// Nothing is ever written, but an absent value is still reported as
/// such, because the presence check happens before a write operation
/// is looked for.
pub fn read_only<V>(value: &V) -> Outcome
where
  V: Presence + ?Sized,
{
  if !value.is_present() {
    Outcome::SkippedAbsentValue
  } else {
    Outcome::SkippedNoSetter
  }
}

/// Merge a property exposed through a pair of accessor functions.
///
/// `get` reads the value from `updated` and, if it is present, `set`
/// writes it to `original`. An error reported by `set` is captured in
/// the returned [`Outcome`]. The write operation is expected to leave
/// the record unchanged in that case.
pub fn accessor<T, V, G, S, R>(original: &mut T, updated: &T, get: G, set: S) -> Outcome
where
  V: Presence,
  G: FnOnce(&T) -> V,
  S: FnOnce(&mut T, V) -> R,
  R: SetResult,
{
  let value = get(updated);
  if !value.is_present() {
    return Outcome::SkippedAbsentValue
  }

  write(original, value, set)
}


/// Merge a plain field whose value always counts as present.
///
/// This is the counterpart of [`field`] for value types without a
/// [`Presence`] implementation.
pub fn field_always<V>(target: &mut V, value: &V) -> Outcome
where
  V: Clone,
{
  target.clone_from(value);
  Outcome::Applied
}

/// Merge a property without a write operation whose value always
/// counts as present.
pub fn read_only_always<V>(_value: &V) -> Outcome
where
  V: ?Sized,
{
  Outcome::SkippedNoSetter
}

/// Merge a property exposed through a pair of accessor functions,
/// treating every value read as present.
pub fn accessor_always<T, V, G, S, R>(original: &mut T, updated: &T, get: G, set: S) -> Outcome
where
  G: FnOnce(&T) -> V,
  S: FnOnce(&mut T, V) -> R,
  R: SetResult,
{
  let value = get(updated);
  write(original, value, set)
}


fn write<T, V, S, R>(original: &mut T, value: V, set: S) -> Outcome
where
  S: FnOnce(&mut T, V) -> R,
  R: SetResult,
{
  match set(original, value).into_result() {
    Ok(()) => Outcome::Applied,
    Err(err) => Outcome::SkippedInvocationError(err),
  }
}


/// Run all property merge handles of `T`, feeding each outcome to
/// `visit`.
fn merge_with<T, F>(original: &mut T, updated: &T, mut visit: F)
where
  T: Record,
  F: FnMut(&'static str, Outcome),
{
  for property in T::PROPERTIES {
    let outcome = property.merge(original, updated);
    visit(property.name(), outcome)
  }
}

/// Merge `updated` into `original` property by property.
///
/// All present values of `updated` are written to `original`, which is
/// then returned. Properties that could not be merged are silently
/// skipped. Use [`merge_properties_reported`] to find out which.
pub fn merge_properties<T>(mut original: T, updated: T) -> T
where
  T: Record,
{
  let mut applied = 0usize;
  let mut skipped = 0usize;

  merge_with(&mut original, &updated, |_name, outcome| {
    if outcome.is_applied() {
      applied += 1;
    } else {
      skipped += 1;
    }
  });

  debug!(record = type_name::<T>(), applied, skipped, "merged record properties");
  original
}

/// Merge `updated` into `original` property by property, reporting
/// the outcome for every property.
pub fn merge_properties_reported<T>(mut original: T, updated: T) -> (T, MergeReport)
where
  T: Record,
{
  let mut report = MergeReport::with_capacity(MergePath::Properties, T::PROPERTIES.len());
  merge_with(&mut original, &updated, |name, outcome| report.push(name, outcome));

  debug!(
    record = type_name::<T>(),
    applied = report.applied().count(),
    skipped = report.skipped().count(),
    "merged record properties"
  );
  (original, report)
}
