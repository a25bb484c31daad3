// Copyright (C) 2020-2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later


/// A trait for record types owning their merge semantics.
///
/// A [`Record`][crate::Record] opts into this capability through
/// [`Record::merge_capability`][crate::Record::merge_capability] (or
/// `#[merge(mergeable)]` when deriving). Once it did, the
/// [`EntityMerger`][crate::EntityMerger] hands both instances to
/// [`merge_with`][Mergeable::merge_with] and never runs its own
/// property based merge for the type.
pub trait Mergeable {
  /// Merge `updated` into `self` and return the result.
  ///
  /// Whether the returned value is `self` (modified) or an entirely
  /// new value is up to the implementation.
  fn merge_with(self, updated: Self) -> Self;
}
