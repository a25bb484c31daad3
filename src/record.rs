// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::Property;


/// The signature of a record type's own merge operation.
pub type MergeFn<T> = fn(T, T) -> T;


/// A trait representing a record type that can be merged.
///
/// A record type describes its properties through a static table of
/// [`Property`] descriptors. Only properties declared directly on the
/// type are part of this table. Properties of embedded types (think
/// of an "ancestor" type held in a field) are not, unless the record
/// re-declares them explicitly.
///
/// Usually this trait is implemented via `#[derive(Record)]`, but
/// implementing it by hand is just as straight forward:
///
/// ```rust
/// # use entity_merge::Property;
/// # use entity_merge::Record;
/// # use entity_merge::resolve;
/// struct Tag {
///   id: u64,
///   label: String,
/// }
///
/// impl Record for Tag {
///   const PROPERTIES: &'static [Property<Self>] = &[
///     Property::new("id", |_original: &mut Self, updated: &Self| resolve::read_only(&updated.id)),
///     Property::new("label", |original: &mut Self, updated: &Self| {
///       resolve::field(&mut original.label, &updated.label)
///     }),
///   ];
/// }
/// ```
pub trait Record: Sized + 'static {
  /// The descriptors of all properties declared on the type.
  const PROPERTIES: &'static [Property<Self>];

  /// Query the type's merge capability.
  ///
  /// A type returning `Some` owns its merge semantics: the returned
  /// function is used for merging and the property table is never
  /// consulted by the [`EntityMerger`][crate::EntityMerger].
  #[inline]
  fn merge_capability() -> Option<MergeFn<Self>> {
    None
  }
}
