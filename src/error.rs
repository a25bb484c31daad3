// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::error::Error as StdError;

use thiserror::Error;


/// The error type surfaced by fallible merge entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
  /// There was no original instance to merge into.
  #[error("no original `{record}` instance to merge into")]
  MissingOriginal {
    /// The name of the record type.
    record: &'static str,
  },
}


/// An error reported by a property's write operation.
///
/// Such errors never escape a merge. They are recorded as
/// [`Outcome::SkippedInvocationError`][crate::Outcome::SkippedInvocationError]
/// and the property in question keeps its original value.
#[derive(Debug, Error)]
#[error("property write failed: {source}")]
pub struct InvokeError {
  #[source]
  source: Box<dyn StdError + Send + Sync>,
}

impl InvokeError {
  /// Create a new `InvokeError` wrapping the given error.
  pub fn new<E>(error: E) -> Self
  where
    E: Into<Box<dyn StdError + Send + Sync>>,
  {
    Self {
      source: error.into(),
    }
  }

  /// Retrieve the error reported by the write operation.
  pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
    self.source.as_ref()
  }
}
