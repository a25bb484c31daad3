// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::BinaryHeap;
use std::collections::LinkedList;
use std::collections::VecDeque;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::net::SocketAddr;
use std::net::SocketAddrV4;
use std::net::SocketAddrV6;
use std::num::NonZeroI128;
use std::num::NonZeroI16;
use std::num::NonZeroI32;
use std::num::NonZeroI64;
use std::num::NonZeroI8;
use std::num::NonZeroIsize;
use std::num::NonZeroU128;
use std::num::NonZeroU16;
use std::num::NonZeroU32;
use std::num::NonZeroU64;
use std::num::NonZeroU8;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;


/// A trait deciding whether a value is significant enough to overwrite
/// the value of an original record.
///
/// Only two kinds of values are considered absent: "no value" (`None`)
/// and the empty string. Everything else, including numeric zero,
/// `false`, and empty containers, is present. That is also what the
/// provided default implementation reports, so a custom property type
/// can opt in with an empty `impl`. Types of other crates, for which
/// no such `impl` can be written, are merged by marking the field
/// `#[merge(always_present)]` instead.
///
///
/// ```rust
/// # use entity_merge::Presence;
/// #[derive(Clone, Debug)]
/// enum Role {
///   Admin,
///   Member,
/// }
///
/// impl Presence for Role {}
/// ```
pub trait Presence {
  /// Check whether the value is present.
  #[inline]
  fn is_present(&self) -> bool {
    true
  }
}

impl Presence for str {
  #[inline]
  fn is_present(&self) -> bool {
    !self.is_empty()
  }
}

impl Presence for String {
  #[inline]
  fn is_present(&self) -> bool {
    !self.is_empty()
  }
}

impl Presence for Cow<'_, str> {
  #[inline]
  fn is_present(&self) -> bool {
    !self.is_empty()
  }
}

impl Presence for OsStr {
  #[inline]
  fn is_present(&self) -> bool {
    !self.is_empty()
  }
}

impl Presence for OsString {
  #[inline]
  fn is_present(&self) -> bool {
    !self.is_empty()
  }
}

impl<T> Presence for Option<T>
where
  T: Presence,
{
  #[inline]
  fn is_present(&self) -> bool {
    match self {
      Some(value) => value.is_present(),
      None => false,
    }
  }
}

impl<T> Presence for &T
where
  T: Presence + ?Sized,
{
  #[inline]
  fn is_present(&self) -> bool {
    T::is_present(self)
  }
}

impl<T> Presence for Box<T>
where
  T: Presence + ?Sized,
{
  #[inline]
  fn is_present(&self) -> bool {
    T::is_present(self)
  }
}

impl<T> Presence for Rc<T>
where
  T: Presence + ?Sized,
{
  #[inline]
  fn is_present(&self) -> bool {
    T::is_present(self)
  }
}

impl<T> Presence for Arc<T>
where
  T: Presence + ?Sized,
{
  #[inline]
  fn is_present(&self) -> bool {
    T::is_present(self)
  }
}


macro_rules! always_present {
  ($($ty:ty),* $(,)?) => {
    $(
      impl Presence for $ty {}
    )*
  };
}

always_present!(
  (), bool, char,
  i8, i16, i32, i64, i128, isize,
  u8, u16, u32, u64, u128, usize,
  f32, f64,
  NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize,
  NonZeroU8, NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize,
  Duration, Instant, SystemTime,
  IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6,
  Path, PathBuf,
);

// A tuple is a value of its own, no matter its elements.
macro_rules! tuple_present {
  ($($name:ident)+) => {
    impl<$($name),+> Presence for ($($name,)+) {}
  };
}

tuple_present!(A);
tuple_present!(A B);
tuple_present!(A B C);
tuple_present!(A B C D);
tuple_present!(A B C D E);
tuple_present!(A B C D E F);
tuple_present!(A B C D E F G);
tuple_present!(A B C D E F G H);
tuple_present!(A B C D E F G H I);
tuple_present!(A B C D E F G H I J);
tuple_present!(A B C D E F G H I J K);
tuple_present!(A B C D E F G H I J K L);

// Containers are present even when empty.
impl<T> Presence for [T] {}
impl<T, const N: usize> Presence for [T; N] {}
impl<T> Presence for Vec<T> {}
impl<T> Presence for VecDeque<T> {}
impl<T> Presence for LinkedList<T> {}
impl<T> Presence for BinaryHeap<T> {}
impl<T, S> Presence for HashSet<T, S> {}
impl<K, V, S> Presence for HashMap<K, V, S> {}
impl<T> Presence for BTreeSet<T> {}
impl<K, V> Presence for BTreeMap<K, V> {}
