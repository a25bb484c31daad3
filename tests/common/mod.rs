// Copyright (C) 2018-2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(unused)]

use entity_merge::derive::Record;
use entity_merge::Mergeable;
use entity_merge::Presence;


/// A plain record with a string, a numeric, and a boolean property.
#[derive(Clone, Debug, PartialEq, Record)]
pub struct User {
  pub name: String,
  pub age: u32,
  pub active: bool,
}

impl User {
  pub fn new(name: &str, age: u32, active: bool) -> Self {
    Self {
      name: name.to_string(),
      age,
      active,
    }
  }
}


/// A record acting as the "base" of others.
#[derive(Clone, Debug, PartialEq, Record)]
pub struct Person {
  pub name: String,
  pub email: Option<String>,
}

impl Person {
  pub fn new(name: &str, email: Option<&str>) -> Self {
    Self {
      name: name.to_string(),
      email: email.map(str::to_string),
    }
  }
}


/// A record embedding a `Person` as its base.
#[derive(Clone, Debug, PartialEq, Record)]
pub struct Employee {
  #[merge(base)]
  pub person: Person,
  pub department: String,
  pub salary: u64,
}


/// A record embedding a `Person` as its base, but re-declaring one of
/// its properties.
#[derive(Clone, Debug, PartialEq, Record)]
#[merge(property(get = "get_email"))]
pub struct Contractor {
  #[merge(base)]
  pub person: Person,
  pub agency: String,
}

impl Contractor {
  pub fn get_email(&self) -> Option<String> {
    self.person.email.clone()
  }

  pub fn set_email(&mut self, email: Option<String>) {
    self.person.email = email
  }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Role {
  Admin,
  Member,
}

impl Presence for Role {}


/// A record exercising the various kinds of properties.
#[derive(Clone, Debug, PartialEq, Record)]
#[merge(property(get = "is_locked"))]
#[merge(property(get = "display_name", read_only))]
pub struct Account {
  #[merge(read_only)]
  pub id: u64,
  pub owner: String,
  #[merge(set = "set_balance")]
  pub balance: i64,
  pub role: Role,
  pub tags: Vec<String>,
  pub note: Option<String>,
  #[merge(skip)]
  pub revision: u32,
  #[merge(skip)]
  pub(crate) locked: bool,
}

impl Account {
  pub fn new(id: u64, owner: &str) -> Self {
    Self {
      id,
      owner: owner.to_string(),
      balance: 100,
      role: Role::Member,
      tags: vec!["new".to_string()],
      note: Some("vip".to_string()),
      revision: 1,
      locked: false,
    }
  }

  pub fn set_balance(&mut self, balance: i64) -> Result<(), String> {
    if balance < 0 {
      return Err(format!("balance {balance} is negative"))
    }
    self.balance = balance;
    Ok(())
  }

  pub fn is_locked(&self) -> bool {
    self.locked
  }

  pub fn set_locked(&mut self, locked: bool) {
    self.locked = locked
  }

  pub fn display_name(&self) -> String {
    format!("{} ({})", self.owner, self.id)
  }
}


/// A record owning its merge.
///
/// The property based merge would take over the updated title and
/// version. The record's own merge keeps the original title instead and
/// bumps the original version.
#[derive(Clone, Debug, PartialEq, Record)]
#[merge(mergeable)]
pub struct Document {
  pub title: String,
  pub version: u32,
}

impl Mergeable for Document {
  fn merge_with(self, updated: Self) -> Self {
    Self {
      title: self.title,
      version: self.version.max(updated.version) + 1,
    }
  }
}
