// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the merge report.

mod common;

use entity_merge::DataMerger;
use entity_merge::EntityMerger;
use entity_merge::MergePath;
use entity_merge::Outcome;
use entity_merge::Record;

use crate::common::Account;
use crate::common::Document;
use crate::common::User;


/// Check that the report lists all declared properties in order.
#[test]
fn report_order() {
  let (_, report) = EntityMerger::new().merge_reported(User::new("Alice", 1, true), User::new("", 2, true));

  assert_eq!(report.path(), MergePath::Properties);
  let names = report.iter().map(|property| property.name()).collect::<Vec<_>>();
  assert_eq!(names, vec!["name", "age", "active"]);
  assert_eq!(report.applied().collect::<Vec<_>>(), vec!["age", "active"]);
  assert!(matches!(report.outcome("name"), Some(Outcome::SkippedAbsentValue)));
}

/// Check the outcomes of the various kinds of properties.
#[test]
fn report_outcomes() {
  let original = Account::new(1, "Alice");
  let updated = Account {
    balance: -1,
    note: None,
    ..Account::new(2, "Bob")
  };

  let (merged, report) = EntityMerger::new().merge_reported(original, updated);
  assert_eq!(merged.id, 1);
  assert_eq!(merged.owner, "Bob");
  assert_eq!(merged.balance, 100);
  assert_eq!(merged.note.as_deref(), Some("vip"));

  let names = report.iter().map(|property| property.name()).collect::<Vec<_>>();
  assert_eq!(
    names,
    vec!["id", "owner", "balance", "role", "tags", "note", "locked", "display_name"]
  );

  assert!(matches!(report.outcome("id"), Some(Outcome::SkippedNoSetter)));
  assert!(matches!(report.outcome("owner"), Some(Outcome::Applied)));
  assert!(matches!(report.outcome("role"), Some(Outcome::Applied)));
  assert!(matches!(report.outcome("tags"), Some(Outcome::Applied)));
  assert!(matches!(report.outcome("note"), Some(Outcome::SkippedAbsentValue)));
  assert!(matches!(report.outcome("locked"), Some(Outcome::Applied)));
  assert!(matches!(report.outcome("display_name"), Some(Outcome::SkippedNoSetter)));
  assert!(report.outcome("revision").is_none());

  match report.outcome("balance") {
    Some(Outcome::SkippedInvocationError(err)) => {
      assert_eq!(err.inner().to_string(), "balance -1 is negative")
    },
    outcome => panic!("unexpected outcome: {outcome:?}"),
  }
  assert!(report.has_failures());
}

/// Check that the reported merge produces the same record as the plain
/// one.
#[test]
fn reported_and_plain_merge_agree() {
  let merger = EntityMerger::new();
  let original = Account::new(1, "Alice");
  let updated = Account::new(2, "Bob");

  let (reported, _) = merger.merge_reported(original.clone(), updated.clone());
  let plain = merger.merge(original, updated);
  assert_eq!(reported, plain);
}

/// Check that merges performed by the record itself report no
/// properties.
#[test]
fn capability_report() {
  let original = Document {
    title: "Draft".to_string(),
    version: 1,
  };
  let updated = Document {
    title: "Final".to_string(),
    version: 1,
  };

  let (merged, report) = EntityMerger::new().merge_reported(original, updated);
  assert_eq!(merged.title, "Draft");
  assert_eq!(merged.version, 2);
  assert_eq!(report.path(), MergePath::Capability);
  assert!(report.is_empty());
}

/// Check the generated descriptors.
#[test]
fn descriptors() {
  let properties = Account::PROPERTIES
    .iter()
    .map(|property| (property.name(), property.type_name()))
    .collect::<Vec<_>>();

  assert_eq!(
    properties,
    vec![
      ("id", Some("u64")),
      ("owner", Some("String")),
      ("balance", Some("i64")),
      ("role", Some("Role")),
      ("tags", Some("Vec<String>")),
      ("note", Some("Option<String>")),
      ("locked", None),
      ("display_name", None),
    ]
  );
  assert!(Account::merge_capability().is_none());
  assert!(Document::merge_capability().is_some());
}
