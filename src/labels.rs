// This file is part of the terraform-provider-stackit project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;
use std::collections::BTreeMap;

use tf_provider::value::{Value, ValueMap, ValueString};

pub type Labels<'a> = ValueMap<'a, ValueString<'a>>;

/// Partial label update: `None` deletes the key on the API side
pub type LabelsPatch = BTreeMap<String, Option<String>>;

fn known_entries<'a>(labels: &'a Labels<'a>) -> impl Iterator<Item = (&'a str, &'a str)> {
    labels
        .iter()
        .flatten()
        .filter_map(|(k, v)| Some((&**k, v.as_deref_option()?)))
}

/// Compute the minimal patch turning `current` into `desired`
///
/// Null or unknown maps count as empty.
pub fn diff_labels(desired: &Labels<'_>, current: &Labels<'_>) -> LabelsPatch {
    let current_entries: BTreeMap<&str, &str> = known_entries(current).collect();
    let desired_entries: BTreeMap<&str, &str> = known_entries(desired).collect();

    let mut patch = LabelsPatch::new();
    for (key, value) in &desired_entries {
        if current_entries.get(key) != Some(value) {
            patch.insert((*key).to_owned(), Some((*value).to_owned()));
        }
    }
    for key in current_entries.keys() {
        if !desired_entries.contains_key(key) {
            patch.insert((*key).to_owned(), None);
        }
    }
    patch
}

/// Labels as sent on creation, omitted when not known
pub fn labels_payload(labels: &Labels<'_>) -> Option<BTreeMap<String, String>> {
    labels.as_ref_option()?;
    Some(
        known_entries(labels)
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect(),
    )
}

/// Labels as stored in the state after a read
///
/// An empty API map keeps an unset attribute null.
pub fn labels_value<'a>(
    labels: Option<&BTreeMap<String, String>>,
    previous: &Labels<'_>,
) -> Labels<'a> {
    match labels {
        None => Value::Null,
        Some(labels) if labels.is_empty() && previous.is_null() => Value::Null,
        Some(labels) => Value::Value(
            labels
                .iter()
                .map(|(k, v)| (Cow::Owned(k.clone()), Value::Value(Cow::Owned(v.clone()))))
                .collect(),
        ),
    }
}

#[cfg(test)]
pub(crate) fn labels_from<'a>(entries: &[(&'a str, &'a str)]) -> Labels<'a> {
    Value::Value(
        entries
            .iter()
            .map(|(k, v)| (Cow::Borrowed(*k), Value::Value(Cow::Borrowed(*v))))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn diff_adds_changes_and_deletes() {
        let desired = labels_from(&[("foo1", "bar1"), ("foo2", "bar2")]);
        let current = labels_from(&[("foo1", "foobar"), ("foo3", "bar3")]);

        let patch = diff_labels(&desired, &current);

        assert_eq!(
            patch,
            LabelsPatch::from([
                ("foo1".to_owned(), Some("bar1".to_owned())),
                ("foo2".to_owned(), Some("bar2".to_owned())),
                ("foo3".to_owned(), None),
            ])
        );
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"foo1": "bar1", "foo2": "bar2", "foo3": null})
        );
    }

    #[test]
    fn diff_skips_unchanged_keys() {
        let desired = labels_from(&[("keep", "same"), ("new", "")]);
        let current = labels_from(&[("keep", "same")]);

        let patch = diff_labels(&desired, &current);

        assert_eq!(
            patch,
            LabelsPatch::from([("new".to_owned(), Some(String::new()))])
        );
    }

    #[test]
    fn null_desired_removes_everything() {
        let current = labels_from(&[("a", "1"), ("b", "2")]);

        let patch = diff_labels(&Value::Null, &current);

        assert_eq!(
            patch,
            LabelsPatch::from([("a".to_owned(), None), ("b".to_owned(), None)])
        );
        assert!(diff_labels(&Value::Null, &Value::Unknown).is_empty());
    }

    #[test]
    fn payload_and_value_conversions() {
        assert_eq!(labels_payload(&Value::Null), None);
        assert_eq!(labels_payload(&Value::Unknown), None);
        assert_eq!(
            labels_payload(&labels_from(&[("a", "1")])),
            Some(BTreeMap::from([("a".to_owned(), "1".to_owned())]))
        );

        let empty = BTreeMap::new();
        assert!(labels_value(Some(&empty), &Value::Null).is_null());
        assert_eq!(
            labels_value(Some(&empty), &labels_from(&[("a", "1")])),
            Value::Value(Default::default())
        );
        assert!(labels_value(None, &labels_from(&[("a", "1")])).is_null());
    }

    proptest! {
        #[test]
        fn diff_with_itself_is_empty(entries in prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{0,8}", 0..16)) {
            let pairs: Vec<(&str, &str)> = entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let labels = labels_from(&pairs);
            prop_assert!(diff_labels(&labels, &labels).is_empty());
        }

        #[test]
        fn diff_touches_exactly_the_changed_keys(
            desired in prop::collection::btree_map("[a-d]", "[xy]", 0..4),
            current in prop::collection::btree_map("[a-d]", "[xy]", 0..4),
        ) {
            let desired_pairs: Vec<(&str, &str)> = desired.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let current_pairs: Vec<(&str, &str)> = current.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

            let patch = diff_labels(&labels_from(&desired_pairs), &labels_from(&current_pairs));

            for (key, value) in &patch {
                match value {
                    Some(value) => prop_assert_eq!(desired.get(key), Some(value)),
                    None => prop_assert!(!desired.contains_key(key) && current.contains_key(key)),
                }
            }
            for (key, value) in &desired {
                if current.get(key) != Some(value) {
                    prop_assert!(patch.contains_key(key));
                }
            }
        }
    }
}
