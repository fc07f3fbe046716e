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

//! Composite resource identifiers
//!
//! Terraform only knows a single opaque `id` per resource. Resources addressed
//! by several keys store them joined with [`SEPARATOR`], always in the same
//! order, and the import string uses the exact same layout.

use std::fmt::Display;

use thiserror::Error;

use crate::utils::DisplayJoinable;

pub const SEPARATOR: &str = ",";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Expected import identifier with format: {expected}, got: {got:?}")]
    Format { expected: String, got: String },
}

/// Join the key parts of a resource into its Terraform identifier
pub fn build_id<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    parts.into_iter().join_with(SEPARATOR).to_string()
}

/// Human readable layout of an identifier, eg: `[project_id],[token_id]`
pub fn expected_format(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| format!("[{field}]"))
        .join_with(SEPARATOR)
        .to_string()
}

/// Split an identifier into exactly `N` non-empty parts
pub fn parse_id<'a, const N: usize>(
    id: &'a str,
    fields: [&str; N],
) -> Result<[&'a str; N], IdError> {
    let error = || IdError::Format {
        expected: expected_format(&fields),
        got: id.to_owned(),
    };

    let mut parts = [""; N];
    let mut split = id.split(SEPARATOR);
    for part in parts.iter_mut() {
        match split.next() {
            Some(value) if !value.is_empty() => *part = value,
            _ => return Err(error()),
        }
    }
    if split.next().is_some() {
        return Err(error());
    }

    Ok(parts)
}

/// Check that a key part can be embedded in an identifier
pub fn no_separator(value: &str) -> bool {
    !value.contains(SEPARATOR)
}
