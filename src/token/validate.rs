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

use tf_provider::{AttributePath, Diagnostics};

use crate::utils::{validate_no_separator, validate_uuid, WithValidate};

use super::state::TokenState;

const DURATION_UNITS: [&str; 6] = ["ns", "us", "ms", "s", "m", "h"];

/// Accepts durations such as `5h30m40s` or `1.5h`
fn is_duration(value: &str) -> bool {
    let mut rest = value;
    if rest.is_empty() {
        return false;
    }
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        let number = &rest[..digits];
        if number.is_empty() || number.parse::<f64>().is_err() {
            return false;
        }
        rest = &rest[digits..];

        let unit = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        if !DURATION_UNITS.contains(&&rest[..unit]) {
            return false;
        }
        rest = &rest[unit..];
    }
    true
}

impl<'a> WithValidate for TokenState<'a> {
    fn validate(&self, diags: &mut Diagnostics) {
        validate_uuid(diags, &self.project_id, "project_id");
        validate_no_separator(diags, &self.region, "region");

        if self.name.as_deref_option() == Some("") {
            diags.error(
                "Invalid `name`",
                "`name` must not be empty",
                AttributePath::new("name"),
            );
        }
        if let Some(ttl) = self.ttl_duration.as_deref_option() {
            if !is_duration(ttl) {
                diags.error(
                    "Invalid `ttl_duration`",
                    format!("{ttl:?} is not a duration, expected something like `5h30m40s`"),
                    AttributePath::new("ttl_duration"),
                );
            }
        }
    }
}
