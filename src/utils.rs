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
use std::cell::RefCell;
use std::fmt::Display;

use anyhow::{Context, Result};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use tf_provider::value::{Value, ValueList, ValueString};
use tf_provider::schema::Schema;
use tf_provider::{AttributePath, Diagnostics};

use crate::id::no_separator;

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

pub(crate) trait WithValidate {
    fn validate(&self, diags: &mut Diagnostics);
}

/// Copy an API response into a state
///
/// Implementations must leave the state untouched when they fail.
pub(crate) trait WithResponse<R> {
    fn map_fields(&mut self, response: Option<&R>) -> Result<()>;
}

/// Record a failure both in the provider logs and in the diagnostics
pub(crate) fn report_error(
    diags: &mut Diagnostics,
    summary: impl Into<String>,
    detail: impl Display,
) {
    let summary = summary.into();
    let detail = format!("{detail:#}");
    tracing::error!("{summary}: {detail}");
    diags.root_error(summary, detail);
}

pub(crate) trait OrReport<T> {
    /// Turn a failure into an error diagnostic
    fn or_report(self, diags: &mut Diagnostics, summary: &str) -> Option<T>;
}

impl<T, E: Display> OrReport<T> for std::result::Result<T, E> {
    fn or_report(self, diags: &mut Diagnostics, summary: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                report_error(diags, summary, err);
                None
            }
        }
    }
}

pub(crate) fn string_value<'a>(value: Option<String>) -> ValueString<'a> {
    value.map_or(Value::Null, |s| Value::Value(Cow::Owned(s)))
}

pub(crate) fn known_string(value: &ValueString<'_>) -> Option<String> {
    value.as_deref_option().map(str::to_owned)
}

pub(crate) fn string_list<'a>(values: Option<Vec<String>>) -> ValueList<ValueString<'a>> {
    values.map_or(Value::Null, |values| {
        Value::Value(
            values
                .into_iter()
                .map(|s| Value::Value(Cow::Owned(s)))
                .collect(),
        )
    })
}

/// Payload form of a list: only sent when the list and all its items are known
pub(crate) fn known_string_list(values: &ValueList<ValueString<'_>>) -> Option<Vec<String>> {
    values
        .as_ref_option()?
        .iter()
        .map(known_string)
        .collect::<Option<Vec<_>>>()
}

/// Normalize an API timestamp to RFC 3339
pub(crate) fn timestamp_value<'a>(value: Option<&str>) -> Result<ValueString<'a>> {
    let Some(value) = value else {
        return Ok(Value::Null);
    };
    let parsed = OffsetDateTime::parse(value, &Rfc3339)
        .with_context(|| format!("invalid timestamp {value:?}"))?;
    let formatted = parsed
        .format(&Rfc3339)
        .with_context(|| format!("cannot format timestamp {value:?}"))?;
    Ok(Value::Value(Cow::Owned(formatted)))
}

pub(crate) fn validate_uuid(diags: &mut Diagnostics, value: &ValueString<'_>, attr: &'static str) {
    if let Some(value) = value.as_deref_option() {
        if uuid::Uuid::parse_str(value).is_err() {
            diags.error(
                "Invalid UUID",
                format!("`{attr}` must be a UUID, got {value:?}"),
                AttributePath::new(attr),
            );
        }
    }
}

pub(crate) fn validate_no_separator(
    diags: &mut Diagnostics,
    value: &ValueString<'_>,
    attr: &'static str,
) {
    if let Some(value) = value.as_deref_option() {
        if !no_separator(value) {
            diags.error(
                "Invalid value",
                format!(
                    "`{attr}` must not contain the identifier separator `{}`",
                    crate::id::SEPARATOR
                ),
                AttributePath::new(attr),
            );
        }
    }
}

pub struct DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    iter: RefCell<T>,
    sep: &'a str,
}

pub trait DisplayJoinable {
    type Joiner<'a>;
    fn join_with(self, sep: &str) -> Self::Joiner<'_>;
}

impl<T, I> DisplayJoinable for T
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    type Joiner<'a> = DisplayJoiner<'a, T, I>;

    fn join_with(self, sep: &str) -> Self::Joiner<'_> {
        DisplayJoiner {
            iter: RefCell::new(self),
            sep,
        }
    }
}

impl<'a, T, I> std::fmt::Display for DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        let mut iter = self.iter.try_borrow_mut().or(Err(std::fmt::Error))?;
        for elt in iter.by_ref() {
            f.write_str(sep)?;
            f.write_fmt(format_args!("{elt}"))?;
            sep = self.sep;
        }
        Ok(())
    }
}
