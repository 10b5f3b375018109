//! Several independent errors reported as one.

use crate::cause::Cause;
use crate::render::{Render, RenderConfig};
use serde::{Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt;

/// Separator between member renderings.
pub const SEPARATOR: &str = "\n";

/// An ordered group of errors exposed as a single error.
///
/// Members keep insertion order. Absent members (`None`) are kept in
/// [`errors`](BatchError::errors) but contribute nothing to any rendering.
///
/// Not synchronized: collect failures first, then build or push from one
/// thread.
#[derive(Debug, Default)]
pub struct BatchError {
    errors: Vec<Option<Cause>>,
}

impl BatchError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error.
    pub fn push(&mut self, err: impl Into<Cause>) {
        self.errors.push(Some(err.into()));
    }

    /// Append a possibly absent error.
    pub fn push_opt<E: Into<Cause>>(&mut self, err: Option<E>) {
        self.errors.push(err.map(Into::into));
    }

    /// Builder form of [`push`](BatchError::push).
    pub fn with(mut self, err: impl Into<Cause>) -> Self {
        self.push(err);
        self
    }

    /// All members in insertion order, absent ones included.
    pub fn errors(&self) -> &[Option<Cause>] {
        &self.errors
    }

    /// Present members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Cause> + '_ {
        self.errors.iter().flatten()
    }

    /// True when no member is present.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn into_errors(self) -> Vec<Option<Cause>> {
        self.errors
    }

    fn write_members(
        &self,
        f: &mut fmt::Formatter<'_>,
        mut write: impl FnMut(&Cause, &mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        for (i, member) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(SEPARATOR)?;
            }
            write(member, &mut *f)?;
        }
        Ok(())
    }
}

impl Render for BatchError {
    fn write_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_members(f, |member, f| member.write_plain(f))
    }

    fn write_verbose(&self, f: &mut fmt::Formatter<'_>, config: &RenderConfig) -> fmt::Result {
        self.write_members(f, |member, f| member.write_verbose(f, config))
    }

    fn to_json(&self, config: &RenderConfig) -> serde_json::Value {
        let errors: Vec<serde_json::Value> =
            self.iter().map(|member| member.to_json(config)).collect();
        serde_json::json!({
            "message": self.to_string(),
            "errors": errors,
        })
    }
}

/// `{}` joins the members' message chains with a newline. `{:+}` joins their
/// verbose forms.
impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.sign_plus() {
            self.write_verbose(f, &RenderConfig::verbose())
        } else {
            self.write_plain(f)
        }
    }
}

impl StdError for BatchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.iter().next().map(Cause::as_dyn)
    }
}

impl Serialize for BatchError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json(&RenderConfig::default()).serialize(serializer)
    }
}

impl<E: Into<Cause>> FromIterator<Option<E>> for BatchError {
    fn from_iter<I: IntoIterator<Item = Option<E>>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().map(|err| err.map(Into::into)).collect(),
        }
    }
}

impl<E: Into<Cause>> Extend<Option<E>> for BatchError {
    fn extend<I: IntoIterator<Item = Option<E>>>(&mut self, iter: I) {
        self.errors
            .extend(iter.into_iter().map(|err| err.map(Into::into)));
    }
}

impl<'a> IntoIterator for &'a BatchError {
    type Item = &'a Option<Cause>;
    type IntoIter = std::slice::Iter<'a, Option<Cause>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
