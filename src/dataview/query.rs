//! Query parameters and result shapes for dataview data calls

use serde_json::Value;

pub const DEFAULT_SKIP: u32 = 0;
pub const DEFAULT_COUNT: u32 = 100;

fn push<T: ToString>(params: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<T>) {
    if let Some(v) = value {
        params.push((key, v.to_string()));
    }
}

/// Paging for list calls (`skip`, `count`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub skip: u32,
    pub count: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            count: DEFAULT_COUNT,
        }
    }
}

impl Paging {
    pub fn new(skip: u32, count: u32) -> Self {
        Self { skip, count }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        vec![("skip", self.skip.to_string()), ("count", self.count.to_string())]
    }
}

/// Parameters for `GET .../preview/interpolated`
///
/// Unset parameters are left off the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewQuery {
    pub start_index: Option<String>,
    pub end_index: Option<String>,
    pub interval: Option<String>,
    /// Alternate output form such as `csvh`; the response is returned as text
    pub form: Option<String>,
    pub count: Option<u32>,
}

impl PreviewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_index(mut self, index: impl Into<String>) -> Self {
        self.start_index = Some(index.into());
        self
    }

    pub fn with_end_index(mut self, index: impl Into<String>) -> Self {
        self.end_index = Some(index.into());
        self
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push(&mut params, "startIndex", &self.start_index);
        push(&mut params, "endIndex", &self.end_index);
        push(&mut params, "interval", &self.interval);
        push(&mut params, "form", &self.form);
        push(&mut params, "count", &self.count);
        params
    }
}

/// Parameters for `GET .../data/interpolated`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpolatedQuery {
    pub count: Option<u32>,
    pub skip: Option<u32>,
    pub form: Option<String>,
    /// Server-side paging session from a previous call; passed through as is
    pub session_id: Option<String>,
}

impl InterpolatedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push(&mut params, "count", &self.count);
        push(&mut params, "skip", &self.skip);
        push(&mut params, "form", &self.form);
        push(&mut params, "sessionId", &self.session_id);
        params
    }
}

/// How a JSON data response is handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Return the decoded JSON as is
    #[default]
    Structured,
    /// Run the JSON through [`Decodable::decode`](super::Decodable::decode)
    Typed,
}

/// Result of a preview or interpolated-data call
#[derive(Debug, Clone, PartialEq)]
pub enum DataviewData<T> {
    /// Unparsed body, returned whenever a `form` was requested
    Text(String),
    Structured(Value),
    Typed(T),
}

impl<T> DataviewData<T> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_typed(self) -> Option<T> {
        match self {
            Self::Typed(value) => Some(value),
            _ => None,
        }
    }
}
