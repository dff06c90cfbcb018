use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Top level of a compose file. Only `services` is read; every other key is
/// ignored by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposeFile {
    #[serde(default)]
    pub services: Option<BTreeMap<String, Option<ServiceSettings>>>,
}

impl ComposeFile {
    /// Services with a settings body. `web:` with nothing under it is skipped.
    pub fn services(&self) -> impl Iterator<Item = (&str, &ServiceSettings)> {
        self.services
            .iter()
            .flatten()
            .filter_map(|(name, settings)| settings.as_ref().map(|s| (name.as_str(), s)))
    }
}

/// Untyped settings of one service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ServiceSettings(pub Mapping);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortsFieldError {
    NotASequence(&'static str),
    NotAScalar { index: usize, kind: &'static str },
}

impl fmt::Display for PortsFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortsFieldError::NotASequence(kind) => write!(f, "expected a sequence, found {}", kind),
            PortsFieldError::NotAScalar { index, kind } => {
                write!(f, "entry #{} is a {}, expected a scalar", index, kind)
            }
        }
    }
}

impl ServiceSettings {
    /// The `ports` field as text. `Ok(None)` when the service declares none.
    pub fn ports(&self) -> std::result::Result<Option<Vec<String>>, PortsFieldError> {
        let Some(value) = self.0.get("ports") else {
            return Ok(None);
        };

        let Value::Sequence(items) = value else {
            return Err(PortsFieldError::NotASequence(kind_of(value)));
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                scalar_text(item).ok_or(PortsFieldError::NotAScalar {
                    index,
                    kind: kind_of(item),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// A compose file together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub compose: ComposeFile,
}

/// One port declaration as written in a compose file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPortEntry {
    pub value: String,
    pub path: PathBuf,
    pub service: String,
}

impl RawPortEntry {
    pub fn origin(&self) -> String {
        format!("service '{}' in {}", self.service, self.path.display())
    }
}

/// Host ports declared as in use, stored as maximal runs: start -> inclusive
/// end. Runs never overlap or touch, so each entry is one block of consecutive
/// occupied ports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupiedPortSet {
    runs: BTreeMap<i64, i64>,
}

impl OccupiedPortSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, port: i64) {
        self.insert_range(port, port);
    }

    /// Marks `start..=end` as occupied. Cost depends on the number of runs
    /// touched, not on the width of the range. Empty when `start > end`.
    pub fn insert_range(&mut self, start: i64, end: i64) {
        if start > end {
            return;
        }
        let (mut start, mut end) = (start, end);

        if let Some((&run_start, &run_end)) = self.runs.range(..=start).next_back() {
            if run_end.checked_add(1).map_or(true, |next| next >= start) {
                start = run_start;
                end = end.max(run_end);
            }
        }

        let upper = end.saturating_add(1);
        let absorbed: Vec<(i64, i64)> = self
            .runs
            .range(start..=upper)
            .map(|(&s, &e)| (s, e))
            .collect();
        for (run_start, run_end) in absorbed {
            self.runs.remove(&run_start);
            end = end.max(run_end);
        }

        self.runs.insert(start, end);
    }

    pub fn extend(&mut self, ports: impl IntoIterator<Item = i64>) {
        for port in ports {
            self.insert(port);
        }
    }

    pub fn contains(&self, port: i64) -> bool {
        self.runs
            .range(..=port)
            .next_back()
            .is_some_and(|(_, &end)| end >= port)
    }

    /// Number of occupied ports, saturating at `u64::MAX`.
    pub fn len(&self) -> u64 {
        let total: i128 = self
            .runs
            .iter()
            .map(|(&start, &end)| i128::from(end) - i128::from(start) + 1)
            .sum();
        u64::try_from(total).unwrap_or(u64::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Maximal runs as `(start, end)`, ascending.
    pub fn runs(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.runs.iter().map(|(&start, &end)| (start, end))
    }

    /// Every occupied port, ascending.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.runs().flat_map(|(start, end)| start..=end)
    }
}

impl FromIterator<i64> for OccupiedPortSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortReport {
    pub directory: PathBuf,
    pub documents: Vec<PathBuf>,
    pub occupied_ports: u64,
    pub available: Vec<i64>,
    pub pattern: Option<String>,
    pub requested: Option<Vec<i64>>,
    pub generated_at: DateTime<Utc>,
}

impl PortReport {
    /// The answer the user asked for: filtered candidates when a pattern was
    /// given, every candidate otherwise.
    pub fn ports(&self) -> &[i64] {
        self.requested.as_deref().unwrap_or(&self.available)
    }

    pub fn render_text(&self) -> String {
        let joined = self
            .ports()
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        match self.requested {
            Some(_) => format!("requested ports: [{}]", joined),
            None => format!("next available ports [{}]", joined),
        }
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
