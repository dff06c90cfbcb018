//! Host port extraction from short-syntax port declarations.
//!
//! Only the host side matters here. `HOST:CONTAINER` and
//! `IP:HOST:CONTAINER` are recognised; a bare `CONTAINER` publishes on a
//! random host port and so occupies nothing.

use crate::domain::model::{OccupiedPortSet, RawPortEntry};
use crate::utils::error::{GrabError, Result};
use std::num::ParseIntError;
use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostPortError {
    #[error("'{token}' is not a port number: {source}")]
    NotANumber {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("range start {start} is greater than end {end}")]
    ReversedRange { start: i64, end: i64 },
}

/// Host ports occupied by a single declaration, as an inclusive range.
/// `None` when the declaration publishes no fixed host port.
pub fn host_ports(entry: &str) -> std::result::Result<Option<RangeInclusive<i64>>, HostPortError> {
    let entry = entry.split('/').next().unwrap_or_default();
    if !entry.contains(':') {
        return Ok(None);
    }

    let fields: Vec<&str> = entry.split(':').collect();
    let host = match fields.as_slice() {
        [host, _] => host,
        [_, host, _] => host,
        _ => return Ok(None),
    };

    parse_host_spec(host.trim())
}

/// A second `-` is not a range bound, so `1-2-3` fails on `2-3`.
fn parse_host_spec(host: &str) -> std::result::Result<Option<RangeInclusive<i64>>, HostPortError> {
    if host.is_empty() {
        return Ok(None);
    }

    match host.split_once('-') {
        Some((start, end)) => {
            let start = parse_port(start)?;
            let end = parse_port(end)?;
            if start > end {
                return Err(HostPortError::ReversedRange { start, end });
            }
            Ok(Some(start..=end))
        }
        None => {
            let port = parse_port(host)?;
            Ok(Some(port..=port))
        }
    }
}

fn parse_port(token: &str) -> std::result::Result<i64, HostPortError> {
    token
        .trim()
        .parse::<i64>()
        .map_err(|source| HostPortError::NotANumber {
            token: token.to_string(),
            source,
        })
}

/// Builds the occupied set from every extracted entry. Stops at the first
/// entry whose host side does not parse.
pub fn occupied_ports(entries: &[RawPortEntry]) -> Result<OccupiedPortSet> {
    let mut occupied = OccupiedPortSet::new();

    for entry in entries {
        let ports = host_ports(&entry.value).map_err(|source| GrabError::InvalidPortNumber {
            entry: entry.value.clone(),
            origin: entry.origin(),
            source,
        })?;
        if let Some(range) = ports {
            occupied.insert_range(*range.start(), *range.end());
        }
    }

    Ok(occupied)
}
