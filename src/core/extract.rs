use crate::domain::model::{LoadedDocument, RawPortEntry};
use crate::utils::error::{GrabError, Result};

/// Flattens the `ports` of every service in every document.
///
/// A `ports` field that is not a list of scalars fails the whole extraction.
pub fn extract_port_entries(documents: &[LoadedDocument]) -> Result<Vec<RawPortEntry>> {
    let mut entries = Vec::new();

    for document in documents {
        for (service, settings) in document.compose.services() {
            let ports = settings
                .ports()
                .map_err(|e| GrabError::MalformedPortsField {
                    path: document.path.clone(),
                    service: service.to_string(),
                    reason: e.to_string(),
                })?;

            for value in ports.into_iter().flatten() {
                entries.push(RawPortEntry {
                    value,
                    path: document.path.clone(),
                    service: service.to_string(),
                });
            }
        }
    }

    Ok(entries)
}
