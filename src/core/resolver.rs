use crate::core::extract::extract_port_entries;
use crate::core::gaps::next_available_ports;
use crate::core::normalize::occupied_ports;
use crate::core::pattern::filter_ports;
use crate::domain::model::{LoadedDocument, OccupiedPortSet};
use crate::utils::error::Result;

/// Intermediate results of one resolution, kept for reporting.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub entries: usize,
    pub occupied: OccupiedPortSet,
    pub available: Vec<i64>,
}

pub fn resolve_occupancy(documents: &[LoadedDocument]) -> Result<Resolution> {
    let entries = extract_port_entries(documents)?;
    let occupied = occupied_ports(&entries)?;
    let available = next_available_ports(&occupied);

    Ok(Resolution {
        entries: entries.len(),
        occupied,
        available,
    })
}

/// Next free port after every occupied run, narrowed to `pattern` when it is
/// not empty.
pub fn resolve(documents: &[LoadedDocument], pattern: &str) -> Result<Vec<i64>> {
    let resolution = resolve_occupancy(documents)?;
    Ok(filter_ports(&resolution.available, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::GrabError;
    use std::path::PathBuf;

    fn document(path: &str, yaml: &str) -> LoadedDocument {
        LoadedDocument {
            path: PathBuf::from(path),
            compose: serde_yaml::from_str(yaml).unwrap(),
        }
    }

    #[test]
    fn test_resolve_across_documents() {
        let docs = vec![
            document(
                "one/docker-compose.yml",
                r#"
services:
  web:
    ports:
      - "8080:80"
      - "8081-8082:81-82"
  cache:
    ports:
      - "6379"
"#,
            ),
            document(
                "two/docker-compose.yml",
                r#"
services:
  metrics:
    ports:
      - "127.0.0.1:9090:9090"
      - "8080:8080"
"#,
            ),
        ];

        assert_eq!(resolve(&docs, "").unwrap(), vec![8083, 9091]);
        assert_eq!(resolve(&docs, "80xx").unwrap(), vec![8083]);

        let resolution = resolve_occupancy(&docs).unwrap();
        assert_eq!(resolution.entries, 5);
        assert_eq!(resolution.occupied.len(), 4);
    }

    #[test]
    fn test_resolve_without_documents() {
        assert!(resolve(&[], "").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_fails_on_bad_host_port() {
        let docs = vec![document(
            "docker-compose.yml",
            "services:\n  web:\n    ports:\n      - \"abc:80\"\n",
        )];
        assert!(matches!(
            resolve(&docs, ""),
            Err(GrabError::InvalidPortNumber { .. })
        ));
    }
}
