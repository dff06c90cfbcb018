use crate::core::pattern::PortPattern;
use crate::core::resolver::resolve_occupancy;
use crate::domain::model::{LoadedDocument, PortReport};
use crate::domain::ports::{ConfigProvider, DocumentLocator, DocumentLoader};
use crate::utils::error::Result;
use std::path::Path;
use tracing::{Instrument, Span};

/// Span carrying the fields of one run. Handed to the engine so its logs are
/// attributed without relying on ambient state.
pub fn run_span(directory: &Path, pattern: &str) -> Span {
    tracing::info_span!(
        "ports",
        directory = %directory.display(),
        port_requested = !pattern.is_empty(),
        port = pattern,
    )
}

pub struct GrabEngine<L: DocumentLocator, D: DocumentLoader> {
    locator: L,
    loader: D,
    span: Span,
}

impl<L: DocumentLocator, D: DocumentLoader> GrabEngine<L, D> {
    pub fn new(locator: L, loader: D, span: Span) -> Self {
        Self {
            locator,
            loader,
            span,
        }
    }

    pub async fn run(&self, directory: &Path, pattern: &str) -> Result<PortReport> {
        self.run_inner(directory, pattern)
            .instrument(self.span.clone())
            .await
    }

    /// Runs over the directory and pattern a configuration names.
    pub async fn run_configured<C: ConfigProvider>(&self, config: &C) -> Result<PortReport> {
        self.run(Path::new(config.directory()), config.pattern()).await
    }

    async fn run_inner(&self, directory: &Path, pattern: &str) -> Result<PortReport> {
        tracing::debug!("Locating compose files");
        let paths = self.locator.locate(directory)?;
        tracing::info!("Found {} compose files: {:?}", paths.len(), paths);

        let mut documents = Vec::with_capacity(paths.len());
        for path in &paths {
            let compose = self.loader.load(path).await?;
            tracing::debug!(
                "Loaded {} ({} services)",
                path.display(),
                compose.services().count()
            );
            documents.push(LoadedDocument {
                path: path.clone(),
                compose,
            });
        }

        for document in &documents {
            for (service, settings) in document.compose.services() {
                if settings.0.contains_key("ports") {
                    tracing::debug!("Service '{}' declares ports", service);
                }
            }
        }

        let resolution = resolve_occupancy(&documents)?;
        tracing::info!(
            "{} port entries occupy {} host ports",
            resolution.entries,
            resolution.occupied.len()
        );
        tracing::info!("Next available ports: {:?}", resolution.available);

        let requested = if pattern.is_empty() {
            None
        } else {
            let requested = match PortPattern::compile(pattern) {
                Ok(compiled) => compiled.filter(&resolution.available),
                Err(e) => {
                    tracing::warn!("Port pattern did not compile, nothing matches: {}", e);
                    Vec::new()
                }
            };
            tracing::info!("Ports matching '{}': {:?}", pattern, requested);
            Some(requested)
        };

        Ok(PortReport {
            directory: directory.to_path_buf(),
            documents: paths,
            occupied_ports: resolution.occupied.len(),
            available: resolution.available,
            pattern: (!pattern.is_empty()).then(|| pattern.to_string()),
            requested,
            generated_at: chrono::Utc::now(),
        })
    }
}
