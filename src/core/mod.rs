pub mod engine;
pub mod extract;
pub mod gaps;
pub mod normalize;
pub mod pattern;
pub mod resolver;

pub use crate::domain::model::{LoadedDocument, OccupiedPortSet, PortReport, RawPortEntry};
pub use crate::domain::ports::{ConfigProvider, DocumentLoader, DocumentLocator};
pub use crate::utils::error::Result;
