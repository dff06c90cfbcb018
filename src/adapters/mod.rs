// Adapters layer: filesystem and YAML implementations of the domain traits.

pub mod loader;
pub mod locator;

pub use loader::YamlLoader;
pub use locator::FsLocator;
