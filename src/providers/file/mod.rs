mod provider;
mod types;

pub use provider::FileBuildGraph;
#[cfg(test)]
pub use types::{BuildDefinition, GraphSnapshot};
