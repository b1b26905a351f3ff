pub mod aggregate;
pub mod clients;
pub mod diagrams;
pub mod materialize;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::*;
pub use clients::*;
pub use diagrams::*;
pub use materialize::{HierarchyMaterializer, HierarchyRows};
pub use service::*;
