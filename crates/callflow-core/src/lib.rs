pub mod config;
pub mod error;
pub mod model;
mod reachability;
mod resolver;
pub mod schedule;
pub mod source;

pub use config::Config;
pub use error::GraphError;
pub use model::{Edge, Element, Node, RouteGraph, INGRESS_KIND};
pub use reachability::VisibleSet;
pub use schedule::TimeRule;
pub use source::{GraphSource, JsonFileSource};
