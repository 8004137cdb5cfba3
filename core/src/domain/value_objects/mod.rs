//! Value objects representing immutable domain concepts.

pub mod route;

// Re-export commonly used types
pub use route::RouteDestination;
