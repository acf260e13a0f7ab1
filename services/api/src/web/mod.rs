pub mod certificates;
pub mod chat;
pub mod courses;
pub mod import;
pub mod protocol;
pub mod rest;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the router and OpenAPI document to make them easily accessible
// to the binaries that build the web server.
pub use rest::{router, ApiDoc};
