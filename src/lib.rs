//! # graphrest - REST routes synthesized from a GraphQL schema
//!
//! graphrest walks the root query fields of a GraphQL schema and derives a
//! REST route for each field and for every nested field that takes
//! arguments. A request to a route is turned into the GraphQL operation that
//! would answer it, ready to forward to a GraphQL server.
//!
//! ## Quick Start
//!
//! ```bash
//! # List the routes a local schema produces
//! graphrest --schema schema.graphql routes
//!
//! # Render the operation behind one request
//! graphrest --schema schema.graphql render /product/42/reviews --var limit=3
//!
//! # Serve the routes, schema fetched from Apollo Studio
//! APOLLO_KEY=... APOLLO_GRAPH_REF=my-graph@current graphrest serve
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`query`]: GraphQL operation rendering
//! - [`routes`]: Route synthesis from the schema
//! - [`schema`]: Schema model, SDL loading and Apollo Studio fetch
//! - [`server`]: HTTP dispatch with axum

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `graphrest.toml` configuration files and discovery.
pub mod config;

/// Error types and result aliases.
///
/// Defines `GatewayError` and the per-layer error enums.
pub mod error;

pub mod logging;

/// Rendering a route plus bound variables into a GraphQL operation.
pub mod query;

/// Route synthesis.
///
/// Turns root query fields into `RouteDescriptor`s collected in a `RouteMap`.
pub mod routes;

pub mod schema;

/// HTTP server exposing the route map.
pub mod server;
