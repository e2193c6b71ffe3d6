//! Serve static files compiled into the binary under the `/performance`
//! prefix, handing every other request to the rest of the application.
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::{routing::get, Router};
//! use webembed::{app, AssetServer, AssetServerOptions};
//!
//! let server = AssetServer::new(AssetServerOptions::default());
//! let router = app(Arc::new(server), Router::new().route("/", get(|| async { "home" })));
//! # let _ = router;
//! ```

pub mod cache;
pub mod config;
pub mod constants;
pub mod embedded;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;

pub use embedded::{Asset, AssetTree, BundledAssets, EmbeddedTree, MemoryTree};
pub use error::AssetError;
pub use middleware::{app, serve_embedded};
pub use router::{route, strip_base, RouteDecision};
pub use server::{AssetServer, AssetServerOptions};
