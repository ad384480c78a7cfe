//! HTTP API handlers for miniconf-portal

pub mod buildinfo;
pub mod health;
pub mod pages;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use pages::{index_redirect, serve_favicon, serve_page};
