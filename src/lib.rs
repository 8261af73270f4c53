pub mod binder;
pub mod config;
pub mod controller;
pub mod fetch;
pub mod filter;
pub mod loader;
pub mod model;
pub mod output;
pub mod projection;
pub mod routes;
pub mod script;
pub mod svg;
pub mod time_format;
pub mod traffic;
