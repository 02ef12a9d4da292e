pub mod config;
mod analyze_routes;
mod http_layers;
mod responses;
pub mod server;
pub mod state;
mod suggest_routes;
mod upload;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
