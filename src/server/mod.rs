pub mod config;
mod cors;
mod http_layers;
mod search;
pub mod server;
pub mod state;
mod stream;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
