pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod pages;
pub mod render;
pub mod session;
pub mod sync;

pub use error::{ClientError, Result};
