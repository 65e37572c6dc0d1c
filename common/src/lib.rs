pub mod config;
pub mod db;
pub mod errors;
pub mod repository;

pub use repository::*;

