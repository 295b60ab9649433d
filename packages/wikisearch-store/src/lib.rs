pub mod db;
pub mod models;
pub mod pages;
pub mod schema;

mod error;

pub use error::{Error, Result};
