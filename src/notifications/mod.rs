pub mod entities;
pub mod error;
pub mod gateway;
mod router;
pub mod service;

pub use router::router;
