pub mod file;
pub mod inmemory;
pub mod pool;
pub mod sqlite;
