//! In-memory directory of loyalty-program customers and their point balances

pub mod adapters;
pub mod commands;
pub mod directory;
pub mod domain;
pub mod ports;

pub use commands::Error;
pub use directory::CustomerDirectory;
