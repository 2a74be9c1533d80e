pub mod db;
pub mod error;
pub mod explore;
pub mod filter;
pub mod logging;
pub mod models;
pub mod options;
pub mod report;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;
