pub mod args;
pub mod calc;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod storage;
pub mod store;
mod utils;


pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use storage::Mode;
pub use store::Store;
