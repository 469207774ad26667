pub mod annotate;
pub mod cli;
pub mod error;
pub mod model;
pub mod parsers;
pub mod presence;
pub mod store;
