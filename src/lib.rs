pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod parser;
pub mod record;
pub mod taxonomy;
pub mod writer;
