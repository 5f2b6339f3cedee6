//! Core machinery: error taxonomy, store access, schema definitions,
//! typed records, input collection, and the capture pipeline itself.

pub mod capture;
pub mod collect;
pub mod db;
pub mod error;
pub mod model;
pub mod schemas;
