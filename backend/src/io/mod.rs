//! # IO Layer
//!
//! Everything that talks to the outside world: the REST API and the readers
//! for uploaded CSV and XLSX files.

pub mod rest;
pub mod tabular;
