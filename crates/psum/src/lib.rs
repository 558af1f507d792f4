//! psum library: application logic for the parallel reducer.

pub mod app;
pub mod config;
pub mod errors;
