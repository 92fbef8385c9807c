//! Provider adapters. Each one gets its own file here.
pub mod csv_pipeline;
pub mod dwr;
pub mod envcanada;
pub mod usgs;

#[cfg(test)]
mod fixtures;
