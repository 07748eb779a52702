//! Integration module for the command-line interface.
//!
//! This module wires the cache options and the output routing needed to
//! resolve the dataset and present its views.

pub(crate) mod cache_manager;
pub(crate) mod data_pipeline;
