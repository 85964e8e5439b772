//! Locsync - Localization Catalog Synchronizer
//!
//! Scans application source trees for literal localization keys, detects
//! which ones lack a translation, obtains translations through pluggable
//! providers, and merges the results into per-locale catalog files.

pub mod cli;
pub mod config;
pub mod scanner;
pub mod provider;
pub mod catalog;
pub mod workflow;
pub mod error;
