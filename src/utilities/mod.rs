//! Utility modules for Ceroba.

pub mod logger;
