// src/lib.rs

//! Planes: scraped study plan storage with duplicate detection.

pub mod error;
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
