//! Utility functions and helpers.

pub mod slug;

pub use slug::slugify;
