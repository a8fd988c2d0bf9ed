//! Common imports and types used throughout Mariposa.

pub use std::collections::{BTreeMap, HashMap};

pub type Result<T> = std::result::Result<T, crate::core::errors::ShellError>;
