//! RedWAF Config - restricted Lua configuration reader
//!
//! Provides:
//! - Typed value model for the restricted config grammar (`ConfigValue`,
//!   `ConfigMap`)
//! - Phased text extractor that never evaluates the source as code
//! - Declarative defaults table resolving the map into `Settings`

pub mod errors;
pub mod parser;
pub mod settings;
pub mod value;

// Re-export key types
pub use errors::{ConfigError, Result};
pub use parser::{parse_file, parse_str};
pub use settings::{ConnectionSettings, Settings};
pub use value::{ConfigMap, ConfigValue};
