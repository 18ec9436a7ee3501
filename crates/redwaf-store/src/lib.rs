//! RedWAF Store - key-value store seam and seed orchestration
//!
//! Provides:
//! - `KvStore` trait covering the operations the seeder needs
//! - `RedisKv` (production) and `MemoryKv` (tests, dry runs) implementations
//! - Rule-file reader for the fixed category list
//! - `Seeder` driving the full-replace seeding sequence

pub mod errors;
pub mod keys;
pub mod kv;
pub mod rules;
pub mod seeder;

// Re-export key types
pub use errors::{Result, StoreError};
pub use kv::{KvStore, MemoryKv, RedisKv};
pub use rules::{read_rule_file, RULE_CATEGORIES};
pub use seeder::Seeder;
