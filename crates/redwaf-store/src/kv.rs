//! Key-value store seam
//!
//! The seeder only needs five operations; `KvStore` pins them down so the
//! seeding sequence can run against Redis in production and against an
//! in-memory store in tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use redis::Commands;
use redwaf_config::ConnectionSettings;

use crate::errors::{Result, StoreError};

/// Store operations consumed by the seeder
pub trait KvStore {
    /// Liveness check; must succeed before any mutation is attempted
    fn ping(&mut self) -> Result<()>;

    /// Delete a key of any type; deleting a missing key is a no-op
    fn del(&mut self, key: &str) -> Result<()>;

    /// Set one field in a hash
    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()>;

    /// Add members to a set
    fn sadd(&mut self, key: &str, members: &[String]) -> Result<()>;

    /// Set a plain string value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Redis-backed store over one synchronous connection
///
/// The connection is acquired once and held for the process lifetime;
/// it is released implicitly at exit.
pub struct RedisKv {
    conn: redis::Connection,
}

impl RedisKv {
    /// Connect with the resolved connection settings
    ///
    /// # Errors
    ///
    /// Returns `Connect` when the client cannot be built or the TCP
    /// connection is refused.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let addr = format!("{}:{}", settings.host, settings.port);
        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(settings.host.clone(), settings.port),
            redis: redis::RedisConnectionInfo {
                db: settings.db,
                username: settings.username.clone(),
                password: settings.password.clone(),
            },
        };

        let client = redis::Client::open(info).map_err(|source| StoreError::Connect {
            addr: addr.clone(),
            source,
        })?;
        let conn = client
            .get_connection()
            .map_err(|source| StoreError::Connect { addr, source })?;

        tracing::debug!(host = %settings.host, port = settings.port, db = settings.db, "store connection established");
        Ok(Self { conn })
    }
}

impl KvStore for RedisKv {
    fn ping(&mut self) -> Result<()> {
        redis::cmd("PING")
            .query::<String>(&mut self.conn)
            .map_err(|source| StoreError::Ping { source })?;
        Ok(())
    }

    fn del(&mut self, key: &str) -> Result<()> {
        let _: usize = self.conn.del(key).map_err(|source| StoreError::Command {
            op: "DEL",
            key: key.to_string(),
            source,
        })?;
        Ok(())
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        let _: usize = self
            .conn
            .hset(key, field, value)
            .map_err(|source| StoreError::Command {
                op: "HSET",
                key: key.to_string(),
                source,
            })?;
        Ok(())
    }

    fn sadd(&mut self, key: &str, members: &[String]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }
        let _: usize = self
            .conn
            .sadd(key, members)
            .map_err(|source| StoreError::Command {
                op: "SADD",
                key: key.to_string(),
                source,
            })?;
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _: () = self
            .conn
            .set(key, value)
            .map_err(|source| StoreError::Command {
                op: "SET",
                key: key.to_string(),
                source,
            })?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs
///
/// Not thread-safe (no Arc/RwLock) - the tool is single-threaded batch
/// execution. State is inspectable so tests can assert on the exact
/// post-seed contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKv {
    hashes: HashMap<String, BTreeMap<String, String>>,
    sets: HashMap<String, BTreeSet<String>>,
    strings: HashMap<String, String>,
}

impl MemoryKv {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash contents for a key, if present
    pub fn hash(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.hashes.get(key)
    }

    /// Set contents for a key, if present
    pub fn set_members(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.sets.get(key)
    }

    /// String value for a key, if present
    pub fn string(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }
}

impl KvStore for MemoryKv {
    fn ping(&mut self) -> Result<()> {
        Ok(())
    }

    fn del(&mut self, key: &str) -> Result<()> {
        self.hashes.remove(key);
        self.sets.remove(key);
        self.strings.remove(key);
        Ok(())
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        self.hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn sadd(&mut self, key: &str, members: &[String]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }
        self.sets
            .entry(key.to_string())
            .or_default()
            .extend(members.iter().cloned());
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.strings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
