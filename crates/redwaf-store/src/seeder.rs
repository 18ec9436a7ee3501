//! Seed orchestration
//!
//! Seeding is a fixed sequence of full-replace groups. Each group is
//! deleted and repopulated wholesale on every run, never merged, so a
//! re-run always converges on the same store state:
//! 1. Config hash from the resolved behaviour fields
//! 2. One rule set per inspection category
//! 3. IP allow list, IP deny list
//! 4. Version counters
//!
//! There is no rollback; an interrupted run is repaired by running again.

use redwaf_config::Settings;

use crate::errors::Result;
use crate::keys;
use crate::kv::KvStore;
use crate::rules::{read_rule_file, RULE_CATEGORIES};

/// Version counters are flat for now; monotonic bumping is future work
const INITIAL_VERSION: &str = "1";

/// Drives the seeding sequence against any `KvStore`
pub struct Seeder<'a, S: KvStore> {
    store: &'a mut S,
    settings: &'a Settings,
}

impl<'a, S: KvStore> Seeder<'a, S> {
    pub fn new(store: &'a mut S, settings: &'a Settings) -> Self {
        Self { store, settings }
    }

    /// Run every group in the fixed order, reporting one line per group
    ///
    /// The liveness check runs first; if it fails, nothing is mutated.
    pub fn seed_all(&mut self, mut report: impl FnMut(&str)) -> Result<()> {
        self.store.ping()?;

        let fields = self.seed_config()?;
        report(&format!("✓ config initialised ({} fields)", fields));

        for category in RULE_CATEGORIES.iter().copied() {
            let count = self.seed_rules(category)?;
            report(&format!("✓ {} rules initialised ({} entries)", category, count));
        }

        let allowed = self.seed_ip_whitelist()?;
        report(&format!("✓ IP whitelist initialised ({} entries)", allowed));
        let denied = self.seed_ip_blocklist()?;
        report(&format!("✓ IP blocklist initialised ({} entries)", denied));

        self.seed_versions()?;
        report("✓ version counters initialised");

        Ok(())
    }

    /// Replace the config hash with the resolved behaviour fields
    pub fn seed_config(&mut self) -> Result<usize> {
        self.store.del(keys::CONFIG)?;
        for (field, value) in &self.settings.behavior {
            self.store.hset(keys::CONFIG, field, value)?;
        }
        tracing::debug!(fields = self.settings.behavior.len(), "config hash seeded");
        Ok(self.settings.behavior.len())
    }

    /// Replace one category's rule set with its file contents
    ///
    /// A missing file still deletes the set: zero members, never stale.
    pub fn seed_rules(&mut self, category: &str) -> Result<usize> {
        let key = keys::rules(category);
        self.store.del(&key)?;

        let rules = read_rule_file(&self.settings.rule_path, category)?;
        if !rules.is_empty() {
            self.store.sadd(&key, &rules)?;
        }
        tracing::debug!(category, count = rules.len(), "rule set seeded");
        Ok(rules.len())
    }

    /// Replace the IP allow list
    pub fn seed_ip_whitelist(&mut self) -> Result<usize> {
        self.store.del(keys::IP_WHITELIST)?;
        if !self.settings.ip_whitelist.is_empty() {
            self.store.sadd(keys::IP_WHITELIST, &self.settings.ip_whitelist)?;
        }
        Ok(self.settings.ip_whitelist.len())
    }

    /// Replace the IP deny list
    pub fn seed_ip_blocklist(&mut self) -> Result<usize> {
        self.store.del(keys::IP_BLOCKLIST)?;
        if !self.settings.ip_blocklist.is_empty() {
            self.store.sadd(keys::IP_BLOCKLIST, &self.settings.ip_blocklist)?;
        }
        Ok(self.settings.ip_blocklist.len())
    }

    /// Reset all version counters
    pub fn seed_versions(&mut self) -> Result<()> {
        self.store.set(keys::VERSION_CONFIG, INITIAL_VERSION)?;
        self.store.set(keys::VERSION_RULES, INITIAL_VERSION)?;
        self.store.set(keys::VERSION_IP, INITIAL_VERSION)?;
        Ok(())
    }
}
