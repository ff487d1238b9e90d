//! Command registry
//!
//! Centralized, case-insensitive lookup table for every available command.

use super::{admin, counter, hash, key, list, search, set, string, ttl, zset, Command};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all available commands
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a new command registry and register all commands
    pub fn new() -> Self {
        let mut registry = CommandRegistry {
            commands: HashMap::new(),
        };

        // String commands
        registry.register(Arc::new(string::GetCommand));
        registry.register(Arc::new(string::SetCommand));
        registry.register(Arc::new(string::SetNxCommand));
        registry.register(Arc::new(string::MGetCommand));
        registry.register(Arc::new(string::MSetCommand));
        registry.register(Arc::new(string::AppendCommand));
        registry.register(Arc::new(string::StrLenCommand));
        registry.register(Arc::new(string::GetRangeCommand));
        registry.register(Arc::new(string::SetRangeCommand));

        // Counter commands
        registry.register(Arc::new(counter::IncrCommand));
        registry.register(Arc::new(counter::IncrByCommand));
        registry.register(Arc::new(counter::DecrCommand));
        registry.register(Arc::new(counter::DecrByCommand));

        // Key commands
        registry.register(Arc::new(key::DelCommand));
        registry.register(Arc::new(key::ExistsCommand));
        registry.register(Arc::new(key::TypeCommand));

        // TTL commands
        registry.register(Arc::new(ttl::ExpireCommand));
        registry.register(Arc::new(ttl::TtlCommand));
        registry.register(Arc::new(ttl::PTtlCommand));
        registry.register(Arc::new(ttl::PersistCommand));

        // List commands
        registry.register(Arc::new(list::LPushCommand));
        registry.register(Arc::new(list::RPushCommand));
        registry.register(Arc::new(list::LPopCommand));
        registry.register(Arc::new(list::RPopCommand));
        registry.register(Arc::new(list::LLenCommand));
        registry.register(Arc::new(list::LRangeCommand));
        registry.register(Arc::new(list::LIndexCommand));
        registry.register(Arc::new(list::LSetCommand));
        registry.register(Arc::new(list::LTrimCommand));
        registry.register(Arc::new(list::LRemCommand));

        // Set commands
        registry.register(Arc::new(set::SAddCommand));
        registry.register(Arc::new(set::SRemCommand));
        registry.register(Arc::new(set::SMembersCommand));
        registry.register(Arc::new(set::SIsMemberCommand));
        registry.register(Arc::new(set::SCardCommand));
        registry.register(Arc::new(set::SInterCommand));
        registry.register(Arc::new(set::SUnionCommand));
        registry.register(Arc::new(set::SDiffCommand));

        // Hash commands
        registry.register(Arc::new(hash::HSetCommand));
        registry.register(Arc::new(hash::HGetCommand));
        registry.register(Arc::new(hash::HMGetCommand));
        registry.register(Arc::new(hash::HGetAllCommand));
        registry.register(Arc::new(hash::HDelCommand));
        registry.register(Arc::new(hash::HExistsCommand));
        registry.register(Arc::new(hash::HLenCommand));
        registry.register(Arc::new(hash::HKeysCommand));
        registry.register(Arc::new(hash::HValsCommand));
        registry.register(Arc::new(hash::HIncrByCommand));

        // Sorted set commands
        registry.register(Arc::new(zset::ZAddCommand));
        registry.register(Arc::new(zset::ZRemCommand));
        registry.register(Arc::new(zset::ZRangeCommand));
        registry.register(Arc::new(zset::ZRevRangeCommand));
        registry.register(Arc::new(zset::ZRangeByScoreCommand));
        registry.register(Arc::new(zset::ZScoreCommand));
        registry.register(Arc::new(zset::ZCardCommand));
        registry.register(Arc::new(zset::ZRankCommand));
        registry.register(Arc::new(zset::ZRevRankCommand));
        registry.register(Arc::new(zset::ZIncrByCommand));
        registry.register(Arc::new(zset::ZCountCommand));

        // Admin commands
        registry.register(Arc::new(admin::PingCommand));
        registry.register(Arc::new(admin::DbSizeCommand));
        registry.register(Arc::new(admin::FlushAllCommand));
        registry.register(Arc::new(admin::SweepCommand));

        // Search commands
        registry.register(Arc::new(search::KeysCommand));

        registry
    }

    /// Register a command
    fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_uppercase();
        self.commands.insert(name, command);
    }

    /// Get a command by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(&name.to_uppercase()).cloned()
    }

    /// Check if a command exists
    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_uppercase())
    }

    /// All command names, sorted
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let registry = CommandRegistry::new();
        assert!(registry.has_command("zrangebyscore"));
        assert!(registry.has_command("ZRangeByScore"));
        assert_eq!(registry.get("hincrby").unwrap().name(), "HINCRBY");
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_every_family_is_registered() {
        let names = CommandRegistry::new().command_names();
        for name in ["GET", "MSET", "DECRBY", "TYPE", "PERSIST", "LREM", "SDIFF", "HVALS", "ZCOUNT", "FLUSHALL", "KEYS"] {
            assert!(names.iter().any(|n| n == name), "{} missing", name);
        }
    }
}
