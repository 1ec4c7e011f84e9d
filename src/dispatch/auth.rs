//! Per-user authorization levels.

use dashmap::DashMap;

use crate::config::{AuthConfig, ConfigError};

/// User id -> authorization level, with a default for everyone else.
///
/// Lookup is read-only; users without an override simply get the
/// default level. Overrides are seeded from configuration at startup
/// and may also be adjusted at runtime, so the map is concurrent.
#[derive(Debug, Default)]
pub struct AuthStore {
    overrides: DashMap<u64, u8>,
    default_level: u8,
}

impl AuthStore {
    pub fn new(default_level: u8) -> Self {
        Self {
            overrides: DashMap::new(),
            default_level,
        }
    }

    /// Build the store from configuration, seeding permanent overrides.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let store = Self::new(config.default_level);
        for (user_id, level) in config.parsed_overrides()? {
            store.set_override(user_id, level);
        }
        Ok(store)
    }

    /// The level commands are gated against for this user.
    pub fn effective_level(&self, user_id: u64) -> u8 {
        self.overrides
            .get(&user_id)
            .map(|entry| *entry)
            .unwrap_or(self.default_level)
    }

    /// Pin a user to a level.
    pub fn set_override(&self, user_id: u64, level: u8) {
        self.overrides.insert(user_id, level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_users_get_the_default_level() {
        let store = AuthStore::new(0);
        assert_eq!(store.effective_level(1234), 0);
        // Repeated lookups are stable and side-effect free.
        assert_eq!(store.effective_level(1234), 0);
    }

    #[test]
    fn overrides_win_over_the_default() {
        let store = AuthStore::new(0);
        store.set_override(73007938238676992, 5);

        // Lookups for other users never disturb a seeded override.
        assert_eq!(store.effective_level(1), 0);
        assert_eq!(store.effective_level(2), 0);
        assert_eq!(store.effective_level(73007938238676992), 5);
    }

    #[test]
    fn from_config_seeds_overrides() {
        let config: AuthConfig = toml::from_str(
            r#"
            default_level = 1
            [overrides]
            "42" = 5
            "#,
        )
        .unwrap();
        let store = AuthStore::from_config(&config).unwrap();
        assert_eq!(store.effective_level(42), 5);
        assert_eq!(store.effective_level(43), 1);
    }
}
