use std::collections::HashMap;

/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; each field maps to the upper-cased
/// env var of the same name (`database_url` → `DATABASE_URL`). Optional fields
/// and `#[serde(default = ...)]` fields may be left unset.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load from the process environment.
    ///
    /// # Panics
    ///
    /// Panics if a required env var is missing or cannot be deserialized.
    fn from_env() -> Self {
        envy::from_env().unwrap_or_else(|e| panic!("failed to load config from environment: {e}"))
    }

    /// Load from an explicit set of variables instead of the process environment.
    fn from_vars(vars: HashMap<String, String>) -> Result<Self, envy::Error> {
        envy::from_iter(vars)
    }
}
