use std::sync::Arc;

use crate::auth::password::hash_password;
use crate::config::{AppConfig, JwtConfig};
use crate::store::{seed, Store};

/// Password every seeded demo account starts with.
pub const DEFAULT_PASSWORD: &str = "password";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let hash = hash_password(DEFAULT_PASSWORD)?;
        let (db, _) = seed::demo(&hash);
        Ok(Self {
            store: Arc::new(Store::new(db)),
            config,
        })
    }

    /// Deterministically configured state for tests: demo data, fixed JWT
    /// settings, known API key.
    pub fn fake() -> (Self, seed::SeedIds) {
        let config = Arc::new(AppConfig {
            api_key: "test-api-key".into(),
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
            },
        });
        let hash = hash_password(DEFAULT_PASSWORD).expect("hashing default password");
        let (db, ids) = seed::demo(&hash);
        (
            Self {
                store: Arc::new(Store::new(db)),
                config,
            },
            ids,
        )
    }
}
