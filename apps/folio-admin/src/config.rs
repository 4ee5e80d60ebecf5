//! # Admin Configuration
//!
//! Everything the orchestrator needs at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     FOLIO_STORE_BACKEND=remote                                          │
//! │     SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY / JWT_SECRET               │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ./folio.toml (or --config PATH)                                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     embedded store at data/folio.db, US$, 10% tax, 10 table rows        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! backend = "embedded"          # embedded | remote
//! database_path = "data/folio.db"
//! snapshot_path = "data/invoices.json"
//!
//! [business]
//! name = "Northwind Studio"
//! currency = "US$"
//! tax_percent = 10
//!
//! [render]
//! max_rows = 10
//! uploads_dir = "uploads"
//!
//! [auth]
//! jwt_secret = "change-me"
//! ```

use folio_core::{Footer, InvoiceDefaults, MAX_TAX_PERCENT};
use folio_db::{DbConfig, RemoteConfig, StoreConfig};
use folio_render::{LayoutOptions, RenderOptions};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "folio.toml";

const MAX_CURRENCY_LEN: usize = 10;

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

// =============================================================================
// Store Backend
// =============================================================================

/// Which `InvoiceStore` to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// SQLite file on this machine.
    #[default]
    Embedded,

    /// Hosted Postgres through PostgREST.
    Remote,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Embedded => write!(f, "embedded"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "embedded" | "sqlite" | "local" => Ok(BackendKind::Embedded),
            "remote" | "supabase" | "postgrest" => Ok(BackendKind::Remote),
            _ => Err(ConfigError::InvalidValue(format!(
                "store.backend '{s}' (expected embedded or remote)"
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[store]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: BackendKind,

    /// SQLite file for the embedded backend.
    pub database_path: PathBuf,

    /// Legacy JSON snapshot imported into an empty store at startup.
    pub snapshot_path: PathBuf,

    pub max_connections: u32,

    /// Remote project URL.
    pub url: Option<String>,

    /// Remote service-role key.
    pub service_key: Option<String>,

    /// Remote schema.
    pub schema: String,

    /// Remote request timeout.
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            backend: BackendKind::Embedded,
            database_path: PathBuf::from("data/folio.db"),
            snapshot_path: PathBuf::from(folio_db::DEFAULT_SNAPSHOT_PATH),
            max_connections: 5,
            url: None,
            service_key: None,
            schema: "public".to_string(),
            timeout_secs: 10,
        }
    }
}

/// `[business]`: identity printed on invoices plus money defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessSettings {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub terms: Option<String>,
    pub refund_policy: Option<String>,
    pub logo_url: Option<String>,
    pub currency: String,
    pub tax_percent: Decimal,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        BusinessSettings {
            name: None,
            contact: None,
            address: None,
            city: None,
            tax_id: None,
            website: None,
            email: None,
            phone: None,
            terms: None,
            refund_policy: None,
            logo_url: None,
            currency: folio_core::DEFAULT_CURRENCY.to_string(),
            tax_percent: Decimal::from(10),
        }
    }
}

impl BusinessSettings {
    /// The identity as an invoice footer.
    pub fn footer(&self) -> Footer {
        Footer {
            business_name: self.name.clone(),
            contact: self.contact.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            tax_id: self.tax_id.clone(),
            website: self.website.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            terms: self.terms.clone(),
            refund_policy: self.refund_policy.clone(),
            logo_url: self.logo_url.clone(),
        }
    }
}

/// `[render]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Upper bound on service rows drawn in the table.
    pub max_rows: usize,

    /// Where `/uploads/...` logo URLs resolve.
    pub uploads_dir: Option<PathBuf>,

    /// Logo used when an invoice has none.
    pub fallback_logo: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            max_rows: folio_render::DEFAULT_MAX_ROWS,
            uploads_dir: Some(PathBuf::from("uploads")),
            fallback_logo: None,
        }
    }
}

/// `[auth]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 secret for admin tokens.
    pub jwt_secret: String,
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete admin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub business: BusinessSettings,
    pub render: RenderSettings,
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Loads `path` (or `folio.toml`), applies environment overrides and
    /// validates.
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() || explicit {
            info!(path = %path.display(), "Loading config from file");
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&contents)?
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable numeric values are
    /// ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(backend) = get(&["FOLIO_STORE_BACKEND"]) {
            if let Ok(parsed) = backend.parse() {
                debug!(backend = %backend, "Overriding store backend from environment");
                self.store.backend = parsed;
            }
        }
        if let Some(path) = get(&["FOLIO_DATABASE_PATH"]) {
            self.store.database_path = PathBuf::from(path);
        }
        if let Some(path) = get(&["FOLIO_SNAPSHOT_PATH"]) {
            self.store.snapshot_path = PathBuf::from(path);
        }
        if let Some(url) = get(&["FOLIO_REMOTE_URL", "SUPABASE_URL"]) {
            self.store.url = Some(url);
        }
        if let Some(key) = get(&["FOLIO_REMOTE_KEY", "SUPABASE_SERVICE_ROLE_KEY"]) {
            self.store.service_key = Some(key);
        }
        if let Some(schema) = get(&["FOLIO_REMOTE_SCHEMA", "SUPABASE_SCHEMA"]) {
            self.store.schema = schema;
        }
        if let Some(name) = get(&["FOLIO_BUSINESS_NAME"]) {
            self.business.name = Some(name);
        }
        if let Some(currency) = get(&["FOLIO_CURRENCY"]) {
            self.business.currency = currency;
        }
        if let Some(tax) = get(&["FOLIO_TAX_PERCENT"]).and_then(|v| Decimal::from_str(&v).ok()) {
            self.business.tax_percent = tax;
        }
        if let Some(rows) = get(&["FOLIO_MAX_ROWS"]).and_then(|v| v.parse().ok()) {
            self.render.max_rows = rows;
        }
        if let Some(dir) = get(&["FOLIO_UPLOADS_DIR"]) {
            self.render.uploads_dir = Some(PathBuf::from(dir));
        }
        if let Some(logo) = get(&["FOLIO_FALLBACK_LOGO"]) {
            self.render.fallback_logo = Some(PathBuf::from(logo));
        }
        if let Some(secret) = get(&["FOLIO_JWT_SECRET", "JWT_SECRET"]) {
            self.auth.jwt_secret = secret;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == BackendKind::Remote {
            let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
            if blank(&self.store.url) {
                return Err(ConfigError::MissingRequired(
                    "store.url (or SUPABASE_URL) for the remote backend".into(),
                ));
            }
            if blank(&self.store.service_key) {
                return Err(ConfigError::MissingRequired(
                    "store.service_key (or SUPABASE_SERVICE_ROLE_KEY) for the remote backend".into(),
                ));
            }
        }

        let tax = self.business.tax_percent;
        if tax.is_sign_negative() || tax > Decimal::from(MAX_TAX_PERCENT) {
            return Err(ConfigError::InvalidValue(format!(
                "business.tax_percent {tax} (expected 0 to {MAX_TAX_PERCENT})"
            )));
        }

        let currency = self.business.currency.trim();
        if currency.is_empty() || currency.chars().count() > MAX_CURRENCY_LEN {
            return Err(ConfigError::InvalidValue(format!(
                "business.currency '{currency}' (1 to {MAX_CURRENCY_LEN} characters)"
            )));
        }

        if self.render.max_rows == 0 {
            return Err(ConfigError::InvalidValue(
                "render.max_rows must be greater than 0".into(),
            ));
        }

        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired(
                "auth.jwt_secret (or JWT_SECRET)".into(),
            ));
        }

        Ok(())
    }

    // =========================================================================
    // Derived settings
    // =========================================================================

    /// Backend selection for `folio_db::open_store`.
    pub fn store_config(&self) -> StoreConfig {
        match self.store.backend {
            BackendKind::Embedded => StoreConfig::Embedded(
                DbConfig::new(&self.store.database_path)
                    .max_connections(self.store.max_connections.max(1)),
            ),
            BackendKind::Remote => StoreConfig::Remote(
                RemoteConfig::new(
                    self.store.url.clone().unwrap_or_default(),
                    self.store.service_key.clone().unwrap_or_default(),
                )
                .schema(self.store.schema.clone())
                .timeout(Duration::from_secs(self.store.timeout_secs.max(1))),
            ),
        }
    }

    /// Defaults merged into new invoices.
    pub fn invoice_defaults(&self) -> InvoiceDefaults {
        InvoiceDefaults {
            currency: self.business.currency.trim().to_string(),
            tax_percent: self.business.tax_percent,
            footer: self.business.footer(),
        }
    }

    /// Renderer settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            layout: LayoutOptions {
                max_rows: self.render.max_rows,
                business: self.business.footer(),
            },
            uploads_dir: self.render.uploads_dir.clone(),
            fallback_logo: self.render.fallback_logo.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_secret() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "test-secret".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store.backend, BackendKind::Embedded);
        assert_eq!(config.business.currency, "US$");
        assert_eq!(config.business.tax_percent, Decimal::from(10));
        assert_eq!(config.render.max_rows, 10);
        assert!(with_secret().validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = AppConfig::from_toml(
            r#"
            [store]
            backend = "remote"
            url = "https://abc.supabase.co"
            service_key = "key"

            [business]
            name = "Northwind Studio"
            tax_percent = 8.25

            [auth]
            jwt_secret = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, BackendKind::Remote);
        assert_eq!(config.store.schema, "public");
        assert_eq!(config.business.tax_percent, Decimal::new(825, 2));
        assert_eq!(config.business.currency, "US$");
        assert!(config.validate().is_ok());
        assert!(matches!(config.store_config(), StoreConfig::Remote(_)));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = AppConfig::from_toml("[store]\nbackend = \"mongo\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!("supabase".parse::<BackendKind>().is_ok());
        assert!("mongo".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("FOLIO_STORE_BACKEND", "remote"),
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("SUPABASE_SCHEMA", "billing"),
            ("JWT_SECRET", "from-env"),
            ("FOLIO_TAX_PERCENT", "12.5"),
            ("FOLIO_MAX_ROWS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.store.backend, BackendKind::Remote);
        assert_eq!(config.store.schema, "billing");
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.business.tax_percent, Decimal::new(125, 1));
        assert_eq!(config.render.max_rows, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_folio_keys_win_over_legacy_names() {
        let env: HashMap<&str, &str> =
            [("FOLIO_JWT_SECRET", "folio"), ("JWT_SECRET", "legacy")].into_iter().collect();
        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.auth.jwt_secret, "folio");
    }

    #[test]
    fn test_validation_rules() {
        let mut remote = with_secret();
        remote.store.backend = BackendKind::Remote;
        assert!(matches!(remote.validate(), Err(ConfigError::MissingRequired(_))));

        let mut tax = with_secret();
        tax.business.tax_percent = Decimal::from(101);
        assert!(matches!(tax.validate(), Err(ConfigError::InvalidValue(_))));

        let mut rows = with_secret();
        rows.render.max_rows = 0;
        assert!(rows.validate().is_err());

        let mut currency = with_secret();
        currency.business.currency = "DOLLARS-US-LONG".to_string();
        assert!(currency.validate().is_err());

        assert!(matches!(
            AppConfig::default().validate(),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_derived_settings() {
        let mut config = with_secret();
        config.business.name = Some("Northwind".to_string());

        let defaults = config.invoice_defaults();
        assert_eq!(defaults.footer.business_name.as_deref(), Some("Northwind"));

        let render = config.render_options();
        assert_eq!(render.layout.max_rows, 10);
        assert_eq!(render.layout.business.business_name.as_deref(), Some("Northwind"));
        assert!(matches!(config.store_config(), StoreConfig::Embedded(_)));
    }
}
