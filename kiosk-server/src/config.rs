//! Kiosk server configuration

use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::eligibility::{CooldownPrecision, EligibilityPolicy};
use crate::sheets::{OrderColumnNames, RegistrationColumnNames, SheetRange};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Spreadsheet backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Google,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "sheets" => Ok(Self::Google),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Service account credentials for the Sheets API
#[derive(Clone)]
pub struct GoogleCredentials {
    pub spreadsheet_id: String,
    pub client_email: String,
    pub private_key: String,
}

impl std::fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCredentials")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Kiosk server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | production
    pub environment: String,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is Google
    pub google: Option<GoogleCredentials>,
    pub registration_range: SheetRange,
    pub orders_range: SheetRange,
    pub registration_columns: RegistrationColumnNames,
    pub order_columns: OrderColumnNames,
    /// Calendar used for parsing timestamps and deciding "today"
    pub timezone: Tz,
    pub policy: EligibilityPolicy,
    /// Payment cell value that marks a student as paid
    pub paid_marker: String,
    pub menu: Vec<String>,
    pub request_timeout: Duration,
    pub store_timeout: Duration,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let store_backend = parsed(&var, "STORE_BACKEND", StoreBackend::Google)?;
        let google = match store_backend {
            StoreBackend::Google => Some(GoogleCredentials {
                spreadsheet_id: var("GOOGLE_SHEETS_ID").ok_or("GOOGLE_SHEETS_ID must be set")?,
                client_email: require_secret(&var, "GOOGLE_SHEETS_CLIENT_EMAIL")?,
                private_key: require_secret(&var, "GOOGLE_SHEETS_PRIVATE_KEY")?,
            }),
            StoreBackend::Memory => None,
        };

        let registration_range = SheetRange::parse(
            &var("REGISTRATION_RANGE").unwrap_or_else(|| "Sheet1!A:G".into()),
        )?;
        let orders_range =
            SheetRange::parse(&var("ORDERS_RANGE").unwrap_or_else(|| "Sheet2!A:C".into()))?;

        let reg_defaults = RegistrationColumnNames::default();
        let registration_columns = RegistrationColumnNames {
            student_id: var("COL_STUDENT_ID").unwrap_or(reg_defaults.student_id),
            name: var("COL_NAME").unwrap_or(reg_defaults.name),
            phone: var("COL_PHONE").unwrap_or(reg_defaults.phone),
            subscription_option: var("COL_OPTION").unwrap_or(reg_defaults.subscription_option),
            consent: var("COL_CONSENT").unwrap_or(reg_defaults.consent),
            payment: var("COL_PAYMENT").unwrap_or(reg_defaults.payment),
            registered_at: var("COL_REGISTERED_AT").unwrap_or(reg_defaults.registered_at),
        };
        let order_defaults = OrderColumnNames::default();
        let order_columns = OrderColumnNames {
            student_id: var("COL_ORDER_STUDENT_ID").unwrap_or(order_defaults.student_id),
            beverage: var("COL_ORDER_BEVERAGE").unwrap_or(order_defaults.beverage),
            timestamp: var("COL_ORDER_TIMESTAMP").unwrap_or(order_defaults.timestamp),
        };

        let timezone = match var("KIOSK_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| format!("KIOSK_TIMEZONE: {e}"))?,
            None => chrono_tz::Asia::Seoul,
        };

        let daily_cap: u32 = parsed(&var, "DAILY_CAP", 2)?;
        if daily_cap == 0 {
            return Err("DAILY_CAP must be at least 1".into());
        }
        let cooldown_minutes: i64 = parsed(&var, "COOLDOWN_MINUTES", 30)?;
        if cooldown_minutes < 0 {
            return Err("COOLDOWN_MINUTES must not be negative".into());
        }
        let policy = EligibilityPolicy {
            daily_cap,
            cooldown: chrono::Duration::minutes(cooldown_minutes),
            precision: parsed(&var, "COOLDOWN_PRECISION", CooldownPrecision::Timestamp)?,
        };

        let menu: Vec<String> = var("MENU")
            .unwrap_or_else(|| "아메리카노,카페라떼".into())
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        if menu.is_empty() {
            return Err("MENU must list at least one beverage".into());
        }

        Ok(Self {
            http_port: parsed(&var, "HTTP_PORT", 3000)?,
            environment,
            store_backend,
            google,
            registration_range,
            orders_range,
            registration_columns,
            order_columns,
            timezone,
            policy,
            paid_marker: var("PAID_MARKER").unwrap_or_else(|| "O".into()),
            menu,
            request_timeout: Duration::from_millis(parsed(&var, "REQUEST_TIMEOUT_MS", 30_000)?),
            store_timeout: Duration::from_millis(parsed(&var, "STORE_TIMEOUT_MS", 10_000)?),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Parse an optional variable; a present but malformed value is an error.
fn parsed<T, V>(var: &V, name: &str, default: T) -> Result<T, BoxError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| format!("{name}: invalid value '{raw}': {e}").into()),
        None => Ok(default),
    }
}

/// A credential the Google backend cannot run without
fn require_secret<V>(var: &V, name: &str) -> Result<String, BoxError>
where
    V: Fn(&str) -> Option<String>,
{
    var(name).ok_or_else(|| format!("{name} must be set when STORE_BACKEND=google").into())
}
