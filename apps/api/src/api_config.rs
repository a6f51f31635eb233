use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use wayfare_core::AppError;
use wayfare_domain::DEFAULT_SUPERUSER_ROLES;

const DEFAULT_JWT_ISSUER: &str = "wayfare";
const DEFAULT_JWT_TTL_MINUTES: i64 = 24 * 60;
const DEFAULT_AUTHZ_TIMEOUT_MS: u64 = 5_000;

/// Backing store for users, roles and permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Postgres { database_url: String },
    Memory,
}

/// Optional administrator created at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub store: StoreConfig,
    pub frontend_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl_minutes: i64,
    pub superuser_roles: Vec<String>,
    pub authz_timeout: Duration,
    pub api_host: String,
    pub api_port: u16,
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let store = match optional("AUTH_STORE")
            .unwrap_or_else(|| "postgres".to_owned())
            .as_str()
        {
            "postgres" => StoreConfig::Postgres {
                database_url: optional("DATABASE_URL")
                    .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?,
            },
            "memory" => StoreConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "AUTH_STORE must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        if migrate_only && store == StoreConfig::Memory {
            return Err(AppError::Validation(
                "migrate requires AUTH_STORE=postgres".to_owned(),
            ));
        }

        let jwt_secret = optional("JWT_SECRET")
            .ok_or_else(|| AppError::Validation("JWT_SECRET is required".to_owned()))?;
        if jwt_secret.len() < wayfare_infrastructure::MIN_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {} characters",
                wayfare_infrastructure::MIN_SECRET_LENGTH
            )));
        }

        let jwt_ttl_minutes = parse_or(
            "JWT_TTL_MINUTES",
            optional("JWT_TTL_MINUTES"),
            DEFAULT_JWT_TTL_MINUTES,
        )?;
        if jwt_ttl_minutes <= 0 {
            return Err(AppError::Validation(
                "JWT_TTL_MINUTES must be positive".to_owned(),
            ));
        }
        if jwt_ttl_minutes > wayfare_infrastructure::MAX_TTL_MINUTES {
            return Err(AppError::Validation(format!(
                "JWT_TTL_MINUTES must be at most {}",
                wayfare_infrastructure::MAX_TTL_MINUTES
            )));
        }

        let superuser_roles = optional("SUPERUSER_ROLES")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_else(|| {
                DEFAULT_SUPERUSER_ROLES
                    .iter()
                    .map(|name| (*name).to_owned())
                    .collect()
            });

        let authz_timeout_ms = parse_or(
            "AUTHZ_TIMEOUT_MS",
            optional("AUTHZ_TIMEOUT_MS"),
            DEFAULT_AUTHZ_TIMEOUT_MS,
        )?;

        let bootstrap_admin = match (
            optional("BOOTSTRAP_ADMIN_EMAIL"),
            optional("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdminConfig {
                email,
                password,
                display_name: optional("BOOTSTRAP_ADMIN_NAME")
                    .unwrap_or_else(|| "Platform Admin".to_owned()),
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together"
                        .to_owned(),
                ));
            }
        };

        Ok(Self {
            migrate_only,
            store,
            frontend_url: optional("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_owned()),
            jwt_secret,
            jwt_issuer: optional("JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_owned()),
            jwt_ttl_minutes,
            superuser_roles,
            authz_timeout: Duration::from_millis(authz_timeout_ms),
            api_host: optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned()),
            api_port: parse_or("API_PORT", optional("API_PORT"), 3001)?,
            bootstrap_admin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
        })
        .transpose()
        .map(|parsed| parsed.unwrap_or(default))
}
