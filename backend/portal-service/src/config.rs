use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub cloudinary: CloudinaryConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub registration: RegistrationConfig,
    pub admin_seed: AdminSeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub env: String,

    #[serde(default = "default_app_host")]
    pub host: String,

    #[serde(default = "default_app_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,

    #[serde(default = "default_db_name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub refresh_secret: String,

    #[serde(default = "default_jwt_access_ttl")]
    pub access_token_ttl: i64,

    #[serde(default = "default_jwt_refresh_ttl")]
    pub refresh_token_ttl: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: String,

    #[serde(default)]
    pub smtp_password: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Frontend base URL used in email deep links and CORS defaults.
    #[serde(default = "default_client_url")]
    pub client_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,

    #[serde(default = "default_upload_folder")]
    pub base_folder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, or "*".
    #[serde(default = "default_client_url")]
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_rate_limit_window_secs")]
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Comma-separated email domain suffixes that are auto-approved on
    /// registration. Accounts outside these domains start INACTIVE until an
    /// admin approves them.
    #[serde(default = "default_official_domains")]
    pub official_email_domains: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeedConfig {
    #[serde(default = "default_admin_email")]
    pub email: String,

    #[serde(default = "default_admin_password")]
    pub password: String,

    #[serde(default = "default_admin_name")]
    pub name: String,

    #[serde(default = "default_admin_phone")]
    pub phone: String,
}

// Default value functions
fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    5000
}

fn default_db_name() -> String {
    "cse_portal".to_string()
}

fn default_jwt_access_ttl() -> i64 {
    86_400 // 1 day
}

fn default_jwt_refresh_ttl() -> i64 {
    2_592_000 // 30 days
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_name() -> String {
    "CSE Department Portal".to_string()
}

fn default_client_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_upload_folder() -> String {
    "cse-portal".to_string()
}

fn default_rate_limit_max_requests() -> u32 {
    100
}

fn default_rate_limit_window_secs() -> u64 {
    900 // 15 minutes
}

fn default_official_domains() -> String {
    "student.univ.edu,univ.edu".to_string()
}

fn default_admin_email() -> String {
    "admin@univ.edu".to_string()
}

fn default_admin_password() -> String {
    "ChangeMe_Admin1!".to_string()
}

fn default_admin_name() -> String {
    "Super Admin".to_string()
}

fn default_admin_phone() -> String {
    "01700000000".to_string()
}

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("APP_HOST").unwrap_or_else(|_| default_app_host()),
            port: env_or("PORT", default_app_port()),
        };

        let database = DatabaseConfig {
            uri: env::var("MONGODB_URI").map_err(|_| "MONGODB_URI must be set".to_string())?,
            name: env::var("MONGODB_DATABASE").unwrap_or_else(|_| default_db_name()),
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?,
            refresh_secret: env::var("JWT_REFRESH_SECRET")
                .map_err(|_| "JWT_REFRESH_SECRET must be set".to_string())?,
            access_token_ttl: env_or("JWT_ACCESS_TOKEN_TTL", default_jwt_access_ttl()),
            refresh_token_ttl: env_or("JWT_REFRESH_TOKEN_TTL", default_jwt_refresh_ttl()),
        };

        let email = EmailConfig {
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| default_smtp_host()),
            smtp_port: env_or("SMTP_PORT", default_smtp_port()),
            smtp_username: env::var("EMAIL_USER").unwrap_or_default(),
            // App passwords are often pasted with spaces; strip them.
            smtp_password: env::var("EMAIL_PASS")
                .unwrap_or_default()
                .replace(' ', ""),
            from_name: env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| default_from_name()),
            client_url: env::var("CLIENT_URL").unwrap_or_else(|_| default_client_url()),
        };

        let cloudinary = CloudinaryConfig {
            cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .map_err(|_| "CLOUDINARY_CLOUD_NAME must be set".to_string())?,
            api_key: env::var("CLOUDINARY_API_KEY")
                .map_err(|_| "CLOUDINARY_API_KEY must be set".to_string())?,
            api_secret: env::var("CLOUDINARY_API_SECRET")
                .map_err(|_| "CLOUDINARY_API_SECRET must be set".to_string())?,
            base_folder: env::var("CLOUDINARY_BASE_FOLDER")
                .unwrap_or_else(|_| default_upload_folder()),
        };

        let cors = CorsConfig {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .or_else(|_| env::var("CLIENT_URL"))
                .unwrap_or_else(|_| default_client_url()),
        };

        let rate_limit = RateLimitConfig {
            max_requests: env_or("RATE_LIMIT_MAX_REQUESTS", default_rate_limit_max_requests()),
            window_secs: env_or("RATE_LIMIT_WINDOW_SECS", default_rate_limit_window_secs()),
        };

        let registration = RegistrationConfig {
            official_email_domains: env::var("OFFICIAL_EMAIL_DOMAINS")
                .unwrap_or_else(|_| default_official_domains()),
        };

        let admin_seed = AdminSeedConfig {
            email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| default_admin_email()),
            password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| default_admin_password()),
            name: env::var("ADMIN_NAME").unwrap_or_else(|_| default_admin_name()),
            phone: env::var("ADMIN_PHONE").unwrap_or_else(|_| default_admin_phone()),
        };

        Ok(Config {
            app,
            database,
            jwt,
            email,
            cloudinary,
            cors,
            rate_limit,
            registration,
            admin_seed,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.env == "development"
    }
}

impl RegistrationConfig {
    /// True when the address ends with one of the configured official
    /// domain suffixes (`@` is implied).
    pub fn is_official_email(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.official_email_domains
            .split(',')
            .map(|d| d.trim().trim_start_matches('@'))
            .filter(|d| !d.is_empty())
            .any(|domain| email.ends_with(&format!("@{}", domain)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_env(), "development");
        assert_eq!(default_app_host(), "0.0.0.0");
        assert_eq!(default_app_port(), 5000);
        assert_eq!(default_jwt_access_ttl(), 86_400);
        assert_eq!(default_jwt_refresh_ttl(), 2_592_000);
        assert_eq!(default_rate_limit_max_requests(), 100);
        assert_eq!(default_rate_limit_window_secs(), 900);
    }

    #[test]
    fn test_official_email_matching() {
        let reg = RegistrationConfig {
            official_email_domains: "student.univ.edu, univ.edu".to_string(),
        };
        assert!(reg.is_official_email("jane@student.univ.edu"));
        assert!(reg.is_official_email("Prof@UNIV.EDU"));
        assert!(!reg.is_official_email("jane@gmail.com"));
        // A bare suffix match is not enough; the domain boundary counts.
        assert!(!reg.is_official_email("jane@evil-univ.edu.attacker.com"));
    }

    #[test]
    fn test_official_email_empty_list() {
        let reg = RegistrationConfig {
            official_email_domains: String::new(),
        };
        assert!(!reg.is_official_email("jane@student.univ.edu"));
    }
}
