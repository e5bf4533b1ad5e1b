use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// 为空时不校验 aud
    pub jwt_audience: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    /// 每次扇出同时处理的群组数
    pub fanout_concurrency: usize,
    pub expo_push_enabled: bool,
    pub expo_push_url: String,
    pub expo_access_token: Option<String>,
    pub push_timeout_secs: u64,
    /// 创建者成员关系补偿任务的间隔，0 表示关闭
    pub reconcile_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空字符串和未设置一样处理
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| get(key).ok_or(env::VarError::NotPresent);
        let parse_or = |key: &str, default| parse_value(get(key), default);

        let server_port = get("SERVER_PORT")
            .or_else(|| get("PORT"))
            .and_then(|value| value.parse().ok())
            .unwrap_or(8080);

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_value(get("DATABASE_MAX_CONNECTIONS"), 25),
            jwt_secret: required("SUPABASE_JWT_SECRET")?,
            jwt_audience: match lookup("JWT_AUDIENCE") {
                Some(value) if value.trim().is_empty() => None,
                Some(value) => Some(value),
                None => Some("authenticated".to_string()),
            },
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            fanout_concurrency: parse_value(get("FANOUT_CONCURRENCY"), 4usize).max(1),
            expo_push_enabled: parse_value(get("EXPO_PUSH_ENABLED"), false),
            expo_push_url: get("EXPO_PUSH_URL").unwrap_or_else(|| DEFAULT_EXPO_PUSH_URL.to_string()),
            expo_access_token: get("EXPO_ACCESS_TOKEN"),
            push_timeout_secs: parse_or("PUSH_TIMEOUT_SECS", 10),
            reconcile_interval_secs: parse_or("RECONCILE_INTERVAL_SECS", 300),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_secs)
    }

    pub fn reconcile_interval(&self) -> Option<Duration> {
        (self.reconcile_interval_secs > 0).then(|| Duration::from_secs(self.reconcile_interval_secs))
    }
}

fn parse_value<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
