use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "crypto_coins";
pub const DEFAULT_LIMIT: u32 = 1000;
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_LOG_FILE: &str = "coinstats_supabase.log";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// CoinStats 行情源
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub limit: u32,
}

/// Supabase REST 目标表
#[derive(Debug, Clone)]
pub struct DestinationConfig {
    pub base_url: Option<String>,
    pub anon_key: Option<String>,
    pub service_role_key: Option<String>,
    pub table: String,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub batch_size: usize,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub file: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置，测试中可注入 HashMap
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let limit: u32 = var_or_default(&lookup, "LIMIT", DEFAULT_LIMIT)?;
        if limit == 0 {
            return Err(anyhow::anyhow!("配置 LIMIT 解析失败: 必须为正整数"));
        }

        Ok(Config {
            source: SourceConfig {
                api_url: optional_var(&lookup, "COINSTATS_API_URL"),
                api_key: optional_var(&lookup, "COINSTATS_API_KEY"),
                limit,
            },
            destination: DestinationConfig {
                base_url: optional_var(&lookup, "SUPABASE_URL"),
                anon_key: optional_var(&lookup, "SUPABASE_API_KEY"),
                service_role_key: optional_var(&lookup, "SUPABASE_SERVICE_ROLE_KEY"),
                table: var_or_default(&lookup, "SUPABASE_TABLE", DEFAULT_TABLE.to_string())?,
            },
            sync: SyncConfig {
                batch_size: var_or_default(&lookup, "BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
                http_timeout_secs: var_or_default(
                    &lookup,
                    "HTTP_TIMEOUT_SECS",
                    DEFAULT_HTTP_TIMEOUT_SECS,
                )?,
            },
            logging: LoggingConfig {
                file: var_or_default(&lookup, "LOG_FILE", DEFAULT_LOG_FILE.to_string())?,
            },
        })
    }

    pub fn from_map(vars: &HashMap<String, String>) -> anyhow::Result<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.sync.http_timeout_secs)
    }

    /// 打印生效配置，密钥做掩码处理
    pub fn log_summary(&self) {
        tracing::info!("COINSTATS_API_URL: {}", display_opt(&self.source.api_url));
        tracing::info!("COINSTATS_API_KEY: {}", mask_secret(&self.source.api_key));
        tracing::info!("SUPABASE_URL: {}", display_opt(&self.destination.base_url));
        tracing::info!("SUPABASE_API_KEY: {}", mask_secret(&self.destination.anon_key));
        tracing::info!(
            "SUPABASE_SERVICE_ROLE_KEY: {}",
            mask_secret(&self.destination.service_role_key)
        );
        tracing::info!("SUPABASE_TABLE: {}", self.destination.table);
        tracing::info!("LIMIT: {}", self.source.limit);
        tracing::info!("BATCH_SIZE: {}", self.sync.batch_size);
    }
}

fn display_opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<unset>")
}

/// 只保留前4位，其余替换为 *
pub fn mask_secret(value: &Option<String>) -> String {
    match value.as_deref() {
        None => "<unset>".to_string(),
        Some(v) if v.chars().count() <= 4 => "****".to_string(),
        Some(v) => {
            let prefix: String = v.chars().take(4).collect();
            format!("{}****", prefix)
        }
    }
}

// 空字符串视为未设置
fn optional_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn var_or_default<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_var(lookup, key) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("配置 {} 解析失败: {}", key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_map(&HashMap::new()).unwrap();

        assert_eq!(config.source.api_url, None);
        assert_eq!(config.source.api_key, None);
        assert_eq!(config.source.limit, 1000);
        assert_eq!(config.destination.table, "crypto_coins");
        assert_eq!(config.sync.batch_size, 100);
        assert_eq!(config.logging.file, "coinstats_supabase.log");
    }

    #[test]
    fn test_reads_values_by_name() {
        let config = Config::from_map(&vars(&[
            ("COINSTATS_API_URL", "https://openapiv1.coinstats.app/coins"),
            ("COINSTATS_API_KEY", "abc"),
            ("SUPABASE_URL", "https://xyz.supabase.co"),
            ("SUPABASE_API_KEY", "anon"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("SUPABASE_TABLE", "coins"),
            ("LIMIT", "250"),
        ]))
        .unwrap();

        assert_eq!(
            config.source.api_url.as_deref(),
            Some("https://openapiv1.coinstats.app/coins")
        );
        assert_eq!(config.source.limit, 250);
        assert_eq!(config.destination.anon_key.as_deref(), Some("anon"));
        assert_eq!(config.destination.service_role_key.as_deref(), Some("service"));
        assert_eq!(config.destination.table, "coins");
    }

    #[test]
    fn test_invalid_limit_is_rejected() {
        let err = Config::from_map(&vars(&[("LIMIT", "lots")])).unwrap_err();
        assert!(err.to_string().contains("LIMIT"));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let err = Config::from_map(&vars(&[("LIMIT", "0")])).unwrap_err();
        assert!(err.to_string().contains("配置 LIMIT 解析失败"));
    }

    #[test]
    fn test_empty_value_is_unset() {
        let config = Config::from_map(&vars(&[("COINSTATS_API_KEY", "  ")])).unwrap();
        assert_eq!(config.source.api_key, None);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(&None), "<unset>");
        assert_eq!(mask_secret(&Some("abc".to_string())), "****");
        assert_eq!(mask_secret(&Some("secret-key".to_string())), "secr****");
    }
}
