// 应用配置
// 默认值对应线上环境，可通过环境变量覆盖

use std::time::Duration;
use url::Url;

pub const DEFAULT_SITE_URL: &str = "https://open.musifly.net/";
pub const DEFAULT_OFFLINE_URL: &str = "tauri://localhost/offline.html";
pub const DEFAULT_CONNECTIVITY_ADDR: &str = "open.musifly.net:443";
pub const DEFAULT_DEEP_LINK_SCHEME: &str = "musifly";

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid URL for {key}: {value} ({reason})")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// 更新窗口的延迟配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// 已是最新版本时，显示主窗口前的等待时间
    pub up_to_date_delay: Duration,
    /// 检查或安装失败时，显示主窗口前的等待时间
    pub failure_delay: Duration,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            up_to_date_delay: Duration::from_millis(1000),
            failure_delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site_url: Url,
    pub offline_url: Url,
    /// 连通性探测地址 (host:port)
    pub connectivity_addr: String,
    pub connectivity_timeout: Duration,
    pub deep_link_scheme: String,
    pub updater: UpdaterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_url: Url::parse(DEFAULT_SITE_URL).expect("default site url is valid"),
            offline_url: Url::parse(DEFAULT_OFFLINE_URL).expect("default offline url is valid"),
            connectivity_addr: DEFAULT_CONNECTIVITY_ADDR.to_string(),
            connectivity_timeout: Duration::from_secs(3),
            deep_link_scheme: DEFAULT_DEEP_LINK_SCHEME.to_string(),
            updater: UpdaterConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意键值查找函数加载配置，未设置的键使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("MUSIFLY_SITE_URL") {
            config.site_url = parse_url("MUSIFLY_SITE_URL", value)?;
        }
        if let Some(value) = lookup("MUSIFLY_OFFLINE_URL") {
            config.offline_url = parse_url("MUSIFLY_OFFLINE_URL", value)?;
        }
        if let Some(value) = lookup("MUSIFLY_CONNECTIVITY_ADDR") {
            config.connectivity_addr = value;
        }
        if let Some(value) = lookup("MUSIFLY_DEEP_LINK_SCHEME") {
            config.deep_link_scheme = value;
        }

        Ok(config)
    }

    /// 加载失败时记录日志并回退到默认配置
    pub fn load_or_default() -> Self {
        match Self::from_env() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid configuration: {}", e);
                Self::default()
            }
        }
    }
}

fn parse_url(key: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(&value).map_err(|e| ConfigError::InvalidUrl {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_live_site() {
        let config = AppConfig::default();
        assert_eq!(config.site_url.as_str(), "https://open.musifly.net/");
        assert_eq!(config.offline_url.as_str(), "tauri://localhost/offline.html");
        assert_eq!(config.connectivity_addr, "open.musifly.net:443");
        assert_eq!(config.connectivity_timeout, Duration::from_secs(3));
        assert_eq!(config.updater.up_to_date_delay, Duration::from_millis(1000));
        assert_eq!(config.updater.failure_delay, Duration::from_millis(1500));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MUSIFLY_SITE_URL", "https://staging.musifly.net/"),
            ("MUSIFLY_CONNECTIVITY_ADDR", "staging.musifly.net:443"),
            ("MUSIFLY_DEEP_LINK_SCHEME", "musifly-dev"),
        ]))
        .unwrap();

        assert_eq!(config.site_url.as_str(), "https://staging.musifly.net/");
        assert_eq!(config.connectivity_addr, "staging.musifly.net:443");
        assert_eq!(config.deep_link_scheme, "musifly-dev");
        assert_eq!(config.offline_url.as_str(), DEFAULT_OFFLINE_URL);
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("MUSIFLY_SITE_URL", "not a url")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidUrl { key, value, .. } => {
                assert_eq!(key, "MUSIFLY_SITE_URL");
                assert_eq!(value, "not a url");
            }
        }
    }
}
