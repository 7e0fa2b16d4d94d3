//! # Locator Configuration
//!
//! 환경 변수 기반 로케이터 설정입니다.
//!
//! | 변수 | 기본값 | 설명 |
//! |------|--------|------|
//! | `ENVIRONMENT` | `production` | 실행 환경 (로그 기본 필터 결정) |
//! | `LOCATOR_GLOBAL_NAME` | `ServiceLocator Global` | on-demand 생성되는 글로벌 오브젝트 이름 |
//! | `LOCATOR_SCENE_NAME` | `Service Locator Scene` | 씬 로케이터 오브젝트 이름 |
//! | `LOCATOR_PERSIST_GLOBAL` | `true` | on-demand 글로벌을 씬 전환에도 유지할지 여부 |

use std::env;

use log::warn;
use once_cell::sync::Lazy;

pub const DEFAULT_GLOBAL_NAME: &str = "ServiceLocator Global";
pub const DEFAULT_SCENE_NAME: &str = "Service Locator Scene";

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// `RUST_LOG`이 없을 때 사용할 로그 필터
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development | Environment::Test => "debug",
            Environment::Staging => "info",
            Environment::Production => "warn",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    pub global_name: String,
    pub scene_name: String,
    pub persist_global: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            global_name: DEFAULT_GLOBAL_NAME.to_string(),
            scene_name: DEFAULT_SCENE_NAME.to_string(),
            persist_global: true,
        }
    }
}

impl LocatorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키 조회 함수로 설정을 만듭니다.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let global_name = lookup("LOCATOR_GLOBAL_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.global_name);

        let scene_name = lookup("LOCATOR_SCENE_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.scene_name);

        let persist_global = match lookup("LOCATOR_PERSIST_GLOBAL") {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warn!(
                    "LOCATOR_PERSIST_GLOBAL 파싱 실패: {}. 기본값 {} 사용",
                    raw, defaults.persist_global
                );
                defaults.persist_global
            }),
            None => defaults.persist_global,
        };

        Self {
            global_name,
            scene_name,
            persist_global,
        }
    }

    /// 프로세스 환경에서 한 번만 읽어오는 기본 설정
    pub fn process_default() -> &'static LocatorConfig {
        &PROCESS_DEFAULT
    }
}

static PROCESS_DEFAULT: Lazy<LocatorConfig> = Lazy::new(LocatorConfig::from_env);

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
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
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("TEST"), Environment::Test);
        assert_eq!(Environment::from_str("stage"), Environment::Staging);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_default_log_filter_for_each_environment() {
        assert_eq!(Environment::Development.default_log_filter(), "debug");
        assert_eq!(Environment::Test.default_log_filter(), "debug");
        assert_eq!(Environment::Staging.default_log_filter(), "info");
        assert_eq!(Environment::Production.default_log_filter(), "warn");
    }

    #[test]
    fn test_config_defaults() {
        let config = LocatorConfig::from_lookup(|_| None);

        assert_eq!(config, LocatorConfig::default());
        assert_eq!(config.global_name, "ServiceLocator Global");
        assert_eq!(config.scene_name, "Service Locator Scene");
        assert!(config.persist_global);
    }

    #[test]
    fn test_config_overrides() {
        let config = LocatorConfig::from_lookup(lookup_from(&[
            ("LOCATOR_GLOBAL_NAME", "Root Services"),
            ("LOCATOR_SCENE_NAME", "Level Services"),
            ("LOCATOR_PERSIST_GLOBAL", "off"),
        ]));

        assert_eq!(config.global_name, "Root Services");
        assert_eq!(config.scene_name, "Level Services");
        assert!(!config.persist_global);
    }

    #[test]
    fn test_process_default_is_built_once() {
        let first = LocatorConfig::process_default();
        let second = LocatorConfig::process_default();

        assert!(std::ptr::eq(first, second));
        assert!(!first.global_name.trim().is_empty());
        assert!(!first.scene_name.trim().is_empty());
    }

    #[test]
    fn test_config_invalid_values_fall_back() {
        let config = LocatorConfig::from_lookup(lookup_from(&[
            ("LOCATOR_GLOBAL_NAME", "   "),
            ("LOCATOR_PERSIST_GLOBAL", "maybe"),
        ]));

        assert_eq!(config.global_name, DEFAULT_GLOBAL_NAME);
        assert!(config.persist_global);
    }
}
