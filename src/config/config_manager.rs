// ==========================================
// 设备停机 OEE 分析引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 扁平 key-value (JSON 文件 / 内存 / 环境变量覆写)
// 红线: 配置错误只降级为默认值，不中断计算
// ==========================================

use crate::domain::types::AnalysisWindow;
use crate::domain::downtime::UNKNOWN_REASON;
use crate::domain::machine::DEFAULT_CYCLE_TIME_SECONDS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    /// 全厂平均 OEE 告警阈值 (%)
    pub const FLEET_OEE_ALERT_PCT: &str = "insight.fleet_oee_alert_pct";
    /// 单机 OEE 告警阈值 (%)
    pub const WORST_MACHINE_OEE_ALERT_PCT: &str = "insight.worst_machine_oee_alert_pct";
    /// MTBF/MTTR 统计窗口 (天)
    pub const RELIABILITY_WINDOW_DAYS: &str = "metrics.reliability_window_days";
    /// 节拍缺省值 (秒)
    pub const DEFAULT_CYCLE_TIME_SECONDS: &str = "metrics.default_cycle_time_seconds";
    /// 帕累托分析窗口
    pub const PARETO_WINDOW: &str = "pareto.window";
    /// 缺失停机原因标签
    pub const UNKNOWN_REASON_LABEL: &str = "pareto.unknown_reason_label";

    pub const ALL: [&str; 6] = [
        FLEET_OEE_ALERT_PCT,
        WORST_MACHINE_OEE_ALERT_PCT,
        RELIABILITY_WINDOW_DAYS,
        DEFAULT_CYCLE_TIME_SECONDS,
        PARETO_WINDOW,
        UNKNOWN_REASON_LABEL,
    ];
}

/// 环境变量覆写前缀
pub const ENV_PREFIX: &str = "DOWNTIME_OEE_";

/// 可靠性窗口上限（天）
pub const MAX_RELIABILITY_WINDOW_DAYS: u32 = 36_500;

// ==========================================
// ConfigError - 配置层错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置文件格式错误 (期望 JSON 对象): {0}")]
    NotAnObject(String),
}

// ==========================================
// AnalyticsConfig - 引擎参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub fleet_oee_alert_pct: f64,
    pub worst_machine_oee_alert_pct: f64,
    pub reliability_window_days: u32,
    pub default_cycle_time_seconds: f64,
    pub pareto_window: AnalysisWindow,
    pub unknown_reason_label: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            fleet_oee_alert_pct: 60.0,
            worst_machine_oee_alert_pct: 70.0,
            reliability_window_days: 30,
            default_cycle_time_seconds: DEFAULT_CYCLE_TIME_SECONDS,
            pareto_window: AnalysisWindow::Last24Hours,
            unknown_reason_label: UNKNOWN_REASON.to_string(),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 空配置（全部使用默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 key-value 映射创建
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// 从 JSON 对象文件创建
    ///
    /// 值可以是字符串、数字或布尔，统一按字符串保存。
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let json: serde_json::Value = serde_json::from_str(&raw)?;

        let object = json
            .as_object()
            .ok_or_else(|| ConfigError::NotAnObject(path.display().to_string()))?;

        let values = object
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => {
                        warn!(key = %key, "配置值类型不支持，忽略");
                        return None;
                    }
                };
                Some((key.clone(), text))
            })
            .collect();

        debug!(path = %path.display(), "配置文件加载完成");
        Ok(Self { values })
    }

    /// 应用环境变量覆写 (DOWNTIME_OEE_<KEY>)
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(std::env::vars())
    }

    /// 应用覆写来源（环境变量形式的名称）
    pub fn with_overrides_from<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env_names: HashMap<String, &'static str> = config_keys::ALL
            .iter()
            .map(|key| (env_var_name(key), *key))
            .collect();

        for (name, value) in vars {
            if let Some(key) = env_names.get(&name) {
                debug!(key = %key, "环境变量覆写配置");
                self.values.insert((*key).to_string(), value);
            }
        }
        self
    }

    /// 设置单个配置值
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 解析为引擎参数（非法值降级为默认值）
    pub fn load(&self) -> AnalyticsConfig {
        let defaults = AnalyticsConfig::default();

        AnalyticsConfig {
            fleet_oee_alert_pct: self.percent_or(
                config_keys::FLEET_OEE_ALERT_PCT,
                defaults.fleet_oee_alert_pct,
            ),
            worst_machine_oee_alert_pct: self.percent_or(
                config_keys::WORST_MACHINE_OEE_ALERT_PCT,
                defaults.worst_machine_oee_alert_pct,
            ),
            reliability_window_days: self.parse_or(
                config_keys::RELIABILITY_WINDOW_DAYS,
                defaults.reliability_window_days,
                |s| {
                    s.parse::<u32>()
                        .ok()
                        .filter(|d| (1..=MAX_RELIABILITY_WINDOW_DAYS).contains(d))
                },
            ),
            default_cycle_time_seconds: self.parse_or(
                config_keys::DEFAULT_CYCLE_TIME_SECONDS,
                defaults.default_cycle_time_seconds,
                |s| s.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0),
            ),
            pareto_window: self.parse_or(
                config_keys::PARETO_WINDOW,
                defaults.pareto_window,
                AnalysisWindow::from_str,
            ),
            unknown_reason_label: self.parse_or(
                config_keys::UNKNOWN_REASON_LABEL,
                defaults.unknown_reason_label,
                |s| Some(s.to_string()).filter(|label| !label.is_empty()),
            ),
        }
    }

    fn percent_or(&self, key: &str, default: f64) -> f64 {
        self.parse_or(key, default, |s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && (0.0..=100.0).contains(v))
        })
    }

    fn parse_or<T, F>(&self, key: &str, default: T, parse: F) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => match parse(raw.trim()) {
                Some(value) => value,
                None => {
                    warn!(key = %key, value = %raw, "配置值非法，使用默认值");
                    default
                }
            },
        }
    }
}

/// 配置键对应的环境变量名: pareto.window → DOWNTIME_OEE_PARETO_WINDOW
pub fn env_var_name(key: &str) -> String {
    format!("{}{}", ENV_PREFIX, key.to_uppercase().replace('.', "_"))
}
