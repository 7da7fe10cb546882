// ==========================================
// 设备停机 OEE 分析引擎 - 班次工作时间配置
// ==========================================
// 墙钟时刻（不含日期）
// 未启用时，任意时刻都计为工作时间
// ==========================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ==========================================
// WorkHoursConfig - 班次配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHoursConfig {
    pub enabled: bool,
    #[serde(with = "hhmm")]
    pub shift_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub shift_end: NaiveTime,
}

impl Default for WorkHoursConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            shift_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            shift_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl WorkHoursConfig {
    /// 构造启用状态的班次
    pub fn shift(shift_start: NaiveTime, shift_end: NaiveTime) -> Self {
        Self {
            enabled: true,
            shift_start,
            shift_end,
        }
    }

    /// 全天计时（未启用班次）
    pub fn always() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// 班次时长为零或为负
    pub fn is_invalid(&self) -> bool {
        self.enabled && self.shift_end <= self.shift_start
    }

    /// 实际生效的班次窗口
    ///
    /// # 返回
    /// - Some((start, end)): 启用且合法
    /// - None: 未启用，或配置非法（按全天计时降级）
    pub fn effective_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if !self.enabled || self.is_invalid() {
            return None;
        }
        Some((self.shift_start, self.shift_end))
    }
}

// ==========================================
// "HH:MM" / "HH:MM:SS" 序列化
// ==========================================
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("无效的时刻: {} (期望 HH:MM 或 HH:MM:SS)", raw))
        })
    }
}

/// 解析墙钟时刻 ("08:00" 或 "08:00:00")
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}
