// ==========================================
// 设备停机 OEE 分析引擎 - 领域类型定义
// ==========================================
// 状态、周期单位、分析窗口、洞察类型
// 序列化格式: SCREAMING_SNAKE_CASE (与事件日志存储一致)
// ==========================================

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 设备运行状态 (Machine Status)
// ==========================================
// 两值枚举: 运行 / 停机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    Running, // 运行
    Stopped, // 停机
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineStatus::Running => write!(f, "RUNNING"),
            MachineStatus::Stopped => write!(f, "STOPPED"),
        }
    }
}

impl MachineStatus {
    /// 从字符串解析状态（兼容小写与常见别名）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "RUNNING" | "RUN" | "ON" => Some(MachineStatus::Running),
            "STOPPED" | "STOP" | "OFF" => Some(MachineStatus::Stopped),
            _ => None,
        }
    }
}

// ==========================================
// 设备状态 (Machine State)
// ==========================================
// 停机原因只与 Stopped 成对出现
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineState {
    Running,
    Stopped {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl MachineState {
    /// 构造带原因的停机状态
    pub fn stopped(reason: impl Into<String>) -> Self {
        MachineState::Stopped {
            reason: Some(reason.into()),
        }
    }

    pub fn status(&self) -> MachineStatus {
        match self {
            MachineState::Running => MachineStatus::Running,
            MachineState::Stopped { .. } => MachineStatus::Stopped,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, MachineState::Stopped { .. })
    }

    /// 停机原因（运行中为 None）
    pub fn reason(&self) -> Option<&str> {
        match self {
            MachineState::Running => None,
            MachineState::Stopped { reason } => reason.as_deref(),
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineState::Running => write!(f, "RUNNING"),
            MachineState::Stopped { reason: Some(r) } => write!(f, "STOPPED({})", r),
            MachineState::Stopped { reason: None } => write!(f, "STOPPED"),
        }
    }
}

// ==========================================
// 节拍时间单位 (Cycle Time Unit)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleTimeUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl CycleTimeUnit {
    /// 每单位对应的秒数
    pub fn seconds_per_unit(&self) -> f64 {
        match self {
            CycleTimeUnit::Seconds => 1.0,
            CycleTimeUnit::Minutes => 60.0,
            CycleTimeUnit::Hours => 3600.0,
        }
    }
}

impl fmt::Display for CycleTimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleTimeUnit::Seconds => write!(f, "SECONDS"),
            CycleTimeUnit::Minutes => write!(f, "MINUTES"),
            CycleTimeUnit::Hours => write!(f, "HOURS"),
        }
    }
}

// ==========================================
// 分析窗口 (Analysis Window)
// ==========================================
// 映射为区间重建的时间下界
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisWindow {
    Today,       // 当日零点起
    Last24Hours, // 最近 24 小时
    Last7Days,   // 最近 7 天
    Last30Days,  // 最近 30 天
    All,         // 不设下界
}

impl AnalysisWindow {
    /// 计算窗口下界
    ///
    /// # 参数
    /// - `now`: 当前时刻
    ///
    /// # 返回
    /// - Some(instant): 早于该时刻的事件被丢弃
    /// - None: 全量
    pub fn lower_bound(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            AnalysisWindow::Today => Some(now.date().and_time(NaiveTime::MIN)),
            AnalysisWindow::Last24Hours => now.checked_sub_signed(Duration::hours(24)),
            AnalysisWindow::Last7Days => now.checked_sub_signed(Duration::days(7)),
            AnalysisWindow::Last30Days => now.checked_sub_signed(Duration::days(30)),
            AnalysisWindow::All => None,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TODAY" => Some(AnalysisWindow::Today),
            "LAST_24_HOURS" | "24H" => Some(AnalysisWindow::Last24Hours),
            "LAST_7_DAYS" | "7D" => Some(AnalysisWindow::Last7Days),
            "LAST_30_DAYS" | "30D" => Some(AnalysisWindow::Last30Days),
            "ALL" => Some(AnalysisWindow::All),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            AnalysisWindow::Today => "TODAY",
            AnalysisWindow::Last24Hours => "LAST_24_HOURS",
            AnalysisWindow::Last7Days => "LAST_7_DAYS",
            AnalysisWindow::Last30Days => "LAST_30_DAYS",
            AnalysisWindow::All => "ALL",
        }
    }
}

impl fmt::Display for AnalysisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 洞察类型 (Insight Kind)
// ==========================================
// 输出顺序固定: FleetOeeLow -> WorstMachine -> TopCause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightKind {
    FleetOeeLow,  // 全厂平均 OEE 偏低
    WorstMachine, // 表现最差设备
    TopCause,     // 首要停机原因
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightKind::FleetOeeLow => write!(f, "FLEET_OEE_LOW"),
            InsightKind::WorstMachine => write!(f, "WORST_MACHINE"),
            InsightKind::TopCause => write!(f, "TOP_CAUSE"),
        }
    }
}
