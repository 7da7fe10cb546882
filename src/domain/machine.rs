// ==========================================
// 设备停机 OEE 分析引擎 - 设备与状态事件
// ==========================================
// 外部实体: 由持久化协作方提供，引擎只读
// ==========================================

use crate::domain::types::{CycleTimeUnit, MachineState, MachineStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 节拍时间缺省值（秒），用于配置缺失或非法的设备
pub const DEFAULT_CYCLE_TIME_SECONDS: f64 = 30.0;

// ==========================================
// Machine - 设备快照
// ==========================================
// 红线: accumulated_downtime_ms 只包含已关闭的停机
//       进行中的停机时长在关闭前不会计入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    // ===== 标识 =====
    pub id: String,   // 设备ID
    pub name: String, // 显示名称

    // ===== 当前状态 =====
    pub state: MachineState,              // 运行/停机 (+停机原因)
    pub last_status_change: NaiveDateTime, // 最近一次状态变更时刻

    // ===== 当日累计 =====
    #[serde(default)]
    pub accumulated_downtime_ms: i64, // 当日已关闭停机累计 (外部每日清零)

    // ===== 产量 =====
    #[serde(default)]
    pub production_count: u64, // 良品数
    #[serde(default)]
    pub scrap_count: u64, // 废品数

    // ===== 节拍 =====
    #[serde(default)]
    pub cycle_time: f64,
    #[serde(default)]
    pub cycle_time_unit: CycleTimeUnit,
}

impl Machine {
    pub fn status(&self) -> MachineStatus {
        self.state.status()
    }

    pub fn is_stopped(&self) -> bool {
        self.state.is_stopped()
    }

    /// 节拍时间换算为秒
    ///
    /// # 参数
    /// - `fallback_seconds`: 节拍为零/负数/非有限值时的替代值
    ///
    /// # 返回
    /// 节拍秒数（恒为正，除非 fallback 本身非法）
    pub fn cycle_time_seconds(&self, fallback_seconds: f64) -> f64 {
        let seconds = self.cycle_time * self.cycle_time_unit.seconds_per_unit();
        if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            fallback_seconds
        }
    }

    /// 总产出 = 良品 + 废品
    pub fn total_produced(&self) -> u64 {
        self.production_count.saturating_add(self.scrap_count)
    }
}

// ==========================================
// StatusChangeEvent - 状态变更事件
// ==========================================
// 追加写日志，存储顺序不保证有序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub machine_id: String,
    pub previous_status: MachineStatus,
    pub new_state: MachineState,
    pub timestamp: NaiveDateTime,

    /// 真实性签名（不透明，引擎不解析）
    #[serde(default)]
    pub signature: Option<String>,
}

impl StatusChangeEvent {
    pub fn new_status(&self) -> MachineStatus {
        self.new_state.status()
    }
}
