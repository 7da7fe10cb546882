// ==========================================
// 设备停机 OEE 分析引擎 - 效率指标与洞察
// ==========================================

use crate::domain::types::InsightKind;
use serde::{Deserialize, Serialize};

// ==========================================
// MachineMetrics - 单机效率指标
// ==========================================
// 四项百分比均裁剪到 [0, 100] 并保留一位小数
// MTBF 保留一位小数（小时），MTTR 取整（分钟）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineMetrics {
    // ===== 标识 =====
    pub machine_id: String,
    pub machine_name: String,

    // ===== 当班时间核算 =====
    pub planned_time_ms: i64,   // 计划生产时间（当班已过工作时长）
    pub downtime_today_ms: i64, // 当日停机（累计 + 进行中）
    pub run_time_ms: i64,       // 运行时间
    pub is_stopped: bool,

    // ===== 长窗口可靠性 =====
    pub failure_count: u32,
    pub mtbf_hours: f64,
    pub mttr_minutes: f64,

    // ===== OEE =====
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

// ==========================================
// FleetSummary - 全厂汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub machine_count: usize,
    pub stopped_count: usize,
    pub total_downtime_today_ms: i64,
    pub average_availability: f64,
    pub average_performance: f64,
    pub average_quality: f64,
    pub average_oee: f64,
}

// ==========================================
// Insight - 文字洞察
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}
