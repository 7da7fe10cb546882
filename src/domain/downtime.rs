// ==========================================
// 设备停机 OEE 分析引擎 - 停机区间与帕累托条目
// ==========================================
// 派生实体: 每次调用重新计算，不缓存
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 缺失停机原因时的归类标签
pub const UNKNOWN_REASON: &str = "Unknown";

// ==========================================
// DowntimeInterval - 停机区间
// ==========================================
// duration_ms 的口径取决于区间来源:
// - 已关闭区间: 墙钟原始时长（长窗口可靠性统计）
// - 进行中区间: 班次裁剪后的工作时长（当班核算）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DowntimeInterval {
    pub machine_id: String,
    pub reason: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime, // 进行中区间为查询时刻（临时终点）
    pub duration_ms: i64,
    pub open: bool, // true = 尚未被 RUNNING 事件关闭
}

// ==========================================
// ParetoItem - 停机原因帕累托条目
// ==========================================
// 按 total_duration_ms 降序排列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoItem {
    pub reason: String,
    pub count: u32,
    pub total_duration_ms: i64,
    pub percentage: f64,         // 单项占比 (%，一位小数)
    pub cumulative_percent: u32, // 累计占比 (%，对累计值四舍五入)
}
