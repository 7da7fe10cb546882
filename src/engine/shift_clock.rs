// ==========================================
// 设备停机 OEE 分析引擎 - 班次时钟
// ==========================================
// 职责: 回答"一段时间中有多少落在班次内"以及"今天已过多少工作时间"
// 输入: 时间区间 + 班次配置 + 显式 now
// 输出: 毫秒数
// ==========================================
// 红线: 纯函数，不读取系统时钟
// ==========================================

use crate::domain::work_hours::WorkHoursConfig;
use chrono::{NaiveDateTime, NaiveTime};

/// 区间 `[start, end)` 落在班次内的工作时长（毫秒）
///
/// 跨零点或跨多日的区间按自然日逐日求与 `[shift_start, shift_end]` 的交集再求和。
///
/// # 参数
/// - `start`: 起点
/// - `end`: 终点
/// - `config`: 班次配置（未启用或非法时按墙钟时长计）
///
/// # 返回
/// 工作时长毫秒数；`end <= start` 时为 0
pub fn working_ms_between(start: NaiveDateTime, end: NaiveDateTime, config: &WorkHoursConfig) -> i64 {
    if end <= start {
        return 0;
    }

    let (shift_start, shift_end) = match config.effective_window() {
        Some(window) => window,
        None => return (end - start).num_milliseconds(),
    };

    let mut total_ms = 0i64;
    let mut day = start.date();
    let last_day = end.date();

    while day <= last_day {
        let window_start = day.and_time(shift_start);
        let window_end = day.and_time(shift_end);

        let overlap_start = start.max(window_start);
        let overlap_end = end.min(window_end);
        if overlap_end > overlap_start {
            total_ms += (overlap_end - overlap_start).num_milliseconds();
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    total_ms
}

/// 今日班次已过的工作时长（毫秒）
///
/// - 班次启用: 从今日班次开始到 now（超过下班时刻后不再增长）；now 早于上班时刻为 0
/// - 班次未启用: 从今日零点到 now
pub fn elapsed_shift_time_today(config: &WorkHoursConfig, now: NaiveDateTime) -> i64 {
    match config.effective_window() {
        None => {
            let midnight = now.date().and_time(NaiveTime::MIN);
            (now - midnight).num_milliseconds()
        }
        Some((shift_start, _)) => {
            let today_start = now.date().and_time(shift_start);
            if now <= today_start {
                return 0;
            }
            working_ms_between(today_start, now, config)
        }
    }
}

/// 进行中停机的工作时长
///
/// 等价于 `working_ms_between(opened_at, now, config)`。
/// 既用于给进行中的停机计价，也用于停机关闭时回填累计停机。
pub fn active_downtime(opened_at: NaiveDateTime, config: &WorkHoursConfig, now: NaiveDateTime) -> i64 {
    working_ms_between(opened_at, now, config)
}

/// 停机关闭时的累计停机回填值
///
/// 引擎本身不调用；负责状态变更的调用方在持久化前使用。
///
/// # 参数
/// - `accumulated_ms`: 当前累计停机
/// - `opened_at`: 停机开始时刻
/// - `closed_at`: 恢复运行时刻
pub fn consolidate_downtime(
    accumulated_ms: i64,
    opened_at: NaiveDateTime,
    closed_at: NaiveDateTime,
    config: &WorkHoursConfig,
) -> i64 {
    accumulated_ms.max(0) + active_downtime(opened_at, config, closed_at)
}
