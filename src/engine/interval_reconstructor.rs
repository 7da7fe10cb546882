// ==========================================
// 设备停机 OEE 分析引擎 - 停机区间重建
// ==========================================
// 职责: 回放状态事件日志 + 设备快照，重建停机区间
// 输入: 事件日志(无序) + 设备快照 + 班次配置 + 可选时间下界 + now
// 输出: 已关闭区间 + 进行中区间
// ==========================================
// 红线: 已关闭区间用墙钟原始时长（MTBF/MTTR 口径）
//       进行中区间用班次裁剪时长（当班 OEE 口径）
//       两种口径必须分开计算，不可合并
// ==========================================

use crate::domain::downtime::DowntimeInterval;
use crate::domain::machine::{Machine, StatusChangeEvent};
use crate::domain::types::MachineStatus;
use crate::domain::work_hours::WorkHoursConfig;
use crate::engine::shift_clock;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

// ==========================================
// Reconstruction - 重建结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub intervals: Vec<DowntimeInterval>,
    pub events_considered: usize, // 下界过滤后参与回放的事件数
    pub double_stops: u32,        // 未关闭即再次停机（前一次被覆盖丢弃）
    pub orphan_resumes: u32,      // 无对应停机的恢复事件
}

impl Reconstruction {
    /// 指定设备的区间
    pub fn intervals_for<'a>(&'a self, machine_id: &'a str) -> impl Iterator<Item = &'a DowntimeInterval> + 'a {
        self.intervals.iter().filter(move |i| i.machine_id == machine_id)
    }

    /// 进行中区间
    pub fn open_intervals(&self) -> impl Iterator<Item = &DowntimeInterval> {
        self.intervals.iter().filter(|i| i.open)
    }
}

/// 每台设备至多一条未关闭停机
struct OpenStoppage<'a> {
    start: NaiveDateTime,
    reason: Option<&'a str>,
}

// ==========================================
// IntervalReconstructor - 区间重建器
// ==========================================
pub struct IntervalReconstructor {
    unknown_reason_label: String,
}

impl IntervalReconstructor {
    /// 构造函数
    ///
    /// # 参数
    /// - `unknown_reason_label`: 停机事件缺失原因时使用的标签
    pub fn new(unknown_reason_label: impl Into<String>) -> Self {
        Self {
            unknown_reason_label: unknown_reason_label.into(),
        }
    }

    /// 重建停机区间
    ///
    /// # 参数
    /// - `events`: 状态变更事件（任意顺序，可含已不存在的设备）
    /// - `machines`: 当前设备快照
    /// - `work_hours`: 班次配置（仅用于进行中区间）
    /// - `since`: 可选时间下界，早于该时刻的事件被丢弃
    /// - `now`: 查询时刻，进行中区间的临时终点
    ///
    /// # 返回
    /// Reconstruction: 已关闭区间按回放顺序，随后是按快照顺序的进行中区间
    ///
    /// 不在快照中的设备: 无原因的已关闭区间不输出
    pub fn reconstruct(
        &self,
        events: &[StatusChangeEvent],
        machines: &[Machine],
        work_hours: &WorkHoursConfig,
        since: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Reconstruction {
        // 1. 下界过滤 + 升序排序
        let mut ordered: Vec<&StatusChangeEvent> = events
            .iter()
            .filter(|e| since.map_or(true, |bound| e.timestamp >= bound))
            .collect();
        ordered.sort_by(|a, b| compare_events(a, b));

        let mut result = Reconstruction {
            events_considered: ordered.len(),
            ..Reconstruction::default()
        };

        // 2. 回放
        let tracked: HashSet<&str> = machines.iter().map(|m| m.id.as_str()).collect();
        let mut open: HashMap<&str, OpenStoppage<'_>> = HashMap::new();

        for event in ordered {
            match event.new_status() {
                MachineStatus::Stopped => {
                    let previous = open.insert(
                        event.machine_id.as_str(),
                        OpenStoppage {
                            start: event.timestamp,
                            reason: event.new_state.reason(),
                        },
                    );
                    if let Some(dropped) = previous {
                        result.double_stops += 1;
                        warn!(
                            machine_id = %event.machine_id,
                            dropped_start = %dropped.start,
                            new_start = %event.timestamp,
                            "连续停机事件未被恢复事件关闭，前一次停机被覆盖"
                        );
                    }
                }
                MachineStatus::Running => match open.remove(event.machine_id.as_str()) {
                    Some(stoppage)
                        if !has_reason(stoppage.reason)
                            && !tracked.contains(event.machine_id.as_str()) =>
                    {
                        debug!(
                            machine_id = %event.machine_id,
                            start = %stoppage.start,
                            "设备不在快照中且停机无原因，跳过"
                        );
                    }
                    Some(stoppage) => {
                        // 历史区间: 墙钟原始时长，不做班次裁剪
                        let duration_ms = (event.timestamp - stoppage.start).num_milliseconds();
                        result.intervals.push(DowntimeInterval {
                            machine_id: event.machine_id.clone(),
                            reason: self.label(stoppage.reason),
                            start: stoppage.start,
                            end: event.timestamp,
                            duration_ms,
                            open: false,
                        });
                    }
                    None => {
                        result.orphan_resumes += 1;
                        debug!(
                            machine_id = %event.machine_id,
                            timestamp = %event.timestamp,
                            "恢复事件无对应停机，忽略"
                        );
                    }
                },
            }
        }

        // 3. 进行中区间: 快照仍为停机且存在未关闭记录
        for machine in machines {
            if !machine.is_stopped() {
                continue;
            }
            let Some(stoppage) = open.remove(machine.id.as_str()) else {
                continue;
            };

            let duration_ms = shift_clock::active_downtime(stoppage.start, work_hours, now);
            result.intervals.push(DowntimeInterval {
                machine_id: machine.id.clone(),
                reason: self.label(stoppage.reason),
                start: stoppage.start,
                end: now.max(stoppage.start),
                duration_ms,
                open: true,
            });
        }

        debug!(
            events_considered = result.events_considered,
            intervals = result.intervals.len(),
            double_stops = result.double_stops,
            orphan_resumes = result.orphan_resumes,
            "停机区间重建完成"
        );

        result
    }

    /// 原因原样保留（区分大小写与空白），仅空白原因替换为标签
    fn label(&self, reason: Option<&str>) -> String {
        match reason {
            Some(r) if has_reason(Some(r)) => r.to_string(),
            _ => self.unknown_reason_label.clone(),
        }
    }
}

fn has_reason(reason: Option<&str>) -> bool {
    reason.map_or(false, |r| !r.trim().is_empty())
}

/// 事件全序: 时间戳 → 设备 → 同刻先停机后恢复 → 原因 → 签名
///
/// 保证打乱顺序的输入得到相同的回放结果。
fn compare_events(a: &StatusChangeEvent, b: &StatusChangeEvent) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| a.machine_id.cmp(&b.machine_id))
        .then_with(|| transition_rank(a).cmp(&transition_rank(b)))
        .then_with(|| a.new_state.reason().cmp(&b.new_state.reason()))
        .then_with(|| a.signature.cmp(&b.signature))
}

fn transition_rank(event: &StatusChangeEvent) -> u8 {
    match event.new_status() {
        MachineStatus::Stopped => 0,
        MachineStatus::Running => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CycleTimeUnit, MachineState};
    use chrono::{NaiveDate, NaiveTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn stop(machine: &str, ts: NaiveDateTime, reason: Option<&str>) -> StatusChangeEvent {
        StatusChangeEvent {
            machine_id: machine.to_string(),
            previous_status: MachineStatus::Running,
            new_state: MachineState::Stopped {
                reason: reason.map(str::to_string),
            },
            timestamp: ts,
            signature: None,
        }
    }

    fn run(machine: &str, ts: NaiveDateTime) -> StatusChangeEvent {
        StatusChangeEvent {
            machine_id: machine.to_string(),
            previous_status: MachineStatus::Stopped,
            new_state: MachineState::Running,
            timestamp: ts,
            signature: None,
        }
    }

    fn machine(id: &str, state: MachineState, since: NaiveDateTime) -> Machine {
        Machine {
            id: id.to_string(),
            name: id.to_string(),
            state,
            last_status_change: since,
            accumulated_downtime_ms: 0,
            production_count: 0,
            scrap_count: 0,
            cycle_time: 30.0,
            cycle_time_unit: CycleTimeUnit::Seconds,
        }
    }

    #[test]
    fn test_single_closed_interval() {
        let events = vec![stop("M1", at(8, 10), Some("A")), run("M1", at(8, 40))];
        let machines = vec![machine("M1", MachineState::Running, at(8, 40))];
        let r = IntervalReconstructor::new("Unknown").reconstruct(
            &events,
            &machines,
            &WorkHoursConfig::always(),
            None,
            at(9, 0),
        );

        assert_eq!(r.intervals.len(), 1);
        let iv = &r.intervals[0];
        assert_eq!(iv.reason, "A");
        assert_eq!(iv.duration_ms, 30 * 60_000);
        assert!(!iv.open);
    }

    #[test]
    fn test_missing_reason_uses_label() {
        let events = vec![stop("M1", at(8, 0), None), run("M1", at(8, 5))];
        let machines = vec![machine("M1", MachineState::Running, at(8, 5))];
        let r = IntervalReconstructor::new("Sem motivo").reconstruct(
            &events,
            &machines,
            &WorkHoursConfig::always(),
            None,
            at(9, 0),
        );
        assert_eq!(r.intervals[0].reason, "Sem motivo");
    }

    #[test]
    fn test_reason_is_kept_verbatim() {
        let events = vec![
            stop("M1", at(8, 0), Some("Jam ")),
            run("M1", at(8, 5)),
            stop("M1", at(8, 10), Some("Jam")),
            run("M1", at(8, 15)),
        ];
        let r = IntervalReconstructor::new("Unknown").reconstruct(
            &events,
            &[],
            &WorkHoursConfig::always(),
            None,
            at(9, 0),
        );
        let reasons: Vec<&str> = r.intervals.iter().map(|i| i.reason.as_str()).collect();
        assert_eq!(reasons, vec!["Jam ", "Jam"]);
    }

    #[test]
    fn test_untracked_machine_without_reason_is_skipped() {
        let events = vec![
            stop("GHOST", at(8, 0), None),
            run("GHOST", at(8, 30)),
            stop("GHOST", at(8, 40), Some("Jam")),
            run("GHOST", at(8, 50)),
        ];
        let machines = vec![machine("M1", MachineState::Running, at(7, 0))];
        let r = IntervalReconstructor::new("Unknown").reconstruct(
            &events,
            &machines,
            &WorkHoursConfig::always(),
            None,
            at(9, 0),
        );
        assert_eq!(r.intervals.len(), 1);
        assert_eq!(r.intervals[0].reason, "Jam");
        assert_eq!(r.orphan_resumes, 0);
    }

    #[test]
    fn test_double_stop_overwrites_and_is_counted() {
        let events = vec![
            stop("M1", at(8, 0), Some("A")),
            stop("M1", at(8, 20), Some("B")),
            run("M1", at(8, 30)),
        ];
        let r = IntervalReconstructor::new("Unknown").reconstruct(
            &events,
            &[],
            &WorkHoursConfig::always(),
            None,
            at(9, 0),
        );
        assert_eq!(r.double_stops, 1);
        assert_eq!(r.intervals.len(), 1);
        assert_eq!(r.intervals[0].reason, "B");
        assert_eq!(r.intervals[0].duration_ms, 10 * 60_000);
    }

    #[test]
    fn test_open_interval_requires_stopped_snapshot() {
        let events = vec![stop("M1", at(7, 0), Some("A")), stop("M2", at(7, 0), Some("B"))];
        let machines = vec![
            machine("M1", MachineState::stopped("A"), at(7, 0)),
            // M2 快照已恢复运行（恢复事件尚未写入日志）
            machine("M2", MachineState::Running, at(7, 30)),
        ];
        let cfg = WorkHoursConfig::shift(
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(18, 49, 0).unwrap(),
        );
        let r = IntervalReconstructor::new("Unknown").reconstruct(&events, &machines, &cfg, None, at(9, 0));

        assert_eq!(r.intervals.len(), 1);
        let iv = &r.intervals[0];
        assert_eq!(iv.machine_id, "M1");
        assert!(iv.open);
        assert_eq!(iv.end, at(9, 0));
        assert_eq!(iv.duration_ms, 3_600_000);
    }

    #[test]
    fn test_lower_bound_discards_old_events() {
        let events = vec![
            stop("M1", at(6, 0), Some("old")),
            run("M1", at(6, 30)),
            stop("M1", at(8, 0), Some("new")),
            run("M1", at(8, 15)),
        ];
        let r = IntervalReconstructor::new("Unknown").reconstruct(
            &events,
            &[],
            &WorkHoursConfig::always(),
            Some(at(7, 0)),
            at(9, 0),
        );
        assert_eq!(r.events_considered, 2);
        assert_eq!(r.intervals.len(), 1);
        assert_eq!(r.intervals[0].reason, "new");
    }

    #[test]
    fn test_orphan_resume_is_ignored() {
        let events = vec![run("M1", at(8, 0))];
        let r = IntervalReconstructor::new("Unknown").reconstruct(
            &events,
            &[],
            &WorkHoursConfig::always(),
            None,
            at(9, 0),
        );
        assert!(r.intervals.is_empty());
        assert_eq!(r.orphan_resumes, 1);
    }
}
