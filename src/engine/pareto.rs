// ==========================================
// 设备停机 OEE 分析引擎 - 停机原因帕累托分析
// ==========================================
// 职责: 按停机原因聚合区间，降序排列并计算累计占比
// 规则:
// - 原因区分大小写，空原因归入"未知"标签
// - 按总时长降序，稳定排序（并列保持首次出现顺序）
// - 累计占比对累计值四舍五入，避免逐项取整的漂移
// ==========================================

use crate::domain::downtime::{DowntimeInterval, ParetoItem};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// ParetoAnalyzer - 帕累托分析器
// ==========================================
pub struct ParetoAnalyzer {
    unknown_reason_label: String,
}

impl ParetoAnalyzer {
    pub fn new(unknown_reason_label: impl Into<String>) -> Self {
        Self {
            unknown_reason_label: unknown_reason_label.into(),
        }
    }

    /// 生成帕累托排序
    ///
    /// # 参数
    /// - `intervals`: 请求窗口内的停机区间（可含快照外设备）
    ///
    /// # 返回
    /// 按总时长降序的 ParetoItem 列表；无区间时为空
    pub fn analyze(&self, intervals: &[DowntimeInterval]) -> Vec<ParetoItem> {
        // 1. 按原因分组（保留首次出现顺序）
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, u32, i64)> = Vec::new();

        for interval in intervals {
            let reason = if interval.reason.trim().is_empty() {
                self.unknown_reason_label.as_str()
            } else {
                interval.reason.as_str()
            };
            let slot = *index.entry(reason).or_insert_with(|| {
                groups.push((reason, 0, 0));
                groups.len() - 1
            });
            groups[slot].1 += 1;
            groups[slot].2 += interval.duration_ms.max(0);
        }

        // 2. 降序（sort_by 为稳定排序）
        groups.sort_by(|a, b| b.2.cmp(&a.2));

        // 3. 单项占比 + 累计占比
        let grand_total: i64 = groups.iter().map(|g| g.2).sum();
        let mut running_ms = 0i64;

        let items: Vec<ParetoItem> = groups
            .into_iter()
            .map(|(reason, count, total_ms)| {
                running_ms += total_ms;
                let (percentage, cumulative_percent) = if grand_total > 0 {
                    (
                        (total_ms as f64 / grand_total as f64 * 1000.0).round() / 10.0,
                        (running_ms as f64 / grand_total as f64 * 100.0).round() as u32,
                    )
                } else {
                    (0.0, 0)
                };
                ParetoItem {
                    reason: reason.to_string(),
                    count,
                    total_duration_ms: total_ms,
                    percentage,
                    cumulative_percent,
                }
            })
            .collect();

        debug!(
            reasons = items.len(),
            total_duration_ms = grand_total,
            "帕累托分析完成"
        );

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn interval(reason: &str, minutes: i64) -> DowntimeInterval {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        DowntimeInterval {
            machine_id: "M1".to_string(),
            reason: reason.to_string(),
            start,
            end: start + chrono::Duration::minutes(minutes),
            duration_ms: minutes * 60_000,
            open: false,
        }
    }

    #[test]
    fn test_groups_sorted_descending_with_cumulative() {
        let items = ParetoAnalyzer::new("Unknown").analyze(&[
            interval("A", 10),
            interval("B", 30),
            interval("A", 20),
            interval("C", 40),
        ]);

        let reasons: Vec<&str> = items.iter().map(|i| i.reason.as_str()).collect();
        assert_eq!(reasons, vec!["C", "A", "B"]);
        assert_eq!(items[1].count, 2);
        assert_eq!(items[1].total_duration_ms, 30 * 60_000);
        assert_eq!(items[0].cumulative_percent, 40);
        assert_eq!(items[1].cumulative_percent, 70);
        assert_eq!(items[2].cumulative_percent, 100);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let items = ParetoAnalyzer::new("Unknown").analyze(&[interval("Z", 10), interval("Y", 10)]);
        assert_eq!(items[0].reason, "Z");
        assert_eq!(items[1].reason, "Y");
    }

    #[test]
    fn test_reasons_are_case_sensitive_and_blank_is_unknown() {
        let items = ParetoAnalyzer::new("Unknown").analyze(&[
            interval("jam", 5),
            interval("Jam", 5),
            interval("  ", 5),
        ]);
        assert_eq!(items.len(), 3);
        assert!(items.iter().any(|i| i.reason == "Unknown"));
    }

    #[test]
    fn test_cumulative_rounds_running_sum() {
        // 三等分: 33.3 / 66.7 / 100 → 33 / 67 / 100
        let items = ParetoAnalyzer::new("Unknown").analyze(&[
            interval("A", 10),
            interval("B", 10),
            interval("C", 10),
        ]);
        let cumulative: Vec<u32> = items.iter().map(|i| i.cumulative_percent).collect();
        assert_eq!(cumulative, vec![33, 67, 100]);
    }

    #[test]
    fn test_zero_total_yields_zero_percent() {
        let items = ParetoAnalyzer::new("Unknown").analyze(&[interval("A", 0)]);
        assert_eq!(items[0].cumulative_percent, 0);
        assert!(ParetoAnalyzer::new("Unknown").analyze(&[]).is_empty());
    }
}
