// ==========================================
// 设备停机 OEE 分析引擎 - 文件数据源
// ==========================================
// 支持: 设备快照 JSON / 事件日志 JSON 或 CSV / 班次配置 JSON
// CSV 列: machine_id, previous_status, new_status, reason, timestamp, signature
// ==========================================

use crate::domain::machine::{Machine, StatusChangeEvent};
use crate::domain::types::{MachineState, MachineStatus};
use crate::domain::work_hours::WorkHoursConfig;
use crate::source::data_source::AnalyticsDataSource;
use crate::source::error::{DataSourceError, DataSourceResult};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 可接受的时间戳格式（无时区，本地时间）
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// 解析本地时间戳
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

// ==========================================
// FileDataSource
// ==========================================
#[derive(Debug, Clone)]
pub struct FileDataSource {
    machines_path: PathBuf,
    events_path: PathBuf,
    work_hours_path: Option<PathBuf>,
}

impl FileDataSource {
    pub fn new(machines_path: impl Into<PathBuf>, events_path: impl Into<PathBuf>) -> Self {
        Self {
            machines_path: machines_path.into(),
            events_path: events_path.into(),
            work_hours_path: None,
        }
    }

    pub fn with_work_hours(mut self, path: impl Into<PathBuf>) -> Self {
        self.work_hours_path = Some(path.into());
        self
    }

    /// 从目录按约定文件名创建: machines.json / events.(csv|json) / work_hours.json
    ///
    /// work_hours.json 不存在时不启用班次
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let csv_events = dir.join("events.csv");
        let events = if csv_events.exists() {
            csv_events
        } else {
            dir.join("events.json")
        };

        let source = Self::new(dir.join("machines.json"), events);
        let work_hours = dir.join("work_hours.json");
        if work_hours.exists() {
            source.with_work_hours(work_hours)
        } else {
            source
        }
    }

    fn events_are_csv(&self) -> bool {
        self.events_path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> DataSourceResult<T> {
    let raw = tokio::fs::read_to_string(path).await?;
    let value = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), "JSON 文件读取完成");
    Ok(value)
}

#[async_trait]
impl AnalyticsDataSource for FileDataSource {
    async fn load_machines(&self) -> DataSourceResult<Vec<Machine>> {
        let machines: Vec<Machine> = read_json(&self.machines_path).await?;
        info!(count = machines.len(), path = %self.machines_path.display(), "设备快照加载完成");
        Ok(machines)
    }

    async fn load_events(&self) -> DataSourceResult<Vec<StatusChangeEvent>> {
        let events = if self.events_are_csv() {
            let raw = tokio::fs::read_to_string(&self.events_path).await?;
            parse_events_csv(&raw)?
        } else {
            read_json(&self.events_path).await?
        };
        info!(count = events.len(), path = %self.events_path.display(), "事件日志加载完成");
        Ok(events)
    }

    async fn load_work_hours(&self) -> DataSourceResult<WorkHoursConfig> {
        match &self.work_hours_path {
            Some(path) => read_json(path).await,
            None => Ok(WorkHoursConfig::default()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

// ==========================================
// CSV 事件解析
// ==========================================
#[derive(Debug, Deserialize)]
struct EventRow {
    machine_id: String,
    previous_status: String,
    new_status: String,
    #[serde(default)]
    reason: Option<String>,
    timestamp: String,
    #[serde(default)]
    signature: Option<String>,
}

/// 解析 CSV 事件日志（含表头）
///
/// # 返回
/// - 错误行返回 InvalidRecord，携带 CSV 行号
pub fn parse_events_csv(raw: &str) -> DataSourceResult<Vec<StatusChangeEvent>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader.headers()?.clone();
    let mut events = Vec::new();

    for result in reader.records() {
        let record = result?;
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: EventRow = record.deserialize(Some(&headers))?;
        events.push(row_to_event(row, line)?);
    }

    Ok(events)
}

fn row_to_event(row: EventRow, line: u64) -> DataSourceResult<StatusChangeEvent> {
    let invalid = |message: String| DataSourceError::InvalidRecord { line, message };

    let previous_status = MachineStatus::from_str(&row.previous_status)
        .ok_or_else(|| invalid(format!("未知状态 previous_status={}", row.previous_status)))?;
    let new_status = MachineStatus::from_str(&row.new_status)
        .ok_or_else(|| invalid(format!("未知状态 new_status={}", row.new_status)))?;
    let timestamp = parse_timestamp(&row.timestamp)
        .ok_or_else(|| invalid(format!("时间戳格式错误: {}", row.timestamp)))?;

    let new_state = match new_status {
        MachineStatus::Running => MachineState::Running,
        MachineStatus::Stopped => MachineState::Stopped {
            reason: row.reason.filter(|r| !r.is_empty()),
        },
    };

    Ok(StatusChangeEvent {
        machine_id: row.machine_id,
        previous_status,
        new_state,
        timestamp,
        signature: row.signature.filter(|s| !s.is_empty()),
    })
}
