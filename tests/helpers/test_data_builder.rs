// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use downtime_oee::domain::machine::{Machine, StatusChangeEvent};
use downtime_oee::domain::types::{CycleTimeUnit, MachineState, MachineStatus};
use downtime_oee::domain::work_hours::WorkHoursConfig;

pub const MINUTE_MS: i64 = 60_000;
pub const HOUR_MS: i64 = 3_600_000;

// ==========================================
// 时间辅助
// ==========================================

/// 2026-03-<day> <h>:<m>:00
pub fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 启用的班次
pub fn shift(start: (u32, u32), end: (u32, u32)) -> WorkHoursConfig {
    WorkHoursConfig::shift(hm(start.0, start.1), hm(end.0, end.1))
}

// ==========================================
// 事件构建
// ==========================================

pub fn stop_event(machine_id: &str, timestamp: NaiveDateTime, reason: Option<&str>) -> StatusChangeEvent {
    StatusChangeEvent {
        machine_id: machine_id.to_string(),
        previous_status: MachineStatus::Running,
        new_state: MachineState::Stopped {
            reason: reason.map(str::to_string),
        },
        timestamp,
        signature: None,
    }
}

pub fn run_event(machine_id: &str, timestamp: NaiveDateTime) -> StatusChangeEvent {
    StatusChangeEvent {
        machine_id: machine_id.to_string(),
        previous_status: MachineStatus::Stopped,
        new_state: MachineState::Running,
        timestamp,
        signature: None,
    }
}

// ==========================================
// Machine 构建器
// ==========================================

pub struct MachineBuilder {
    id: String,
    name: String,
    state: MachineState,
    last_status_change: NaiveDateTime,
    accumulated_downtime_ms: i64,
    production_count: u64,
    scrap_count: u64,
    cycle_time: f64,
    cycle_time_unit: CycleTimeUnit,
}

impl MachineBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            state: MachineState::Running,
            last_status_change: at(2, 0, 0),
            accumulated_downtime_ms: 0,
            production_count: 0,
            scrap_count: 0,
            cycle_time: 30.0,
            cycle_time_unit: CycleTimeUnit::Seconds,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn running_since(mut self, since: NaiveDateTime) -> Self {
        self.state = MachineState::Running;
        self.last_status_change = since;
        self
    }

    pub fn stopped_since(mut self, since: NaiveDateTime, reason: &str) -> Self {
        self.state = MachineState::stopped(reason);
        self.last_status_change = since;
        self
    }

    pub fn accumulated_minutes(mut self, minutes: i64) -> Self {
        self.accumulated_downtime_ms = minutes * MINUTE_MS;
        self
    }

    pub fn production(mut self, good: u64, scrap: u64) -> Self {
        self.production_count = good;
        self.scrap_count = scrap;
        self
    }

    pub fn cycle_time(mut self, value: f64, unit: CycleTimeUnit) -> Self {
        self.cycle_time = value;
        self.cycle_time_unit = unit;
        self
    }

    pub fn build(self) -> Machine {
        Machine {
            id: self.id,
            name: self.name,
            state: self.state,
            last_status_change: self.last_status_change,
            accumulated_downtime_ms: self.accumulated_downtime_ms,
            production_count: self.production_count,
            scrap_count: self.scrap_count,
            cycle_time: self.cycle_time,
            cycle_time_unit: self.cycle_time_unit,
        }
    }
}
