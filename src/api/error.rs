// ==========================================
// 设备停机 OEE 分析引擎 - API层错误类型
// ==========================================
// 职责: 汇总数据源/配置错误，面向调用方给出明确原因
// ==========================================

use crate::config::ConfigError;
use crate::source::error::DataSourceError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 下层错误
    // ==========================================
    #[error("数据源错误: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
