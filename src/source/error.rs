// ==========================================
// 设备停机 OEE 分析引擎 - 数据源错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 数据源错误类型
#[derive(Error, Debug)]
pub enum DataSourceError {
    // ===== 读取错误 =====
    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    // ===== 解析错误 =====
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV 解析失败: {0}")]
    Csv(String),

    #[error("记录格式错误 (line={line}): {message}")]
    InvalidRecord { line: u64, message: String },
}

// 实现 From<csv::Error>
impl From<csv::Error> for DataSourceError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => DataSourceError::InvalidRecord {
                line: pos.line(),
                message: err.to_string(),
            },
            None => DataSourceError::Csv(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type DataSourceResult<T> = Result<T, DataSourceError>;
