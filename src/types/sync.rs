// FetchError, UpsertError, BatchOutcome, UpsertReport, SyncReport
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("缺少必需配置: {0}")]
    NotConfigured(&'static str),
    #[error("请求失败: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API请求失败: {status} {body}")]
    Status { status: u16, body: String },
    #[error("响应解析失败: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum UpsertError {
    #[error("缺少必需配置: {0}")]
    NotConfigured(&'static str),
    #[error("请求失败: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("写入失败: {status} {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Upserted { start_index: usize, size: usize },
    Failed { start_index: usize, size: usize, error: String },
}

impl BatchOutcome {
    pub fn start_index(&self) -> usize {
        match self {
            BatchOutcome::Upserted { start_index, .. } | BatchOutcome::Failed { start_index, .. } => {
                *start_index
            }
        }
    }

    pub fn size(&self) -> usize {
        match self {
            BatchOutcome::Upserted { size, .. } | BatchOutcome::Failed { size, .. } => *size,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Upserted { .. })
    }
}

/// 一次 upsert 的逐批结果，仅用于日志与测试
#[derive(Debug, Clone, Default)]
pub struct UpsertReport {
    pub batches: Vec<BatchOutcome>,
}

impl UpsertReport {
    pub fn upserted_rows(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| b.is_success())
            .map(BatchOutcome::size)
            .sum()
    }

    pub fn failed_batches(&self) -> usize {
        self.batches.iter().filter(|b| !b.is_success()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    PartiallySynced,
    NothingFetched,
    FetchFailed,
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub fetched: usize,
    pub fetch_error: Option<String>,
    pub upsert: UpsertReport,
}

impl SyncReport {
    pub fn status(&self) -> SyncStatus {
        if self.fetch_error.is_some() {
            SyncStatus::FetchFailed
        } else if self.fetched == 0 {
            SyncStatus::NothingFetched
        } else if self.upsert.failed_batches() > 0 {
            SyncStatus::PartiallySynced
        } else {
            SyncStatus::Synced
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
