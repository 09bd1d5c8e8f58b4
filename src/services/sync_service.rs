use crate::config::Config;
use crate::services::{CoinFetcher, SupabaseUpserter};
use crate::types::{SyncReport, UpsertReport};
use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// 一次完整同步：拉取 → 投影 → 分批 upsert
pub struct SyncService {
    config: Config,
    fetcher: CoinFetcher,
    upserter: SupabaseUpserter,
}

impl SyncService {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let fetcher = CoinFetcher::new(&config.source, config.http_timeout())?;
        let upserter = SupabaseUpserter::new(&config.destination, config.http_timeout())?;

        Ok(Self {
            config,
            fetcher,
            upserter,
        })
    }

    /// 执行一次同步，所有失败都已记录日志并体现在报告中，不会返回错误
    pub async fn run(&self) -> SyncReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("sync", %run_id);

        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid) -> SyncReport {
        let started_at = Utc::now();
        info!("Starting CoinStats to Supabase sync.");

        let (coins, fetch_error) = match self
            .fetcher
            .fetch_coins(self.config.source.limit, self.config.source.api_key.as_deref())
            .await
        {
            Ok(coins) => (coins, None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };

        let upsert = if coins.is_empty() {
            warn!("No coins fetched");
            UpsertReport::default()
        } else {
            self.upserter
                .upsert_coins(&coins, self.config.sync.batch_size)
                .await
        };

        let report = SyncReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            fetched: coins.len(),
            fetch_error,
            upsert,
        };

        info!(
            "CoinStats to Supabase sync completed: status={:?}, fetched={}, upserted={}, failed_batches={}, duration_ms={}",
            report.status(),
            report.fetched,
            report.upsert.upserted_rows(),
            report.upsert.failed_batches(),
            report.duration_ms()
        );

        report
    }
}
