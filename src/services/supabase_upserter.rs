use crate::config::DestinationConfig;
use crate::types::{project_batch, BatchOutcome, CoinRecord, UpsertError, UpsertReport};
use crate::utils::BatchProcessor;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{error, info};

pub const PREFER_MERGE_DUPLICATES: &str = "resolution=merge-duplicates";

/// Supabase REST 批量 upsert
pub struct SupabaseUpserter {
    client: reqwest::Client,
    config: DestinationConfig,
}

impl SupabaseUpserter {
    pub fn new(config: &DestinationConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("CoinStatsSync/1.0")
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &DestinationConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// `<base_url>/rest/v1/<table>`
    pub fn endpoint(&self) -> Option<String> {
        self.config.base_url.as_deref().map(|base| {
            format!(
                "{}/rest/v1/{}",
                base.trim_end_matches('/'),
                self.config.table
            )
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Prefer", HeaderValue::from_static(PREFER_MERGE_DUPLICATES));

        if let Some(key) = self
            .config
            .anon_key
            .as_deref()
            .and_then(|k| HeaderValue::from_str(k).ok())
        {
            headers.insert("apikey", key);
        }
        if let Some(token) = self
            .config
            .service_role_key
            .as_deref()
            .and_then(|k| HeaderValue::from_str(&format!("Bearer {}", k)).ok())
        {
            headers.insert(AUTHORIZATION, token);
        }

        headers
    }

    /// 按批顺序写入；某一批失败只记录日志，继续下一批
    pub async fn upsert_coins(&self, coins: &[CoinRecord], batch_size: usize) -> UpsertReport {
        let processor = BatchProcessor::new(batch_size);
        info!(
            "Upserting {} coins in {} batches of up to {}",
            coins.len(),
            processor.batch_count(coins.len()),
            processor.batch_size()
        );
        let endpoint = self.endpoint();
        let headers = self.headers();

        let batches = processor
            .process_in_batches_async(coins, |start_index, batch| {
                let endpoint = endpoint.clone();
                let headers = headers.clone();
                async move {
                    let size = batch.len();
                    match self.post_batch(endpoint.as_deref(), headers, batch).await {
                        Ok(()) => {
                            info!("Upserted batch of {} coins", size);
                            BatchOutcome::Upserted { start_index, size }
                        }
                        Err(e) => {
                            error!("Error upserting batch starting at index {}: {}", start_index, e);
                            BatchOutcome::Failed {
                                start_index,
                                size,
                                error: e.to_string(),
                            }
                        }
                    }
                }
            })
            .await;

        UpsertReport { batches }
    }

    async fn post_batch(
        &self,
        endpoint: Option<&str>,
        headers: HeaderMap,
        batch: &[CoinRecord],
    ) -> Result<(), UpsertError> {
        let endpoint = endpoint.ok_or(UpsertError::NotConfigured("SUPABASE_URL"))?;
        let payload = project_batch(batch);

        let response = self
            .client
            .post(endpoint)
            .headers(headers)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpsertError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
