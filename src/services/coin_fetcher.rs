use crate::config::SourceConfig;
use crate::types::{CoinRecord, CoinsResponse, FetchError};
use std::time::Duration;
use tracing::{error, info};

pub const API_KEY_HEADER: &str = "X-API-KEY";

/// CoinStats 单页行情拉取
pub struct CoinFetcher {
    client: reqwest::Client,
    api_url: Option<String>,
}

impl CoinFetcher {
    pub fn new(config: &SourceConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("CoinStatsSync/1.0")
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &SourceConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
        }
    }

    /// 拉取第一页，最多 `limit` 条。
    ///
    /// `Ok(vec![])` 表示上游没有数据，`Err` 表示请求本身失败；
    /// 两种情况都已写入日志。
    pub async fn fetch_coins(
        &self,
        limit: u32,
        api_key: Option<&str>,
    ) -> Result<Vec<CoinRecord>, FetchError> {
        match self.fetch_page(limit, api_key).await {
            Ok(coins) => {
                info!("Fetched {} coins successfully.", coins.len());
                Ok(coins)
            }
            Err(e) => {
                error!("Error fetching coins: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch_page(
        &self,
        limit: u32,
        api_key: Option<&str>,
    ) -> Result<Vec<CoinRecord>, FetchError> {
        let api_url = self
            .api_url
            .as_deref()
            .ok_or(FetchError::NotConfigured("COINSTATS_API_URL"))?;

        let mut request = self
            .client
            .get(api_url)
            .query(&[("page", 1u32), ("limit", limit)]);

        if let Some(key) = api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let body: CoinsResponse = serde_json::from_slice(&bytes)?;

        Ok(body.result)
    }
}
