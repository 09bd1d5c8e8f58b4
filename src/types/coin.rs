// CoinRecord, CoinRow, CoinsResponse
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 上游返回的单条币种数据，字段集合由 CoinStats 决定
pub type CoinRecord = Map<String, Value>;

/// CoinStats `/coins` 响应体，只关心 `result` 数组
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinsResponse {
    #[serde(default)]
    pub result: Vec<CoinRecord>,
}

/// 写入 Supabase 的投影行，固定 15 个字段，缺失值序列化为 null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinRow {
    pub id: Option<Value>,
    pub icon: Option<Value>,
    pub name: Option<Value>,
    pub symbol: Option<Value>,
    pub rank: Option<Value>,
    pub price: Option<Value>,
    pub volume: Option<Value>,
    pub market_cap: Option<Value>,
    pub available_supply: Option<Value>,
    pub total_supply: Option<Value>,
    pub fully_diluted_valuation: Option<Value>,
    #[serde(rename = "priceChange1h")]
    pub price_change_1h: Option<Value>,
    #[serde(rename = "priceChange1d")]
    pub price_change_1d: Option<Value>,
    #[serde(rename = "priceChange1w")]
    pub price_change_1w: Option<Value>,
    pub website_url: Option<Value>,
}

pub const COIN_ROW_FIELDS: [&str; 15] = [
    "id",
    "icon",
    "name",
    "symbol",
    "rank",
    "price",
    "volume",
    "marketCap",
    "availableSupply",
    "totalSupply",
    "fullyDilutedValuation",
    "priceChange1h",
    "priceChange1d",
    "priceChange1w",
    "websiteUrl",
];

impl CoinRow {
    /// 按字段名投影，值原样透传，不做类型转换；上游显式 null 与缺失一样为 None
    pub fn from_record(record: &CoinRecord) -> Self {
        let field = |key: &str| record.get(key).filter(|v| !v.is_null()).cloned();

        Self {
            id: field("id"),
            icon: field("icon"),
            name: field("name"),
            symbol: field("symbol"),
            rank: field("rank"),
            price: field("price"),
            volume: field("volume"),
            market_cap: field("marketCap"),
            available_supply: field("availableSupply"),
            total_supply: field("totalSupply"),
            fully_diluted_valuation: field("fullyDilutedValuation"),
            price_change_1h: field("priceChange1h"),
            price_change_1d: field("priceChange1d"),
            price_change_1w: field("priceChange1w"),
            website_url: field("websiteUrl"),
        }
    }
}

pub fn project_batch(records: &[CoinRecord]) -> Vec<CoinRow> {
    records.iter().map(CoinRow::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> CoinRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_fields_project_to_null() {
        let row = CoinRow::from_record(&record(json!({"id": "btc", "price": 50000})));
        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 15);
        for key in COIN_ROW_FIELDS {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(object["id"], json!("btc"));
        assert_eq!(object["price"], json!(50000));
        assert_eq!(object["icon"], Value::Null);
        assert_eq!(object["websiteUrl"], Value::Null);
    }

    #[test]
    fn test_extra_fields_are_dropped_and_values_pass_through() {
        let row = CoinRow::from_record(&record(json!({
            "id": "ethereum",
            "symbol": "ETH",
            "rank": 2,
            "marketCap": 1.5e11,
            "priceChange1h": -0.12,
            "priceChange1w": "3.4",
            "websiteUrl": "https://ethereum.org",
            "contractAddress": "0x0",
            "explorers": ["https://etherscan.io"]
        })));
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value.as_object().unwrap().len(), 15);
        assert_eq!(value["rank"], json!(2));
        assert_eq!(value["priceChange1h"], json!(-0.12));
        // 不做类型转换
        assert_eq!(value["priceChange1w"], json!("3.4"));
        assert!(value.get("contractAddress").is_none());
        assert_eq!(row.id, Some(json!("ethereum")));
    }

    #[test]
    fn test_empty_record_projects() {
        let row = CoinRow::from_record(&CoinRecord::new());
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value.as_object().unwrap().len(), 15);
        assert!(value.as_object().unwrap().values().all(Value::is_null));
    }

    #[test]
    fn test_response_without_result_is_empty() {
        let response: CoinsResponse = serde_json::from_value(json!({"meta": {"page": 1}})).unwrap();
        assert!(response.result.is_empty());
    }
}
