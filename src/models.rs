use serde::{Deserialize, Deserializer, Serialize};

const WEI_PER_GWEI: f64 = 1e9;

/// One entry of the explorer `txlist` result. Only the fields the analysis
/// reads are kept; absent or non-scalar ones deserialize empty and fail to
/// parse later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, deserialize_with = "lenient_string")]
    pub hash: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gas_price: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time_stamp: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

impl Transaction {
    pub fn gas_price_wei(&self) -> Option<u128> {
        self.gas_price.trim().parse().ok()
    }

    /// Gas price in Gwei, present only for a positive parsed value.
    pub fn gas_price_gwei(&self) -> Option<f64> {
        match self.gas_price_wei() {
            Some(wei) if wei > 0 => Some(wei as f64 / WEI_PER_GWEI),
            _ => None,
        }
    }

    /// Unix seconds.
    pub fn timestamp(&self) -> Option<i64> {
        self.time_stamp.trim().parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LowestGweiRecord {
    pub transaction: Transaction,
    pub gwei: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub value: f64,
    pub relative_time: String,
}

/// Parallel label/value arrays; `labels[i]` and `data[i]` describe the same
/// transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn push(&mut self, label: String, point: ChartPoint) {
        self.labels.push(label);
        self.data.push(point);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasTrackerResult {
    pub result_text: String,
    pub chart_series: ChartSeries,
}

impl GasTrackerResult {
    /// Failure shape: message only, empty series.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            result_text: text.into(),
            chart_series: ChartSeries::default(),
        }
    }
}
