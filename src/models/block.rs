use crate::models::tx::{SignedTxObject, TxMsgPackHashes, TxObjects};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn millis_to_datetime(millis: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(i64::try_from(millis).ok()?)
}

/// Cuckoo cycle solution of a mined header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pow(pub Vec<u64>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub height: u64,
    pub prev_hash: String,
    pub state_hash: String,
    pub txs_hash: String,
    pub target: u64,
    pub nonce: u64,
    /// Milliseconds since the Unix epoch.
    pub time: u64,
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pow: Option<Pow>,
}

impl Header {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.time)
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Top {
    #[serde(flatten)]
    pub header: Header,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericBlock {
    #[serde(flatten)]
    pub header: Header,
    pub data_schema: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(flatten)]
    pub header: Header,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<SignedTxObject>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockWithTxs {
    #[serde(flatten)]
    pub header: Header,
    pub data_schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<TxObjects>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockWithTxsHashes {
    #[serde(flatten)]
    pub header: Header,
    pub data_schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<TxMsgPackHashes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeight {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTimeSummary {
    pub height: u64,
    pub time: u64,
    pub difficulty: f64,
}

impl BlockTimeSummary {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_30_blocks_time: Option<Vec<BlockTimeSummary>>,
}

impl Info {
    /// Mean gap between consecutive summaries, in milliseconds.
    pub fn average_block_time(&self) -> Option<f64> {
        let summaries = self.last_30_blocks_time.as_deref()?;
        if summaries.len() < 2 {
            return None;
        }
        let first = summaries.first()?.time as f64;
        let last = summaries.last()?.time as f64;
        Some((first - last).abs() / (summaries.len() - 1) as f64)
    }
}
