use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlType {
    Delta,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeTtlType {
    Delta,
}

/// Absolute (`block`) or relative (`delta`) time to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ttl {
    #[serde(rename = "type")]
    pub kind: TtlType,
    pub value: u64,
}

impl Ttl {
    /// Height at which the TTL runs out, given the height it was set at.
    pub fn expiry_height(&self, current_height: u64) -> Option<u64> {
        match self.kind {
            TtlType::Block => Some(self.value),
            TtlType::Delta => current_height.checked_add(self.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeTtl {
    #[serde(rename = "type")]
    pub kind: RelativeTtlType,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRegisterTx {
    pub account: String,
    pub query_format: String,
    pub response_format: String,
    pub query_fee: u64,
    pub ttl: Ttl,
    pub fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleQueryTx {
    pub sender: String,
    pub oracle_pubkey: String,
    pub query: String,
    pub query_fee: u64,
    pub query_ttl: Ttl,
    pub response_ttl: RelativeTtl,
    pub fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponseTx {
    pub oracle: String,
    pub query_id: String,
    pub response: String,
    pub fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRegisterTxObject {
    pub vsn: u64,
    pub data_schema: String,
    #[serde(flatten)]
    pub tx: OracleRegisterTx,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleQueryTxObject {
    pub vsn: u64,
    pub data_schema: String,
    #[serde(flatten)]
    pub tx: OracleQueryTx,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponseTxObject {
    pub vsn: u64,
    pub data_schema: String,
    #[serde(flatten)]
    pub tx: OracleResponseTx,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleQuestionsInner {
    pub query_id: String,
    pub query: String,
    pub query_fee: u64,
    pub expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OracleQuestions(pub Vec<OracleQuestionsInner>);

impl OracleQuestions {
    /// Questions still open at `height`.
    pub fn open_at(&self, height: u64) -> impl Iterator<Item = &OracleQuestionsInner> {
        self.0.iter().filter(move |q| q.expires_at > height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredOraclesInner {
    pub address: String,
    pub query_format: String,
    pub response_format: String,
    pub query_fee: u64,
    pub expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisteredOracles(pub Vec<RegisteredOraclesInner>);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OracleQueryId {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
}

/// Reply to an oracle registration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineResponse200 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TxObject, TypedModel};
    use serde_json::json;

    #[test]
    fn test_ttl_expiry() {
        let absolute = Ttl {
            kind: TtlType::Block,
            value: 500,
        };
        let relative = Ttl {
            kind: TtlType::Delta,
            value: 50,
        };
        assert_eq!(absolute.expiry_height(100), Some(500));
        assert_eq!(relative.expiry_height(100), Some(150));
    }

    #[test]
    fn test_oracle_query_tx_object_flattens_fields() {
        let raw = json!({
            "vsn": 1,
            "data_schema": "OracleQueryTxObject",
            "sender": "ak$sender",
            "oracle_pubkey": "ok$oracle",
            "query": "weather?",
            "query_fee": 3,
            "query_ttl": { "type": "delta", "value": 10 },
            "response_ttl": { "type": "delta", "value": 5 },
            "fee": 2,
            "nonce": 9
        });

        let tx = TxObject::from_wire(&raw).unwrap();
        match &tx {
            TxObject::OracleQuery(q) => {
                assert_eq!(q.tx.query, "weather?");
                assert_eq!(q.tx.response_ttl.kind, RelativeTtlType::Delta);
                assert_eq!(q.nonce, Some(9));
            }
            other => panic!("expected oracle query, got {:?}", other),
        }
        assert_eq!(tx.to_wire().unwrap(), raw);
    }

    #[test]
    fn test_relative_ttl_rejects_block() {
        let err = RelativeTtl::from_wire(&json!({ "type": "block", "value": 1 })).unwrap_err();
        assert_eq!(err.as_validation().map(|v| v.field.as_str()), Some("type"));
    }

    #[test]
    fn test_open_questions() {
        let questions = OracleQuestions::from_wire(&json!([
            { "query_id": "oq$1", "query": "a", "query_fee": 1, "expires_at": 10 },
            { "query_id": "oq$2", "query": "b", "query_fee": 1, "expires_at": 30 }
        ]))
        .unwrap();

        let open: Vec<_> = questions.open_at(20).map(|q| q.query_id.as_str()).collect();
        assert_eq!(open, vec!["oq$2"]);
    }
}
