use crate::core::registry::Registry;
use crate::domain::model::ModelInstance;
use crate::models::oracle::{OracleQueryTxObject, OracleRegisterTxObject, OracleResponseTxObject};
use crate::models::{schema_mismatch, TypedModel};
use crate::utils::error::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodedHash {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// A serialized transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tx {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendTx {
    pub recipient_pubkey: String,
    pub amount: u64,
    pub fee: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Base of every transaction object; `data_schema` names the concrete kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericTxObject {
    pub vsn: u64,
    pub data_schema: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinbaseTxObject {
    pub vsn: u64,
    pub data_schema: String,
    pub account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendTxObject {
    pub vsn: u64,
    pub data_schema: String,
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
    pub fee: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Any transaction object, dispatched on `data_schema`.
///
/// Unrecognised kinds fall back to [`GenericTxObject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxObject {
    Coinbase(CoinbaseTxObject),
    Spend(SpendTxObject),
    OracleRegister(OracleRegisterTxObject),
    OracleQuery(OracleQueryTxObject),
    OracleResponse(OracleResponseTxObject),
    Generic(GenericTxObject),
}

impl TxObject {
    pub fn data_schema(&self) -> &str {
        match self {
            TxObject::Coinbase(tx) => &tx.data_schema,
            TxObject::Spend(tx) => &tx.data_schema,
            TxObject::OracleRegister(tx) => &tx.data_schema,
            TxObject::OracleQuery(tx) => &tx.data_schema,
            TxObject::OracleResponse(tx) => &tx.data_schema,
            TxObject::Generic(tx) => &tx.data_schema,
        }
    }

    pub fn vsn(&self) -> u64 {
        match self {
            TxObject::Coinbase(tx) => tx.vsn,
            TxObject::Spend(tx) => tx.vsn,
            TxObject::OracleRegister(tx) => tx.vsn,
            TxObject::OracleQuery(tx) => tx.vsn,
            TxObject::OracleResponse(tx) => tx.vsn,
            TxObject::Generic(tx) => tx.vsn,
        }
    }

    /// Fee paid by the transaction; coinbase and unknown kinds pay none.
    pub fn fee(&self) -> Option<u64> {
        match self {
            TxObject::Spend(tx) => Some(tx.fee),
            TxObject::OracleRegister(tx) => Some(tx.tx.fee),
            TxObject::OracleQuery(tx) => Some(tx.tx.fee),
            TxObject::OracleResponse(tx) => Some(tx.tx.fee),
            TxObject::Coinbase(_) | TxObject::Generic(_) => None,
        }
    }
}

impl Serialize for TxObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TxObject::Coinbase(tx) => tx.serialize(serializer),
            TxObject::Spend(tx) => tx.serialize(serializer),
            TxObject::OracleRegister(tx) => tx.serialize(serializer),
            TxObject::OracleQuery(tx) => tx.serialize(serializer),
            TxObject::OracleResponse(tx) => tx.serialize(serializer),
            TxObject::Generic(tx) => tx.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TxObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let kind = raw
            .get("data_schema")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let parsed = match kind.as_str() {
            "CoinbaseTxObject" => serde_json::from_value(raw).map(TxObject::Coinbase),
            "SpendTxObject" => serde_json::from_value(raw).map(TxObject::Spend),
            "OracleRegisterTxObject" => serde_json::from_value(raw).map(TxObject::OracleRegister),
            "OracleQueryTxObject" => serde_json::from_value(raw).map(TxObject::OracleQuery),
            "OracleResponseTxObject" => serde_json::from_value(raw).map(TxObject::OracleResponse),
            _ => serde_json::from_value(raw).map(TxObject::Generic),
        };
        parsed.map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTxObject {
    pub tx: TxObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsn: Option<u64>,
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleTxHash {
    pub tx: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleTxObject {
    pub tx: SignedTxObject,
}

/// Either a bare transaction hash or the full signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SingleTxHashOrObject {
    Hash(SingleTxHash),
    Object(SingleTxObject),
}

impl SingleTxHashOrObject {
    pub fn hash(&self) -> Option<&str> {
        match self {
            SingleTxHashOrObject::Hash(h) => Some(&h.tx),
            SingleTxHashOrObject::Object(_) => None,
        }
    }
}

impl TypedModel for SingleTxHashOrObject {
    const SCHEMA: &'static str = "SingleTxHashOrObject";

    fn from_instance_in(registry: &Registry, instance: &ModelInstance) -> Result<Self> {
        match instance.schema() {
            "SingleTxHash" => {
                SingleTxHash::from_instance_in(registry, instance).map(SingleTxHashOrObject::Hash)
            }
            "SingleTxObject" => {
                SingleTxObject::from_instance_in(registry, instance).map(SingleTxHashOrObject::Object)
            }
            other => Err(schema_mismatch(Self::SCHEMA, other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transactions(pub Vec<Tx>);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxObjects(pub Vec<SignedTxObject>);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxMsgPackHashes(pub Vec<EncodedHash>);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericTxArray(pub Vec<TxObject>);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spend_json() -> Value {
        json!({
            "vsn": 1,
            "data_schema": "SpendTxObject",
            "sender": "ak$sender",
            "recipient": "ak$recipient",
            "amount": 100,
            "fee": 1,
            "nonce": 4
        })
    }

    #[test]
    fn test_tx_object_dispatches_on_data_schema() {
        let tx = TxObject::from_wire(&spend_json()).unwrap();
        assert!(matches!(&tx, TxObject::Spend(spend) if spend.amount == 100));
        assert_eq!(tx.fee(), Some(1));
        assert_eq!(tx.to_wire().unwrap(), spend_json());
    }

    #[test]
    fn test_unknown_kind_falls_back_to_generic() {
        let tx = TxObject::from_wire(&json!({ "vsn": 2, "data_schema": "ChannelCreateTxObject" })).unwrap();
        assert_eq!(
            tx,
            TxObject::Generic(GenericTxObject {
                vsn: 2,
                data_schema: "ChannelCreateTxObject".to_string(),
            })
        );
    }

    #[test]
    fn test_union_decodes_object_shape() {
        let raw = json!({
            "tx": {
                "tx": spend_json(),
                "signatures": ["sg$one"]
            }
        });

        let decoded = SingleTxHashOrObject::from_wire(&raw).unwrap();
        match decoded {
            SingleTxHashOrObject::Object(obj) => {
                assert_eq!(obj.tx.signatures, vec!["sg$one".to_string()]);
                assert_eq!(obj.tx.tx.data_schema(), "SpendTxObject");
            }
            other => panic!("expected object shape, got {:?}", other),
        }
    }

    #[test]
    fn test_union_decodes_hash_shape() {
        let decoded = SingleTxHashOrObject::from_wire(&json!({ "tx": "th$abc" })).unwrap();
        assert_eq!(decoded.hash(), Some("th$abc"));
    }
}
