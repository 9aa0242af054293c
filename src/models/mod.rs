//! One Rust type per Epoch API schema object.
//!
//! Typed decoding always goes through the schema codec first, so a typed
//! value is only produced from payloads that pass the same required-field,
//! enum and range checks as the generic [`ModelInstance`].

pub mod account;
pub mod block;
pub mod node;
pub mod oracle;
pub mod tx;

pub use account::{AccountBalance, AccountsBalances, Balance, PubKey};
pub use block::{
    Block, BlockHeight, BlockTimeSummary, BlockWithTxs, BlockWithTxsHashes, GenericBlock, Header,
    Info, Pow, Top,
};
pub use node::{Error, Ping, Uri, Version};
pub use oracle::{
    InlineResponse200, OracleQueryId, OracleQueryTx, OracleQueryTxObject, OracleQuestions,
    OracleQuestionsInner, OracleRegisterTx, OracleRegisterTxObject, OracleResponseTx,
    OracleResponseTxObject, RegisteredOracles, RegisteredOraclesInner, RelativeTtl,
    RelativeTtlType, Ttl, TtlType,
};
pub use tx::{
    CoinbaseTxObject, EncodedHash, GenericTxArray, GenericTxObject, SignedTxObject, SingleTxHash,
    SingleTxHashOrObject, SingleTxObject, SpendTx, SpendTxObject, Transactions, Tx,
    TxMsgPackHashes, TxObject, TxObjects,
};

use crate::core::codec::Codec;
use crate::core::registry::{registry, Registry};
use crate::domain::model::ModelInstance;
use crate::utils::error::{ModelError, Result, ValidationError, ViolationKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A statically typed view of one registered schema.
pub trait TypedModel: Serialize + DeserializeOwned {
    /// Registry name of the schema this type represents.
    const SCHEMA: &'static str;

    fn from_wire(raw: &Value) -> Result<Self> {
        Self::from_wire_with(&Codec::default(), raw)
    }

    fn from_wire_with(codec: &Codec<'_>, raw: &Value) -> Result<Self> {
        let instance = codec.from_wire(Self::SCHEMA, raw)?;
        Self::from_instance_in(codec.registry(), &instance)
    }

    /// Materialize from an already validated instance of this schema or of
    /// one of its subtypes, as described by the Epoch registry.
    fn from_instance(instance: &ModelInstance) -> Result<Self> {
        Self::from_instance_in(registry(), instance)
    }

    fn from_instance_in(registry: &Registry, instance: &ModelInstance) -> Result<Self> {
        let expected = registry.lookup(Self::SCHEMA)?;
        if !expected.accepts(instance.schema()) {
            return Err(schema_mismatch(Self::SCHEMA, instance.schema()));
        }
        serde_json::from_value(instance.to_wire()).map_err(|e| {
            tracing::debug!("Typed decode of {} failed: {}", instance.schema(), e);
            ModelError::Validation(ValidationError {
                model: instance.schema().to_string(),
                field: "$".to_string(),
                path: "$".to_string(),
                kind: ViolationKind::TypeMismatch,
                expected: format!("{} ({})", Self::SCHEMA, e),
            })
        })
    }

    fn to_wire(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Re-validate through the codec and return the generic instance.
    fn to_instance(&self) -> Result<ModelInstance> {
        Codec::default().from_wire(Self::SCHEMA, &self.to_wire()?)
    }
}

pub(crate) fn schema_mismatch(expected: &str, actual: &str) -> ModelError {
    ModelError::Validation(ValidationError {
        model: actual.to_string(),
        field: "$".to_string(),
        path: "$".to_string(),
        kind: ViolationKind::TypeMismatch,
        expected: expected.to_string(),
    })
}

macro_rules! typed_models {
    ($($ty:ty => $schema:literal),* $(,)?) => {
        $(
            impl TypedModel for $ty {
                const SCHEMA: &'static str = $schema;
            }
        )*
    };
}

typed_models! {
    AccountBalance => "AccountBalance",
    AccountsBalances => "AccountsBalances",
    Balance => "Balance",
    BlockHeight => "BlockHeight",
    BlockTimeSummary => "BlockTimeSummary",
    EncodedHash => "EncodedHash",
    Error => "Error",
    GenericTxArray => "GenericTxArray",
    GenericTxObject => "GenericTxObject",
    Header => "Header",
    Info => "Info",
    InlineResponse200 => "InlineResponse200",
    OracleQueryId => "OracleQueryId",
    OracleQueryTx => "OracleQueryTx",
    OracleQuestions => "OracleQuestions",
    OracleQuestionsInner => "OracleQuestionsInner",
    OracleRegisterTx => "OracleRegisterTx",
    OracleResponseTx => "OracleResponseTx",
    Ping => "Ping",
    Pow => "Pow",
    PubKey => "PubKey",
    RegisteredOracles => "RegisteredOracles",
    RegisteredOraclesInner => "RegisteredOraclesInner",
    RelativeTtl => "RelativeTTL",
    SignedTxObject => "SignedTxObject",
    SingleTxHash => "SingleTxHash",
    SingleTxObject => "SingleTxObject",
    SpendTx => "SpendTx",
    Ttl => "TTL",
    Transactions => "Transactions",
    Tx => "Tx",
    Uri => "Uri",
    Version => "Version",
    Block => "Block",
    CoinbaseTxObject => "CoinbaseTxObject",
    GenericBlock => "GenericBlock",
    OracleQueryTxObject => "OracleQueryTxObject",
    OracleRegisterTxObject => "OracleRegisterTxObject",
    OracleResponseTxObject => "OracleResponseTxObject",
    SpendTxObject => "SpendTxObject",
    Top => "Top",
    TxMsgPackHashes => "TxMsgPackHashes",
    TxObjects => "TxObjects",
    BlockWithTxs => "BlockWithTxs",
    BlockWithTxsHashes => "BlockWithTxsHashes",
    // 依 data_schema 分派的交易物件
    TxObject => "GenericTxObject",
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_schema_has_a_registered_name() {
        let names = [
            AccountBalance::SCHEMA,
            RelativeTtl::SCHEMA,
            Ttl::SCHEMA,
            SingleTxHashOrObject::SCHEMA,
            TxObject::SCHEMA,
            BlockWithTxsHashes::SCHEMA,
        ];
        for name in names {
            assert!(registry().contains(name), "{} is not registered", name);
        }
    }

    #[test]
    fn test_from_instance_rejects_other_schema() {
        let instance = Codec::default()
            .from_wire("Balance", &json!({ "balance": 3 }))
            .unwrap();
        let err = BlockHeight::from_instance(&instance).unwrap_err();
        assert_eq!(err.as_validation().map(|v| v.kind), Some(ViolationKind::TypeMismatch));
    }

    /// 測試自訂 registry 的子型別關係也適用於 typed model
    #[test]
    fn test_from_wire_with_uses_codec_registry() {
        use crate::core::union::UnionPolicy;
        use crate::domain::schema::{FieldSpec, FieldType, SchemaDescriptor};

        let custom = Registry::builder()
            .register(SchemaDescriptor::object(
                "BlockHeight",
                vec![FieldSpec::optional("height", FieldType::Integer).at_least(0)],
            ))
            .register(SchemaDescriptor::union("Balance", vec!["BlockHeight"]))
            .build();
        let codec = Codec::new(&custom, UnionPolicy::Strict);

        let balance = Balance::from_wire_with(&codec, &json!({ "height": 5 })).unwrap();
        assert_eq!(balance.balance, None);

        // 全域 registry 的 Balance 不接受 BlockHeight
        let instance = codec.from_wire("Balance", &json!({ "height": 5 })).unwrap();
        assert!(Balance::from_instance(&instance).is_err());
    }

    #[test]
    fn test_typed_decode_failure_is_a_validation_error() {
        use crate::core::union::UnionPolicy;
        use crate::domain::schema::{FieldSpec, FieldType, SchemaDescriptor};

        // 描述與 Rust 型別不一致時，錯誤仍以 ValidationError 呈現
        let custom = Registry::builder()
            .register(SchemaDescriptor::object(
                "Balance",
                vec![FieldSpec::optional("balance", FieldType::String)],
            ))
            .build();
        let codec = Codec::new(&custom, UnionPolicy::Strict);

        let err = Balance::from_wire_with(&codec, &json!({ "balance": "lots" })).unwrap_err();
        let violation = err.as_validation().unwrap();
        assert_eq!(violation.model, "Balance");
        assert_eq!(violation.kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_full_width_pow_decodes() {
        let header = json!({
            "height": 1,
            "prev_hash": "bh$prev",
            "state_hash": "bs$state",
            "txs_hash": "bx$txs",
            "target": 1,
            "nonce": 1,
            "time": 1,
            "version": 1,
            "pow": [5_000_000_000u64]
        });
        let decoded = Header::from_wire(&header).unwrap();
        assert_eq!(decoded.pow, Some(Pow(vec![5_000_000_000])));

        let mut negative = header;
        negative["pow"] = json!([-1]);
        let err = Header::from_wire(&negative).unwrap_err();
        assert_eq!(err.as_validation().map(|v| v.kind), Some(ViolationKind::OutOfRange));
    }
}
