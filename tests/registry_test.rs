use epoch_models::core::catalog;
use epoch_models::{registry, Codec, ModelError};
use std::thread;

const INDEXED_SCHEMAS: &[&str] = &[
    "AccountBalance",
    "AccountsBalances",
    "Balance",
    "BlockHeight",
    "BlockTimeSummary",
    "EncodedHash",
    "Error",
    "GenericTxArray",
    "GenericTxObject",
    "Header",
    "Info",
    "InlineResponse200",
    "OracleQueryId",
    "OracleQueryTx",
    "OracleQuestions",
    "OracleQuestionsInner",
    "OracleRegisterTx",
    "OracleResponseTx",
    "Ping",
    "Pow",
    "PubKey",
    "RegisteredOracles",
    "RegisteredOraclesInner",
    "RelativeTTL",
    "SignedTxObject",
    "SingleTxHash",
    "SingleTxHashOrObject",
    "SingleTxObject",
    "SpendTx",
    "TTL",
    "Transactions",
    "Tx",
    "Uri",
    "Version",
    "Block",
    "CoinbaseTxObject",
    "GenericBlock",
    "OracleQueryTxObject",
    "OracleRegisterTxObject",
    "OracleResponseTxObject",
    "SpendTxObject",
    "Top",
    "TxMsgPackHashes",
    "TxObjects",
    "BlockWithTxs",
    "BlockWithTxsHashes",
];

/// 測試每個 model index 中的 schema 都能查到
#[test]
fn test_lookup_succeeds_for_every_indexed_schema() {
    for name in INDEXED_SCHEMAS {
        let desc = registry().lookup(name).unwrap();
        assert_eq!(desc.name, *name);
    }
    assert_eq!(registry().len(), INDEXED_SCHEMAS.len());
    assert_eq!(registry().names().collect::<Vec<_>>(), INDEXED_SCHEMAS.to_vec());
}

#[test]
fn test_lookup_fails_for_unregistered_names() {
    for name in ["", "blockheight", "BlockHeights", "ChannelCreateTx"] {
        match registry().lookup(name) {
            Err(ModelError::UnknownSchema { name: missing }) => assert_eq!(missing, name),
            other => panic!("expected UnknownSchema for {:?}, got {:?}", name, other),
        }
    }
}

#[test]
fn test_every_reference_resolves() {
    assert!(registry().check_references().is_ok());
    assert_eq!(catalog::epoch_descriptors().len(), INDEXED_SCHEMAS.len());
}

#[test]
fn test_unknown_schema_is_not_retryable() {
    let err = Codec::default()
        .from_wire("Nope", &serde_json::json!({}))
        .unwrap_err();
    assert!(!err.is_retryable());
}

/// 測試 registry 可在多執行緒下同時讀取
#[test]
fn test_registry_is_shared_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let name = INDEXED_SCHEMAS[i % INDEXED_SCHEMAS.len()];
                let instance = Codec::default()
                    .from_wire("BlockHeight", &serde_json::json!({ "height": i }))
                    .unwrap();
                (registry().lookup(name).is_ok(), instance)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (found, instance) = handle.join().unwrap();
        assert!(found);
        assert_eq!(instance.to_wire(), serde_json::json!({ "height": i }));
    }
}
