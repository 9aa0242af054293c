use anyhow::Result;
use epoch_models::domain::schema::{FieldSpec, FieldType, SchemaDescriptor};
use epoch_models::models::SingleTxHashOrObject;
use epoch_models::{from_wire, Codec, FieldValue, ModelError, Registry, TomlConfig, TypedModel, UnionPolicy};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn signed_spend() -> serde_json::Value {
    json!({
        "tx": {
            "vsn": 1,
            "data_schema": "SpendTxObject",
            "sender": "ak$sender",
            "recipient": "ak$recipient",
            "amount": 10,
            "fee": 1
        },
        "signatures": ["sg$one", "sg$two"]
    })
}

/// 兩個候選都能接受 `{"id": ...}` 的 registry
fn overlapping_registry() -> Registry {
    Registry::builder()
        .register(SchemaDescriptor::object(
            "ById",
            vec![FieldSpec::required("id", FieldType::String)],
        ))
        .register(SchemaDescriptor::object(
            "ByIdAndLabel",
            vec![
                FieldSpec::required("id", FieldType::String),
                FieldSpec::optional("label", FieldType::String),
            ],
        ))
        .register(SchemaDescriptor::union("Lookup", vec!["ById", "ByIdAndLabel"]))
        .build()
}

#[test]
fn test_hash_shape_selects_single_tx_hash() -> Result<()> {
    let instance = from_wire("SingleTxHashOrObject", &json!({ "tx": "th$2Zbq" }))?;
    assert_eq!(instance.schema(), "SingleTxHash");
    assert_eq!(instance.to_wire(), json!({ "tx": "th$2Zbq" }));
    Ok(())
}

#[test]
fn test_object_shape_selects_single_tx_object() -> Result<()> {
    let raw = json!({ "tx": signed_spend() });
    let instance = from_wire("SingleTxHashOrObject", &raw)?;
    assert_eq!(instance.schema(), "SingleTxObject");

    let signed = instance.get("tx").and_then(FieldValue::as_model);
    assert_eq!(signed.map(|m| m.schema()), Some("SignedTxObject"));
    assert_eq!(instance.to_wire(), raw);

    let typed = SingleTxHashOrObject::from_wire(&raw)?;
    assert!(typed.hash().is_none());
    Ok(())
}

/// 測試兩種形狀都不符合時，錯誤列出每個候選的失敗原因
#[test]
fn test_neither_shape_matches() {
    let result = from_wire("SingleTxHashOrObject", &json!({ "tx": 42 }));
    match result {
        Err(ModelError::AmbiguousOrUnmatchedUnion {
            union_schema,
            matched,
            attempts,
        }) => {
            assert_eq!(union_schema, "SingleTxHashOrObject");
            assert!(matched.is_empty());
            let candidates: Vec<&str> = attempts.iter().map(|a| a.candidate.as_str()).collect();
            assert_eq!(candidates, vec!["SingleTxHash", "SingleTxObject"]);
            assert!(attempts.iter().all(|a| a.failure.is_some()));
        }
        other => panic!("expected unmatched union, got {:?}", other),
    }
}

#[test]
fn test_missing_key_matches_no_candidate() {
    let result = from_wire("SingleTxHashOrObject", &json!({}));
    assert!(matches!(
        result,
        Err(ModelError::AmbiguousOrUnmatchedUnion { ref matched, .. }) if matched.is_empty()
    ));
}

#[test]
fn test_strict_policy_rejects_ambiguous_payload() {
    let registry = overlapping_registry();
    let codec = Codec::new(&registry, UnionPolicy::Strict);

    match codec.from_wire("Lookup", &json!({ "id": "x" })) {
        Err(err @ ModelError::AmbiguousOrUnmatchedUnion { .. }) => {
            assert!(err.to_string().contains("Ambiguous union 'Lookup'"));
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }
}

#[test]
fn test_first_match_policy_takes_declared_order() -> Result<()> {
    let registry = overlapping_registry();
    let codec = Codec::new(&registry, UnionPolicy::FirstMatch);

    let instance = codec.from_wire("Lookup", &json!({ "id": "x" }))?;
    assert_eq!(instance.schema(), "ById");

    // 只有第二個候選接受 label 時仍然會選到它
    let labelled = codec.construct(
        "Lookup",
        vec![("id", FieldValue::from("y")), ("label", FieldValue::from("why"))],
    )?;
    assert_eq!(labelled.schema(), "ByIdAndLabel");
    Ok(())
}

/// 測試從設定檔選擇 union 策略
#[test]
fn test_union_policy_from_config_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "[codec]")?;
    writeln!(file, "union_policy = \"first_match\"")?;

    let config = TomlConfig::from_file(file.path())?;
    let registry = overlapping_registry();
    let codec = Codec::new(&registry, config.codec().policy());

    let instance = codec.from_wire("Lookup", &json!({ "id": "z" }))?;
    assert_eq!(instance.schema(), "ById");
    Ok(())
}
