//! Descriptors for every schema object of the Aeternity Epoch REST API.
//!
//! `allOf` compositions in the API document are expressed by concatenating the
//! shared field groups below.

use crate::core::registry::Registry;
use crate::domain::schema::{FieldSpec, FieldType, SchemaDescriptor};

use crate::domain::schema::FieldType::{Float, Integer, Model, String as Str};

const TTL_TYPES: &[&str] = &["delta", "block"];
const RELATIVE_TTL_TYPES: &[&str] = &["delta"];

pub const TX_OBJECT_SUBTYPES: &[&str] = &[
    "CoinbaseTxObject",
    "SpendTxObject",
    "OracleRegisterTxObject",
    "OracleQueryTxObject",
    "OracleResponseTxObject",
];

pub const BLOCK_SUBTYPES: &[&str] = &["BlockWithTxs", "BlockWithTxsHashes"];

/// Non-negative integer quantity (heights, fees, nonces, amounts).
fn uint(name: &'static str) -> FieldSpec {
    FieldSpec::required(name, Integer).at_least(0)
}

fn opt_uint(name: &'static str) -> FieldSpec {
    FieldSpec::optional(name, Integer).at_least(0)
}

fn list(item: FieldType) -> FieldType {
    FieldType::list_of(item)
}

fn with(mut base: Vec<FieldSpec>, extra: Vec<FieldSpec>) -> Vec<FieldSpec> {
    base.extend(extra);
    base
}

fn header_fields() -> Vec<FieldSpec> {
    vec![
        uint("height"),
        FieldSpec::required("prev_hash", Str),
        FieldSpec::required("state_hash", Str),
        FieldSpec::required("txs_hash", Str),
        uint("target"),
        uint("nonce"),
        uint("time"),
        uint("version"),
        // 創世區塊沒有 pow
        FieldSpec::optional("pow", Model("Pow")),
    ]
}

/// `vsn` + `data_schema`, the common part of every transaction object.
fn tx_object_fields() -> Vec<FieldSpec> {
    vec![uint("vsn"), FieldSpec::required("data_schema", Str)]
}

/// Subtypes pin `data_schema` to their own name.
fn pinned_tx_object_fields(pinned: &'static [&'static str]) -> Vec<FieldSpec> {
    vec![uint("vsn"), FieldSpec::required("data_schema", Str).one_of(pinned)]
}

fn block_data_schema(pinned: &'static [&'static str]) -> FieldSpec {
    FieldSpec::required("data_schema", Str).one_of(pinned)
}

fn oracle_query_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("sender", Str),
        FieldSpec::required("oracle_pubkey", Str),
        FieldSpec::required("query", Str),
        uint("query_fee"),
        FieldSpec::required("query_ttl", Model("TTL")),
        FieldSpec::required("response_ttl", Model("RelativeTTL")),
        uint("fee"),
    ]
}

fn oracle_register_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("account", Str),
        FieldSpec::required("query_format", Str),
        FieldSpec::required("response_format", Str),
        uint("query_fee"),
        FieldSpec::required("ttl", Model("TTL")),
        uint("fee"),
    ]
}

fn oracle_response_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("oracle", Str),
        FieldSpec::required("query_id", Str),
        FieldSpec::required("response", Str),
        uint("fee"),
    ]
}

/// All schemas, in the order of the generated model index.
pub fn epoch_descriptors() -> Vec<SchemaDescriptor> {
    vec![
        SchemaDescriptor::object(
            "AccountBalance",
            vec![FieldSpec::required("pub_key", Str), uint("balance")],
        ),
        SchemaDescriptor::object(
            "AccountsBalances",
            vec![FieldSpec::optional(
                "accounts_balances",
                list(Model("AccountBalance")),
            )],
        ),
        SchemaDescriptor::object("Balance", vec![opt_uint("balance")]),
        SchemaDescriptor::object("BlockHeight", vec![opt_uint("height")]),
        SchemaDescriptor::object(
            "BlockTimeSummary",
            vec![
                uint("height"),
                uint("time"),
                FieldSpec::required("difficulty", Float),
            ],
        ),
        SchemaDescriptor::object("EncodedHash", vec![FieldSpec::optional("hash", Str)]),
        SchemaDescriptor::object("Error", vec![FieldSpec::optional("reason", Str)]),
        SchemaDescriptor::array("GenericTxArray", Model("GenericTxObject")),
        SchemaDescriptor::object("GenericTxObject", tx_object_fields())
            .discriminated_by("data_schema", TX_OBJECT_SUBTYPES.to_vec()),
        SchemaDescriptor::object("Header", header_fields()),
        SchemaDescriptor::object(
            "Info",
            vec![FieldSpec::optional(
                "last_30_blocks_time",
                list(Model("BlockTimeSummary")),
            )],
        ),
        SchemaDescriptor::object(
            "InlineResponse200",
            vec![FieldSpec::optional("oracle_id", Str)],
        ),
        SchemaDescriptor::object("OracleQueryId", vec![FieldSpec::optional("query_id", Str)]),
        SchemaDescriptor::object("OracleQueryTx", oracle_query_fields()),
        SchemaDescriptor::array("OracleQuestions", Model("OracleQuestionsInner")),
        SchemaDescriptor::object(
            "OracleQuestionsInner",
            vec![
                FieldSpec::required("query_id", Str),
                FieldSpec::required("query", Str),
                uint("query_fee"),
                uint("expires_at"),
            ],
        ),
        SchemaDescriptor::object("OracleRegisterTx", oracle_register_fields()),
        SchemaDescriptor::object("OracleResponseTx", oracle_response_fields()),
        SchemaDescriptor::object(
            "Ping",
            vec![
                FieldSpec::required("source", Str),
                FieldSpec::required("genesis_hash", Str),
                FieldSpec::required("best_hash", Str),
                FieldSpec::required("difficulty", Float),
                opt_uint("share"),
                FieldSpec::optional("peers", list(Str)),
            ],
        ),
        SchemaDescriptor::array("Pow", Integer).items_at_least(0),
        SchemaDescriptor::object("PubKey", vec![FieldSpec::optional("pub_key", Str)]),
        SchemaDescriptor::array("RegisteredOracles", Model("RegisteredOraclesInner")),
        SchemaDescriptor::object(
            "RegisteredOraclesInner",
            vec![
                FieldSpec::required("address", Str),
                FieldSpec::required("query_format", Str),
                FieldSpec::required("response_format", Str),
                uint("query_fee"),
                uint("expires_at"),
            ],
        ),
        SchemaDescriptor::object(
            "RelativeTTL",
            vec![
                FieldSpec::required("type", Str).one_of(RELATIVE_TTL_TYPES),
                uint("value"),
            ],
        ),
        SchemaDescriptor::object(
            "SignedTxObject",
            vec![
                FieldSpec::required("tx", Model("GenericTxObject")),
                FieldSpec::optional("data_schema", Str),
                opt_uint("vsn"),
                FieldSpec::required("signatures", list(Str)),
            ],
        ),
        SchemaDescriptor::object("SingleTxHash", vec![FieldSpec::required("tx", Str)]),
        SchemaDescriptor::union("SingleTxHashOrObject", vec!["SingleTxHash", "SingleTxObject"]),
        SchemaDescriptor::object(
            "SingleTxObject",
            vec![FieldSpec::required("tx", Model("SignedTxObject"))],
        ),
        SchemaDescriptor::object(
            "SpendTx",
            vec![
                FieldSpec::required("recipient_pubkey", Str),
                uint("amount"),
                uint("fee"),
                opt_uint("nonce"),
                FieldSpec::optional("payload", Str),
            ],
        ),
        SchemaDescriptor::object(
            "TTL",
            vec![FieldSpec::required("type", Str).one_of(TTL_TYPES), uint("value")],
        ),
        SchemaDescriptor::array("Transactions", Model("Tx")),
        SchemaDescriptor::object("Tx", vec![FieldSpec::optional("tx", Str)]),
        SchemaDescriptor::object("Uri", vec![FieldSpec::optional("uri", Str)]),
        SchemaDescriptor::object(
            "Version",
            vec![
                FieldSpec::required("version", Str),
                FieldSpec::required("revision", Str),
                FieldSpec::required("genesis_hash", Str),
            ],
        ),
        SchemaDescriptor::object(
            "Block",
            with(
                header_fields(),
                vec![FieldSpec::optional(
                    "transactions",
                    list(Model("SignedTxObject")),
                )],
            ),
        ),
        SchemaDescriptor::object(
            "CoinbaseTxObject",
            with(
                pinned_tx_object_fields(&["CoinbaseTxObject"]),
                vec![FieldSpec::required("account", Str)],
            ),
        ),
        SchemaDescriptor::object(
            "GenericBlock",
            with(
                header_fields(),
                vec![FieldSpec::required("data_schema", Str)],
            ),
        )
        .discriminated_by("data_schema", BLOCK_SUBTYPES.to_vec()),
        SchemaDescriptor::object(
            "OracleQueryTxObject",
            with(
                with(
                    pinned_tx_object_fields(&["OracleQueryTxObject"]),
                    oracle_query_fields(),
                ),
                vec![opt_uint("nonce")],
            ),
        ),
        SchemaDescriptor::object(
            "OracleRegisterTxObject",
            with(
                with(
                    pinned_tx_object_fields(&["OracleRegisterTxObject"]),
                    oracle_register_fields(),
                ),
                vec![opt_uint("nonce")],
            ),
        ),
        SchemaDescriptor::object(
            "OracleResponseTxObject",
            with(
                with(
                    pinned_tx_object_fields(&["OracleResponseTxObject"]),
                    oracle_response_fields(),
                ),
                vec![opt_uint("nonce")],
            ),
        ),
        SchemaDescriptor::object(
            "SpendTxObject",
            with(
                pinned_tx_object_fields(&["SpendTxObject"]),
                vec![
                    FieldSpec::required("sender", Str),
                    FieldSpec::required("recipient", Str),
                    uint("amount"),
                    uint("fee"),
                    opt_uint("nonce"),
                    FieldSpec::optional("payload", Str),
                ],
            ),
        ),
        SchemaDescriptor::object(
            "Top",
            with(header_fields(), vec![FieldSpec::required("hash", Str)]),
        ),
        SchemaDescriptor::array("TxMsgPackHashes", Model("EncodedHash")),
        SchemaDescriptor::array("TxObjects", Model("SignedTxObject")),
        SchemaDescriptor::object(
            "BlockWithTxs",
            with(
                header_fields(),
                vec![
                    block_data_schema(&["BlockWithTxs"]),
                    FieldSpec::optional("transactions", Model("TxObjects")),
                ],
            ),
        ),
        SchemaDescriptor::object(
            "BlockWithTxsHashes",
            with(
                header_fields(),
                vec![
                    block_data_schema(&["BlockWithTxsHashes"]),
                    FieldSpec::optional("transactions", Model("TxMsgPackHashes")),
                ],
            ),
        ),
    ]
}

pub fn epoch_registry() -> Registry {
    epoch_descriptors()
        .into_iter()
        .fold(Registry::builder(), |builder, desc| builder.register(desc))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_every_indexed_schema() {
        let registry = epoch_registry();
        assert_eq!(registry.len(), 46);
        assert!(registry.check_references().is_ok());
    }

    #[test]
    fn test_subtypes_pin_their_discriminator() {
        let registry = epoch_registry();
        for subtype in TX_OBJECT_SUBTYPES.iter().chain(BLOCK_SUBTYPES) {
            let desc = registry.lookup(subtype).unwrap();
            let data_schema = desc.field("data_schema").unwrap();
            assert_eq!(data_schema.allowed, Some(&[*subtype][..]));
        }
    }
}
