use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub pub_key: String,
    pub balance: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountsBalances {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts_balances: Option<Vec<AccountBalance>>,
}

impl AccountsBalances {
    /// Sum of every listed balance, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.accounts_balances
            .iter()
            .flatten()
            .try_fold(0u64, |acc, entry| acc.checked_add(entry.balance))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
}
