use std::fmt;

use serde::Deserialize;

/// Label attached to an account in the manager account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountLabel {
    pub name: String,
    pub id: i64,
}

impl fmt::Display for AccountLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Customer ids come back as numbers or as dashed strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerId::Number(id) => write!(f, "{}", id),
            CustomerId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// `ManagedCustomer` entry as returned by the managed customer service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedCustomer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub date_time_zone: Option<String>,
    #[serde(default)]
    pub can_manage_clients: Option<bool>,
    #[serde(default)]
    pub test_account: Option<bool>,
    #[serde(default)]
    pub account_labels: Option<Vec<AccountLabel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub id: Option<String>,
    pub currency: Option<String>,
    pub time_zone: Option<String>,
    pub is_mcc: Option<bool>,
    pub is_test: Option<bool>,
    pub labels: Option<Vec<AccountLabel>>,
}

impl Account {
    /// Account known only by name, e.g. to look it up later.
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn from_managed_customer(customer: ManagedCustomer) -> Self {
        Self {
            name: customer.name.unwrap_or_default(),
            id: customer.customer_id.map(|id| id.to_string()),
            currency: customer.currency_code,
            time_zone: customer.date_time_zone,
            is_mcc: customer.can_manage_clients,
            is_test: customer.test_account,
            labels: customer.account_labels,
        }
    }

    pub fn has_label(&self, label_name: &str) -> bool {
        self.labels
            .as_ref()
            .is_some_and(|labels| labels.iter().any(|l| l.name == label_name))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} ({})", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}
