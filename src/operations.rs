//! Typed mutate operations.
//!
//! Every operation is a tagged variant carrying an operator and a typed
//! operand. The `xsi_type` tags and camelCase field names only appear when an
//! operation is serialized at the transport boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AdsError;

/// Kind of change an operation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    Add,
    Set,
    Remove,
}

/// Serving status shared by campaigns, ad groups, criteria and ads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Enabled,
    Paused,
    Removed,
}

impl FromStr for Status {
    type Err = AdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ENABLED" => Ok(Status::Enabled),
            "PAUSED" => Ok(Status::Paused),
            "REMOVED" => Ok(Status::Removed),
            other => Err(AdsError::validation(format!("unknown status '{}'", other))),
        }
    }
}

/// Keyword match type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl FromStr for MatchType {
    type Err = AdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXACT" => Ok(MatchType::Exact),
            "PHRASE" => Ok(MatchType::Phrase),
            "BROAD" => Ok(MatchType::Broad),
            other => Err(AdsError::validation(format!(
                "match type must be EXACT, PHRASE or BROAD, got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchType::Exact => "EXACT",
            MatchType::Phrase => "PHRASE",
            MatchType::Broad => "BROAD",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "xsi_type", rename = "Money")]
pub struct Money {
    #[serde(rename = "microAmount")]
    pub micro_amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "xsi_type", rename = "CpcBid")]
pub struct CpcBid {
    pub bid: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiddingStrategyConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding_strategy_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bids: Vec<CpcBid>,
}

impl BiddingStrategyConfiguration {
    /// Single CPC bid in micros.
    pub fn cpc(micro_amount: i64) -> Self {
        Self {
            bidding_strategy_type: None,
            bids: vec![CpcBid {
                bid: Money { micro_amount },
            }],
        }
    }

    pub fn manual_cpc() -> Self {
        Self {
            bidding_strategy_type: Some("MANUAL_CPC".to_string()),
            bids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalUrls {
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelRef {
    pub id: i64,
}

pub(crate) fn labels_from(label_id: Option<i64>) -> Vec<LabelRef> {
    label_id.map(|id| LabelRef { id }).into_iter().collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "xsi_type", rename = "Keyword", rename_all = "camelCase")]
pub struct KeywordCriterion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
}

impl KeywordCriterion {
    pub fn new(text: &str, match_type: MatchType) -> Self {
        Self {
            id: None,
            text: Some(text.to_string()),
            match_type: Some(match_type),
        }
    }

    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

// ============ Operands ============

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub budget_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_explicitly_shared: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRef {
    pub budget_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSetting {
    pub target_google_search: bool,
    pub target_search_network: bool,
    pub target_content_network: bool,
    pub target_partner_search_network: bool,
}

impl NetworkSetting {
    pub fn google_search_only() -> Self {
        Self {
            target_google_search: true,
            target_search_network: false,
            target_content_network: false,
            target_partner_search_network: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertising_channel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding_strategy_configuration: Option<BiddingStrategyConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_setting: Option<NetworkSetting>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding_strategy_configuration: Option<BiddingStrategyConfiguration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiddableAdGroupCriterion {
    pub ad_group_id: i64,
    pub criterion: KeywordCriterion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_urls: Option<FinalUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding_strategy_configuration: Option<BiddingStrategyConfiguration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativeAdGroupCriterion {
    pub ad_group_id: i64,
    pub criterion: KeywordCriterion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "xsi_type")]
pub enum AdGroupCriterion {
    BiddableAdGroupCriterion(BiddableAdGroupCriterion),
    NegativeAdGroupCriterion(NegativeAdGroupCriterion),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "xsi_type", rename = "NegativeCampaignCriterion", rename_all = "camelCase")]
pub struct NegativeCampaignCriterion {
    pub campaign_id: i64,
    pub criterion: KeywordCriterion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "xsi_type", rename = "ExpandedTextAd", rename_all = "camelCase")]
pub struct ExpandedTextAdPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline_part1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline_part2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupAd {
    pub ad_group_id: i64,
    pub ad: ExpandedTextAdPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "xsi_type", rename = "TextLabel")]
pub struct TextLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignLabel {
    pub campaign_id: i64,
    pub label_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupLabel {
    pub ad_group_id: i64,
    pub label_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupCriterionLabel {
    pub ad_group_id: i64,
    pub criterion_id: i64,
    pub label_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupAdLabel {
    pub ad_group_id: i64,
    pub ad_id: i64,
    pub label_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedSet {
    pub shared_set_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub set_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedCriterion {
    pub shared_set_id: i64,
    pub criterion: KeywordCriterion,
    pub negative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSharedSet {
    pub campaign_id: i64,
    pub shared_set_id: i64,
}

// ============ Operation ============

/// One mutate operation, ready to be sent by an uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "xsi_type")]
pub enum Operation {
    #[serde(rename = "BudgetOperation")]
    Budget { operator: Operator, operand: Budget },
    #[serde(rename = "CampaignOperation")]
    Campaign {
        operator: Operator,
        operand: Campaign,
    },
    #[serde(rename = "AdGroupOperation")]
    AdGroup {
        operator: Operator,
        operand: AdGroup,
    },
    #[serde(rename = "AdGroupCriterionOperation")]
    AdGroupCriterion {
        operator: Operator,
        operand: AdGroupCriterion,
    },
    #[serde(rename = "CampaignCriterionOperation")]
    CampaignCriterion {
        operator: Operator,
        operand: NegativeCampaignCriterion,
    },
    #[serde(rename = "AdGroupAdOperation")]
    AdGroupAd {
        operator: Operator,
        operand: AdGroupAd,
    },
    #[serde(rename = "LabelOperation")]
    Label {
        operator: Operator,
        operand: TextLabel,
    },
    #[serde(rename = "CampaignLabelOperation")]
    CampaignLabel {
        operator: Operator,
        operand: CampaignLabel,
    },
    #[serde(rename = "AdGroupLabelOperation")]
    AdGroupLabel {
        operator: Operator,
        operand: AdGroupLabel,
    },
    #[serde(rename = "AdGroupCriterionLabelOperation")]
    AdGroupCriterionLabel {
        operator: Operator,
        operand: AdGroupCriterionLabel,
    },
    #[serde(rename = "AdGroupAdLabelOperation")]
    AdGroupAdLabel {
        operator: Operator,
        operand: AdGroupAdLabel,
    },
    #[serde(rename = "SharedSetOperation")]
    SharedSet {
        operator: Operator,
        operand: SharedSet,
    },
    #[serde(rename = "SharedCriterionOperation")]
    SharedCriterion {
        operator: Operator,
        operand: SharedCriterion,
    },
    #[serde(rename = "CampaignSharedSetOperation")]
    CampaignSharedSet {
        operator: Operator,
        operand: CampaignSharedSet,
    },
}

impl Operation {
    pub fn operator(&self) -> Operator {
        match self {
            Operation::Budget { operator, .. }
            | Operation::Campaign { operator, .. }
            | Operation::AdGroup { operator, .. }
            | Operation::AdGroupCriterion { operator, .. }
            | Operation::CampaignCriterion { operator, .. }
            | Operation::AdGroupAd { operator, .. }
            | Operation::Label { operator, .. }
            | Operation::CampaignLabel { operator, .. }
            | Operation::AdGroupLabel { operator, .. }
            | Operation::AdGroupCriterionLabel { operator, .. }
            | Operation::AdGroupAdLabel { operator, .. }
            | Operation::SharedSet { operator, .. }
            | Operation::SharedCriterion { operator, .. }
            | Operation::CampaignSharedSet { operator, .. } => *operator,
        }
    }

    /// Name of the API service that accepts this operation.
    pub fn service_name(&self) -> &'static str {
        match self {
            Operation::Budget { .. } => "BudgetService",
            Operation::Campaign { .. } | Operation::CampaignLabel { .. } => "CampaignService",
            Operation::AdGroup { .. } | Operation::AdGroupLabel { .. } => "AdGroupService",
            Operation::AdGroupCriterion { .. } | Operation::AdGroupCriterionLabel { .. } => {
                "AdGroupCriterionService"
            }
            Operation::CampaignCriterion { .. } => "CampaignCriterionService",
            Operation::AdGroupAd { .. } | Operation::AdGroupAdLabel { .. } => "AdGroupAdService",
            Operation::Label { .. } => "LabelService",
            Operation::SharedSet { .. } => "SharedSetService",
            Operation::SharedCriterion { .. } => "SharedCriterionService",
            Operation::CampaignSharedSet { .. } => "CampaignSharedSetService",
        }
    }

    /// Label operations go through `mutateLabel` instead of `mutate`.
    pub fn is_label(&self) -> bool {
        matches!(
            self,
            Operation::CampaignLabel { .. }
                | Operation::AdGroupLabel { .. }
                | Operation::AdGroupCriterionLabel { .. }
                | Operation::AdGroupAdLabel { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_type_parsing() {
        assert_eq!("Exact".parse::<MatchType>().unwrap(), MatchType::Exact);
        assert_eq!(" broad ".parse::<MatchType>().unwrap(), MatchType::Broad);
        assert!("Exat".parse::<MatchType>().is_err());
    }

    #[test]
    fn test_wire_shape_of_biddable_criterion() {
        let operation = Operation::AdGroupCriterion {
            operator: Operator::Set,
            operand: AdGroupCriterion::BiddableAdGroupCriterion(BiddableAdGroupCriterion {
                ad_group_id: 10,
                criterion: KeywordCriterion::by_id(20),
                user_status: None,
                final_urls: None,
                bidding_strategy_configuration: Some(BiddingStrategyConfiguration::cpc(
                    1_000_000,
                )),
                labels: Vec::new(),
            }),
        };

        assert_eq!(
            serde_json::to_value(&operation).unwrap(),
            json!({
                "xsi_type": "AdGroupCriterionOperation",
                "operator": "SET",
                "operand": {
                    "xsi_type": "BiddableAdGroupCriterion",
                    "adGroupId": 10,
                    "criterion": {"xsi_type": "Keyword", "id": 20},
                    "biddingStrategyConfiguration": {
                        "bids": [{
                            "xsi_type": "CpcBid",
                            "bid": {"xsi_type": "Money", "microAmount": 1_000_000}
                        }]
                    }
                }
            })
        );
    }

    #[test]
    fn test_service_routing() {
        let label_op = Operation::AdGroupLabel {
            operator: Operator::Add,
            operand: AdGroupLabel {
                ad_group_id: 1,
                label_id: 2,
            },
        };
        assert!(label_op.is_label());
        assert_eq!(label_op.service_name(), "AdGroupService");
        assert_eq!(label_op.operator(), Operator::Add);

        let budget_op = Operation::Budget {
            operator: Operator::Remove,
            operand: Budget {
                budget_id: 5,
                ..Default::default()
            },
        };
        assert!(!budget_op.is_label());
        assert_eq!(budget_op.service_name(), "BudgetService");
    }
}
