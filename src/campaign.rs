use crate::errors::AdsError;
use crate::operations::{
    labels_from, BiddingStrategyConfiguration, BudgetRef, Campaign as CampaignOperand,
    NetworkSetting, Operation, Operator, Status,
};

/// Longest campaign or ad group name the platform accepts.
pub const MAX_CHARS_NAME: usize = 255;

pub(crate) fn check_name(kind: &str, name: &str) -> Result<String, AdsError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AdsError::validation(format!("{} name is empty", kind)));
    }
    if name.chars().count() > MAX_CHARS_NAME {
        return Err(AdsError::validation(format!(
            "{} name is longer than {} characters",
            kind, MAX_CHARS_NAME
        )));
    }
    Ok(name.to_string())
}

/// Search campaign with manual CPC bidding on the Google search network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub name: String,
    pub budget_id: i64,
}

impl Campaign {
    /// `budget_id` may be a temp id of a budget created in the same batch.
    pub fn new(name: &str, budget_id: i64) -> Result<Self, AdsError> {
        Ok(Self {
            name: check_name("campaign", name)?,
            budget_id,
        })
    }

    pub fn add_operation(&self, status: Status, label_id: Option<i64>) -> Operation {
        self.add_operation_with_id(None, status, label_id)
    }

    /// Same as [`Campaign::add_operation`] but registers the campaign under a
    /// temp id, so ad groups in the same batch can refer to it.
    pub fn add_operation_with_id(
        &self,
        temp_id: Option<i64>,
        status: Status,
        label_id: Option<i64>,
    ) -> Operation {
        Operation::Campaign {
            operator: Operator::Add,
            operand: CampaignOperand {
                id: temp_id,
                name: Some(self.name.clone()),
                status: Some(status),
                budget: Some(BudgetRef {
                    budget_id: self.budget_id,
                }),
                advertising_channel_type: Some("SEARCH".to_string()),
                bidding_strategy_configuration: Some(BiddingStrategyConfiguration::manual_cpc()),
                network_setting: Some(NetworkSetting::google_search_only()),
                labels: labels_from(label_id),
            },
        }
    }

    pub fn set_name_operation(campaign_id: i64, new_name: &str) -> Result<Operation, AdsError> {
        Ok(Operation::Campaign {
            operator: Operator::Set,
            operand: CampaignOperand {
                id: Some(campaign_id),
                name: Some(check_name("campaign", new_name)?),
                ..Default::default()
            },
        })
    }

    pub fn set_status_operation(campaign_id: i64, status: Status) -> Operation {
        Operation::Campaign {
            operator: Operator::Set,
            operand: CampaignOperand {
                id: Some(campaign_id),
                status: Some(status),
                ..Default::default()
            },
        }
    }

    /// Campaigns cannot be removed, only set to REMOVED.
    pub fn delete_operation(campaign_id: i64) -> Operation {
        Self::set_status_operation(campaign_id, Status::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_campaign_payload() {
        let campaign = Campaign::new(" Brand ", -1).unwrap();
        assert_eq!(campaign.name, "Brand");

        assert_eq!(
            serde_json::to_value(campaign.add_operation(Status::Paused, None)).unwrap(),
            json!({
                "xsi_type": "CampaignOperation",
                "operator": "ADD",
                "operand": {
                    "name": "Brand",
                    "status": "PAUSED",
                    "budget": {"budgetId": -1},
                    "advertisingChannelType": "SEARCH",
                    "biddingStrategyConfiguration": {"biddingStrategyType": "MANUAL_CPC"},
                    "networkSetting": {
                        "targetGoogleSearch": true,
                        "targetSearchNetwork": false,
                        "targetContentNetwork": false,
                        "targetPartnerSearchNetwork": false
                    }
                }
            })
        );
    }

    #[test]
    fn test_name_checks() {
        assert!(Campaign::new("   ", 1).is_err());
        assert!(Campaign::set_name_operation(1, &"n".repeat(256)).is_err());

        let op = Campaign::set_name_operation(1, "New").unwrap();
        assert_eq!(
            serde_json::to_value(op).unwrap()["operand"],
            json!({"id": 1, "name": "New"})
        );
    }
}
