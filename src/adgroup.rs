use crate::campaign::check_name;
use crate::errors::AdsError;
use crate::money::{euro_to_micro, is_good_micro_bid};
use crate::operations::{
    labels_from, AdGroup as AdGroupOperand, BiddingStrategyConfiguration, Operation, Operator,
    Status,
};

/// Ad group with a default max CPC for its keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdGroup {
    pub name: String,
    pub campaign_id: i64,
    pub micro_max_cpc: i64,
}

fn checked_bid(max_cpc: f64) -> Result<i64, AdsError> {
    let micro = euro_to_micro(max_cpc);
    if !is_good_micro_bid(micro) {
        return Err(AdsError::validation(format!(
            "ad group bid {} is out of range",
            max_cpc
        )));
    }
    Ok(micro)
}

impl AdGroup {
    /// `campaign_id` may be a temp id of a campaign created in the same batch.
    pub fn new(name: &str, campaign_id: i64, max_cpc: f64) -> Result<Self, AdsError> {
        Ok(Self {
            name: check_name("ad group", name)?,
            campaign_id,
            micro_max_cpc: checked_bid(max_cpc)?,
        })
    }

    pub fn add_operation(
        &self,
        temp_id: Option<i64>,
        status: Status,
        label_id: Option<i64>,
    ) -> Operation {
        Operation::AdGroup {
            operator: Operator::Add,
            operand: AdGroupOperand {
                id: temp_id,
                campaign_id: Some(self.campaign_id),
                name: Some(self.name.clone()),
                status: Some(status),
                bidding_strategy_configuration: Some(BiddingStrategyConfiguration::cpc(
                    self.micro_max_cpc,
                )),
                labels: labels_from(label_id),
            },
        }
    }

    pub fn set_name_operation(adgroup_id: i64, new_name: &str) -> Result<Operation, AdsError> {
        Ok(Operation::AdGroup {
            operator: Operator::Set,
            operand: AdGroupOperand {
                id: Some(adgroup_id),
                name: Some(check_name("ad group", new_name)?),
                ..Default::default()
            },
        })
    }

    pub fn set_status_operation(adgroup_id: i64, status: Status) -> Operation {
        Operation::AdGroup {
            operator: Operator::Set,
            operand: AdGroupOperand {
                id: Some(adgroup_id),
                status: Some(status),
                ..Default::default()
            },
        }
    }

    pub fn set_bid_operation(adgroup_id: i64, max_cpc: f64) -> Result<Operation, AdsError> {
        Ok(Operation::AdGroup {
            operator: Operator::Set,
            operand: AdGroupOperand {
                id: Some(adgroup_id),
                bidding_strategy_configuration: Some(BiddingStrategyConfiguration::cpc(
                    checked_bid(max_cpc)?,
                )),
                ..Default::default()
            },
        })
    }

    /// Ad groups cannot be removed, only set to REMOVED.
    pub fn delete_operation(adgroup_id: i64) -> Operation {
        Self::set_status_operation(adgroup_id, Status::Removed)
    }
}
