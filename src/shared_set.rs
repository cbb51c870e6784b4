//! Negative keyword lists shared between campaigns.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::campaign::check_name;
use crate::errors::AdsError;
use crate::operations::{CampaignSharedSet, Operation, Operator, SharedSet as SharedSetOperand};
use crate::selector::Predicate;
use crate::service::AdsService;
use crate::temp_id::TempId;
use crate::transport::AdsTransport;

const NEGATIVE_KEYWORDS: &str = "NEGATIVE_KEYWORDS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedSet {
    pub name: String,
}

impl SharedSet {
    pub fn new(name: &str) -> Result<Self, AdsError> {
        Ok(Self {
            name: check_name("shared set", name)?,
        })
    }

    /// Creates the set under a temp id; negative keywords and campaign
    /// attachments in the same batch can use it right away.
    pub fn add_operation(&self, temp_id: TempId) -> Operation {
        Operation::SharedSet {
            operator: Operator::Add,
            operand: SharedSetOperand {
                shared_set_id: temp_id.get(),
                name: Some(self.name.clone()),
                set_type: Some(NEGATIVE_KEYWORDS.to_string()),
            },
        }
    }

    pub fn delete_operation(shared_set_id: i64) -> Operation {
        Operation::SharedSet {
            operator: Operator::Remove,
            operand: SharedSetOperand {
                shared_set_id,
                ..Default::default()
            },
        }
    }

    pub fn attach_to_campaign_operation(shared_set_id: i64, campaign_id: i64) -> Operation {
        Operation::CampaignSharedSet {
            operator: Operator::Add,
            operand: CampaignSharedSet {
                campaign_id,
                shared_set_id,
            },
        }
    }

    pub fn detach_from_campaign_operation(shared_set_id: i64, campaign_id: i64) -> Operation {
        Operation::CampaignSharedSet {
            operator: Operator::Remove,
            operand: CampaignSharedSet {
                campaign_id,
                shared_set_id,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SharedSetEntry {
    shared_set_id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignSharedSetEntry {
    shared_set_id: i64,
    campaign_id: i64,
    #[serde(default)]
    campaign_name: Option<String>,
}

/// One shared set and, if attached, one of its campaigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedSetRow {
    pub shared_set_id: i64,
    pub shared_set_name: String,
    pub status: Option<String>,
    pub campaign_id: Option<i64>,
    pub campaign_name: Option<String>,
}

/// Negative keyword shared sets of an account with their campaign attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedSetOverview {
    pub rows: Vec<SharedSetRow>,
}

impl SharedSetOverview {
    pub async fn load<T: AdsTransport>(service: &AdsService<T>) -> Result<Self, AdsError> {
        let sets = service
            .download_objects(
                "SharedSetService",
                &["SharedSetId", "Name", "Type", "Status"],
                vec![Predicate::equals("Type", NEGATIVE_KEYWORDS)],
            )
            .await?
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<SharedSetEntry>, _>>()?;

        let attachments = service
            .download_objects(
                "CampaignSharedSetService",
                &["SharedSetId", "CampaignId", "CampaignName"],
                vec![Predicate::equals("SharedSetType", NEGATIVE_KEYWORDS)],
            )
            .await?
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<CampaignSharedSetEntry>, _>>()?;

        let overview = Self::from_entries(sets, attachments);
        tracing::info!("Loaded {} shared set rows", overview.rows.len());
        Ok(overview)
    }

    fn from_entries(sets: Vec<SharedSetEntry>, attachments: Vec<CampaignSharedSetEntry>) -> Self {
        let mut by_set: BTreeMap<i64, Vec<CampaignSharedSetEntry>> = BTreeMap::new();
        for attachment in attachments {
            by_set
                .entry(attachment.shared_set_id)
                .or_default()
                .push(attachment);
        }

        let mut rows = Vec::new();
        for set in sets {
            match by_set.remove(&set.shared_set_id) {
                Some(campaigns) => {
                    for campaign in campaigns {
                        rows.push(SharedSetRow {
                            shared_set_id: set.shared_set_id,
                            shared_set_name: set.name.clone(),
                            status: set.status.clone(),
                            campaign_id: Some(campaign.campaign_id),
                            campaign_name: campaign.campaign_name,
                        });
                    }
                }
                None => rows.push(SharedSetRow {
                    shared_set_id: set.shared_set_id,
                    shared_set_name: set.name,
                    status: set.status,
                    campaign_id: None,
                    campaign_name: None,
                }),
            }
        }

        Self { rows }
    }

    pub fn shared_set_id(&self, name: &str) -> Option<i64> {
        self.rows
            .iter()
            .find(|row| row.shared_set_name == name)
            .map(|row| row.shared_set_id)
    }

    /// Campaign ids the shared set is attached to.
    pub fn campaigns_of(&self, shared_set_id: i64) -> Vec<i64> {
        self.rows
            .iter()
            .filter(|row| row.shared_set_id == shared_set_id)
            .filter_map(|row| row.campaign_id)
            .collect()
    }
}
