use serde_json::Value;

use crate::errors::AdsError;
use crate::operations::{
    AdGroupAdLabel, AdGroupCriterionLabel, AdGroupLabel, CampaignLabel, Operation, Operator,
    TextLabel,
};
use crate::service::AdsService;
use crate::transport::AdsTransport;
use crate::upload::{UploadPayload, UploadOptions};

pub const MAX_CHARS_LABEL_NAME: usize = 80;

/// Text label. Apply and remove operations need the label id, see
/// [`Label::update_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub id: Option<i64>,
}

impl Label {
    pub fn new(name: &str) -> Result<Self, AdsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AdsError::validation("label name is empty"));
        }
        if name.chars().count() > MAX_CHARS_LABEL_NAME {
            return Err(AdsError::validation(format!(
                "label name is longer than {} characters",
                MAX_CHARS_LABEL_NAME
            )));
        }

        Ok(Self {
            name: name.to_string(),
            id: None,
        })
    }

    pub fn with_id(name: &str, id: i64) -> Result<Self, AdsError> {
        let mut label = Self::new(name)?;
        label.id = Some(id);
        Ok(label)
    }

    fn require_id(&self) -> Result<i64, AdsError> {
        self.id.ok_or_else(|| {
            AdsError::validation(format!("label '{}' has no id, call update_id first", self.name))
        })
    }

    pub fn add_operation(&self) -> Operation {
        Operation::Label {
            operator: Operator::Add,
            operand: TextLabel {
                id: None,
                name: Some(self.name.clone()),
            },
        }
    }

    pub fn delete_operation(label_id: i64) -> Operation {
        Operation::Label {
            operator: Operator::Remove,
            operand: TextLabel {
                id: Some(label_id),
                name: None,
            },
        }
    }

    pub fn apply_on_campaign_operation(&self, campaign_id: i64) -> Result<Operation, AdsError> {
        self.campaign_operation(Operator::Add, campaign_id)
    }

    pub fn remove_from_campaign_operation(&self, campaign_id: i64) -> Result<Operation, AdsError> {
        self.campaign_operation(Operator::Remove, campaign_id)
    }

    pub fn apply_on_adgroup_operation(&self, adgroup_id: i64) -> Result<Operation, AdsError> {
        self.adgroup_operation(Operator::Add, adgroup_id)
    }

    pub fn remove_from_adgroup_operation(&self, adgroup_id: i64) -> Result<Operation, AdsError> {
        self.adgroup_operation(Operator::Remove, adgroup_id)
    }

    pub fn apply_on_keyword_operation(
        &self,
        adgroup_id: i64,
        keyword_id: i64,
    ) -> Result<Operation, AdsError> {
        self.keyword_operation(Operator::Add, adgroup_id, keyword_id)
    }

    pub fn remove_from_keyword_operation(
        &self,
        adgroup_id: i64,
        keyword_id: i64,
    ) -> Result<Operation, AdsError> {
        self.keyword_operation(Operator::Remove, adgroup_id, keyword_id)
    }

    pub fn apply_on_ad_operation(&self, adgroup_id: i64, ad_id: i64) -> Result<Operation, AdsError> {
        self.ad_operation(Operator::Add, adgroup_id, ad_id)
    }

    pub fn remove_from_ad_operation(
        &self,
        adgroup_id: i64,
        ad_id: i64,
    ) -> Result<Operation, AdsError> {
        self.ad_operation(Operator::Remove, adgroup_id, ad_id)
    }

    fn campaign_operation(&self, operator: Operator, campaign_id: i64) -> Result<Operation, AdsError> {
        Ok(Operation::CampaignLabel {
            operator,
            operand: CampaignLabel {
                campaign_id,
                label_id: self.require_id()?,
            },
        })
    }

    fn adgroup_operation(&self, operator: Operator, adgroup_id: i64) -> Result<Operation, AdsError> {
        Ok(Operation::AdGroupLabel {
            operator,
            operand: AdGroupLabel {
                ad_group_id: adgroup_id,
                label_id: self.require_id()?,
            },
        })
    }

    fn keyword_operation(
        &self,
        operator: Operator,
        adgroup_id: i64,
        keyword_id: i64,
    ) -> Result<Operation, AdsError> {
        Ok(Operation::AdGroupCriterionLabel {
            operator,
            operand: AdGroupCriterionLabel {
                ad_group_id: adgroup_id,
                criterion_id: keyword_id,
                label_id: self.require_id()?,
            },
        })
    }

    fn ad_operation(
        &self,
        operator: Operator,
        adgroup_id: i64,
        ad_id: i64,
    ) -> Result<Operation, AdsError> {
        Ok(Operation::AdGroupAdLabel {
            operator,
            operand: AdGroupAdLabel {
                ad_group_id: adgroup_id,
                ad_id,
                label_id: self.require_id()?,
            },
        })
    }

    /// Looks up the label id by name and creates the label when it does not
    /// exist yet. In debug mode the creation is only validated, so the id
    /// stays unset.
    pub async fn update_id<T: AdsTransport>(
        &mut self,
        service: &AdsService<T>,
        is_debug: bool,
    ) -> Result<(), AdsError> {
        if let Some(id) = service.label_id(&self.name).await? {
            self.id = Some(id);
            return Ok(());
        }

        tracing::info!("Label '{}' does not exist yet, creating it", self.name);
        let result = service
            .upload(
                &[self.add_operation()],
                &UploadOptions::standard("LabelService").debug(is_debug),
            )
            .await?;

        if is_debug {
            return Ok(());
        }

        let rejection = result
            .errors
            .first()
            .map(|error| error.message.clone())
            .or_else(|| result.diagnostic.clone());
        if let Some(reason) = rejection {
            return Err(AdsError::ApiFault {
                message: format!("label '{}' could not be created: {}", self.name, reason),
                detail: None,
            });
        }

        let id = match &result.payload {
            Some(UploadPayload::Mutate(response)) => response
                .value
                .first()
                .and_then(|label| label.get("id"))
                .and_then(Value::as_i64),
            _ => None,
        }
        .ok_or_else(|| AdsError::Parse(format!("no id returned for label '{}'", self.name)))?;

        service.remember_label_id(&self.name, id).await;
        self.id = Some(id);
        Ok(())
    }
}
