use crate::errors::AdsError;
use crate::keyword::clean_keyword_text;
use crate::operations::{
    AdGroupCriterion, KeywordCriterion, MatchType, NegativeAdGroupCriterion,
    NegativeCampaignCriterion, Operation, Operator, SharedCriterion,
};

/// Negative keyword, excluded on ad group, campaign or shared set level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeKeyword {
    pub text: String,
    pub match_type: MatchType,
}

impl NegativeKeyword {
    pub fn new(text: &str, match_type: &str) -> Result<Self, AdsError> {
        let text = clean_keyword_text(text)?;

        Ok(Self {
            text,
            match_type: match_type.parse()?,
        })
    }

    fn criterion(&self) -> KeywordCriterion {
        KeywordCriterion::new(&self.text, self.match_type)
    }

    pub fn add_adgroup_operation(&self, ad_group_id: i64) -> Operation {
        Operation::AdGroupCriterion {
            operator: Operator::Add,
            operand: AdGroupCriterion::NegativeAdGroupCriterion(NegativeAdGroupCriterion {
                ad_group_id,
                criterion: self.criterion(),
            }),
        }
    }

    pub fn add_campaign_operation(&self, campaign_id: i64) -> Operation {
        Operation::CampaignCriterion {
            operator: Operator::Add,
            operand: NegativeCampaignCriterion {
                campaign_id,
                criterion: self.criterion(),
            },
        }
    }

    pub fn add_shared_set_operation(&self, shared_set_id: i64) -> Operation {
        Operation::SharedCriterion {
            operator: Operator::Add,
            operand: SharedCriterion {
                shared_set_id,
                criterion: self.criterion(),
                negative: true,
            },
        }
    }

    pub fn delete_adgroup_operation(ad_group_id: i64, criterion_id: i64) -> Operation {
        Operation::AdGroupCriterion {
            operator: Operator::Remove,
            operand: AdGroupCriterion::NegativeAdGroupCriterion(NegativeAdGroupCriterion {
                ad_group_id,
                criterion: KeywordCriterion::by_id(criterion_id),
            }),
        }
    }

    pub fn delete_campaign_operation(campaign_id: i64, criterion_id: i64) -> Operation {
        Operation::CampaignCriterion {
            operator: Operator::Remove,
            operand: NegativeCampaignCriterion {
                campaign_id,
                criterion: KeywordCriterion::by_id(criterion_id),
            },
        }
    }

    pub fn delete_shared_set_operation(shared_set_id: i64, criterion_id: i64) -> Operation {
        Operation::SharedCriterion {
            operator: Operator::Remove,
            operand: SharedCriterion {
                shared_set_id,
                criterion: KeywordCriterion::by_id(criterion_id),
                negative: true,
            },
        }
    }
}
