use crate::errors::AdsError;
use crate::money::{euro_to_micro, is_good_micro_bid, micro_to_euro};
use crate::operations::{
    AdGroupCriterion, BiddableAdGroupCriterion, BiddingStrategyConfiguration, FinalUrls,
    labels_from, KeywordCriterion, MatchType, Operation, Operator, Status,
};

pub const MAX_WORDS_KEYWORD: usize = 10;
pub const MAX_CHARS_KEYWORD: usize = 80;

/// Checks keyword text against the platform limits.
pub(crate) fn check_keyword_text(text: &str) -> Result<(), AdsError> {
    let chars = text.chars().count();
    if chars > MAX_CHARS_KEYWORD {
        return Err(AdsError::validation(format!(
            "keyword '{}' has {} characters, max is {}",
            text, chars, MAX_CHARS_KEYWORD
        )));
    }

    let words = text.split_whitespace().count();
    if words > MAX_WORDS_KEYWORD {
        return Err(AdsError::validation(format!(
            "keyword '{}' has {} words, max is {}",
            text, words, MAX_WORDS_KEYWORD
        )));
    }

    Ok(())
}

/// Lower-cases keyword text, checks the limits, then collapses whitespace.
///
/// Limits apply to the text as given, so inner whitespace counts towards
/// the character limit.
pub(crate) fn clean_keyword_text(text: &str) -> Result<String, AdsError> {
    let text = text.trim().to_lowercase();
    check_keyword_text(&text)?;
    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Landing page of a keyword.
///
/// The raw URL must declare its protocol; it is rewritten to `https` unless
/// plain `http` is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordFinalUrl {
    pub url: String,
}

impl KeywordFinalUrl {
    pub fn new(url: &str) -> Result<Self, AdsError> {
        Self::with_scheme(url, true)
    }

    pub fn with_scheme(url: &str, https: bool) -> Result<Self, AdsError> {
        Ok(Self {
            url: normalize_url(url, https)?,
        })
    }
}

/// Validates that `raw` carries an http(s) protocol and forces the scheme.
pub(crate) fn normalize_url(raw: &str, https: bool) -> Result<String, AdsError> {
    let raw = raw.trim();
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .ok_or_else(|| {
            AdsError::validation(format!("url '{}' must start with http:// or https://", raw))
        })?;

    url::Url::parse(raw).map_err(|e| AdsError::validation(format!("url '{}': {}", raw, e)))?;

    let scheme = if https { "https" } else { "http" };
    Ok(format!("{}://{}", scheme, rest))
}

/// Keyword targeting model: text, match type, bid and landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub text: String,
    pub match_type: MatchType,
    /// Max CPC in currency units.
    pub max_cpc: f64,
    pub micro_max_cpc: i64,
    pub final_url: KeywordFinalUrl,
}

impl Keyword {
    /// Creates a keyword with its max CPC given in currency units.
    pub fn new(
        text: &str,
        match_type: &str,
        max_cpc: f64,
        final_url: KeywordFinalUrl,
    ) -> Result<Self, AdsError> {
        Self::build(text, match_type, euro_to_micro(max_cpc), final_url)
    }

    /// Creates a keyword with its max CPC already in micros.
    pub fn with_micro_bid(
        text: &str,
        match_type: &str,
        micro_max_cpc: i64,
        final_url: KeywordFinalUrl,
    ) -> Result<Self, AdsError> {
        Self::build(text, match_type, micro_max_cpc, final_url)
    }

    fn build(
        text: &str,
        match_type: &str,
        micro_max_cpc: i64,
        final_url: KeywordFinalUrl,
    ) -> Result<Self, AdsError> {
        let text = clean_keyword_text(text)?;

        Ok(Self {
            text,
            match_type: match_type.parse()?,
            max_cpc: micro_to_euro(micro_max_cpc),
            micro_max_cpc,
            final_url,
        })
    }

    /// True when at least one word of a broad keyword lacks the `+` modifier.
    pub fn is_real_broad(broad_text: &str) -> bool {
        broad_text
            .split_whitespace()
            .any(|word| !word.starts_with('+'))
    }

    /// Prefixes every word with exactly one `+`.
    pub fn to_broad_modified(broad: &str) -> String {
        broad
            .split_whitespace()
            .map(|word| format!("+{}", word.replace('+', "")))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn add_operation(
        &self,
        ad_group_id: i64,
        status: Status,
        label_id: Option<i64>,
    ) -> Result<Operation, AdsError> {
        if !is_good_micro_bid(self.micro_max_cpc) {
            return Err(AdsError::validation(format!(
                "bid of {} micros for keyword '{}' is out of range",
                self.micro_max_cpc, self.text
            )));
        }

        let operand = BiddableAdGroupCriterion {
            ad_group_id,
            criterion: KeywordCriterion::new(&self.text, self.match_type),
            user_status: Some(status),
            final_urls: Some(FinalUrls {
                urls: vec![self.final_url.url.clone()],
            }),
            bidding_strategy_configuration: Some(BiddingStrategyConfiguration::cpc(
                self.micro_max_cpc,
            )),
            labels: labels_from(label_id),
        };

        Ok(Operation::AdGroupCriterion {
            operator: Operator::Add,
            operand: AdGroupCriterion::BiddableAdGroupCriterion(operand),
        })
    }

    pub fn delete_operation(ad_group_id: i64, keyword_id: i64) -> Operation {
        Operation::AdGroupCriterion {
            operator: Operator::Remove,
            operand: AdGroupCriterion::BiddableAdGroupCriterion(BiddableAdGroupCriterion {
                ad_group_id,
                criterion: KeywordCriterion::by_id(keyword_id),
                user_status: None,
                final_urls: None,
                bidding_strategy_configuration: None,
                labels: Vec::new(),
            }),
        }
    }

    /// Bid change in currency units.
    pub fn set_bid(ad_group_id: i64, keyword_id: i64, bid: f64) -> Result<Operation, AdsError> {
        Self::set_micro_bid(ad_group_id, keyword_id, euro_to_micro(bid))
    }

    pub fn set_micro_bid(
        ad_group_id: i64,
        keyword_id: i64,
        micro_bid: i64,
    ) -> Result<Operation, AdsError> {
        if !is_good_micro_bid(micro_bid) {
            return Err(AdsError::validation(format!(
                "bid of {} micros is out of range",
                micro_bid
            )));
        }

        Ok(Operation::AdGroupCriterion {
            operator: Operator::Set,
            operand: AdGroupCriterion::BiddableAdGroupCriterion(BiddableAdGroupCriterion {
                ad_group_id,
                criterion: KeywordCriterion::by_id(keyword_id),
                user_status: None,
                final_urls: None,
                bidding_strategy_configuration: Some(BiddingStrategyConfiguration::cpc(
                    micro_bid,
                )),
                labels: Vec::new(),
            }),
        })
    }

    pub fn set_status(ad_group_id: i64, keyword_id: i64, status: Status) -> Operation {
        Operation::AdGroupCriterion {
            operator: Operator::Set,
            operand: AdGroupCriterion::BiddableAdGroupCriterion(BiddableAdGroupCriterion {
                ad_group_id,
                criterion: KeywordCriterion::by_id(keyword_id),
                user_status: Some(status),
                final_urls: None,
                bidding_strategy_configuration: None,
                labels: Vec::new(),
            }),
        }
    }
}
