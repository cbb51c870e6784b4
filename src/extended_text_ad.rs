use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AdsError;
use crate::keyword::normalize_url;
use crate::operations::{
    labels_from, AdGroupAd, ExpandedTextAdPayload, Operation, Operator, Status,
};

pub const MAX_CHARS_HEADLINE: usize = 30;
pub const MAX_CHARS_DESCRIPTION: usize = 80;
pub const MAX_CHARS_PATH: usize = 15;

/// Expanded text ad with its display paths and landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedTextAd {
    pub headline1: String,
    pub headline2: String,
    pub description: String,
    pub path1: String,
    pub path2: String,
    pub final_url: String,
}

impl ExtendedTextAd {
    /// Builds an ad whose final URL is forced to https.
    pub fn new(
        headline1: &str,
        headline2: &str,
        description: &str,
        path1: &str,
        path2: &str,
        final_url: &str,
    ) -> Result<Self, AdsError> {
        Self::with_scheme(headline1, headline2, description, path1, path2, final_url, true)
    }

    pub fn with_scheme(
        headline1: &str,
        headline2: &str,
        description: &str,
        path1: &str,
        path2: &str,
        final_url: &str,
        https: bool,
    ) -> Result<Self, AdsError> {
        let ad = Self {
            headline1: headline1.trim().to_string(),
            headline2: headline2.trim().to_string(),
            description: description.trim().to_string(),
            path1: clean_path(path1),
            path2: clean_path(path2),
            final_url: normalize_url(final_url, https)?,
        };

        if ad.path1.is_empty() && !ad.path2.is_empty() {
            return Err(AdsError::validation("path2 is set but path1 is empty"));
        }
        if ad.too_long() {
            return Err(AdsError::validation(format!(
                "ad '{} | {}' exceeds the text limits",
                ad.headline1, ad.headline2
            )));
        }

        Ok(ad)
    }

    /// Whether any text field exceeds its platform limit.
    pub fn too_long(&self) -> bool {
        let over = |text: &str, max: usize| text.chars().count() > max;

        over(&self.headline1, MAX_CHARS_HEADLINE)
            || over(&self.headline2, MAX_CHARS_HEADLINE)
            || over(&self.description, MAX_CHARS_DESCRIPTION)
            || over(&self.path1, MAX_CHARS_PATH)
            || over(&self.path2, MAX_CHARS_PATH)
    }

    fn optional(text: &str) -> Option<String> {
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn add_operation(
        &self,
        ad_group_id: i64,
        status: Status,
        label_id: Option<i64>,
    ) -> Operation {
        Operation::AdGroupAd {
            operator: Operator::Add,
            operand: AdGroupAd {
                ad_group_id,
                ad: ExpandedTextAdPayload {
                    id: None,
                    headline_part1: Some(self.headline1.clone()),
                    headline_part2: Some(self.headline2.clone()),
                    description: Some(self.description.clone()),
                    path1: Self::optional(&self.path1),
                    path2: Self::optional(&self.path2),
                    final_urls: Some(vec![self.final_url.clone()]),
                },
                status: Some(status),
                labels: labels_from(label_id),
            },
        }
    }

    pub fn set_status_operation(ad_group_id: i64, ad_id: i64, status: Status) -> Operation {
        Operation::AdGroupAd {
            operator: Operator::Set,
            operand: AdGroupAd {
                ad_group_id,
                ad: ExpandedTextAdPayload {
                    id: Some(ad_id),
                    ..Default::default()
                },
                status: Some(status),
                labels: Vec::new(),
            },
        }
    }

    pub fn delete_operation(ad_group_id: i64, ad_id: i64) -> Operation {
        Operation::AdGroupAd {
            operator: Operator::Remove,
            operand: AdGroupAd {
                ad_group_id,
                ad: ExpandedTextAdPayload {
                    id: Some(ad_id),
                    ..Default::default()
                },
                status: None,
                labels: Vec::new(),
            },
        }
    }
}

static NOT_PATH_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w-]").expect("NOT_PATH_CHAR pattern is valid"));

/// Display paths only keep word characters and dashes.
fn clean_path(path: &str) -> String {
    NOT_PATH_CHAR.replace_all(path, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://asd.ca";

    #[test]
    fn test_good_ad_with_conversions() {
        let ad = ExtendedTextAd::new("a", "b", "c", "d.", "e f", URL).unwrap();
        assert_eq!(ad.headline1, "a");
        assert_eq!(ad.headline2, "b");
        assert_eq!(ad.description, "c");
        assert_eq!(ad.path1, "d");
        assert_eq!(ad.path2, "ef");
        assert_eq!(ad.final_url, "https://asd.ca");
        assert!(!ad.too_long());
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("sale!"), "sale");
        assert_eq!(clean_path("red-shoes 2"), "red-shoes2");
        assert_eq!(clean_path(""), "");
    }

    #[test]
    fn test_path2_without_path1() {
        assert!(ExtendedTextAd::new("a", "b", "c", "", "e f", URL).is_err());
    }

    #[test]
    fn test_length_limits() {
        let chars31 = "a".repeat(31);
        let chars81 = "a".repeat(81);
        let chars16 = "a".repeat(16);

        assert!(ExtendedTextAd::new(&chars31, "b", "c", "e", "f", URL).is_err());
        assert!(ExtendedTextAd::new("a", &chars31, "c", "e", "f", URL).is_err());
        assert!(ExtendedTextAd::new("a", "b", &chars81, "e", "f", URL).is_err());
        assert!(ExtendedTextAd::new("a", "b", "c", &chars16, "f", URL).is_err());
        assert!(ExtendedTextAd::new("a", "b", "d", "e", &chars16, URL).is_err());
    }

    #[test]
    fn test_url_handling() {
        assert!(ExtendedTextAd::new("a", "b", "d", "e", "f", "asd.ca").is_err());

        let http = ExtendedTextAd::with_scheme("a", "b", "d", "e", "f", "https://asd.ca", false)
            .unwrap();
        assert_eq!(http.final_url, "http://asd.ca");
    }

    #[test]
    fn test_add_operation_omits_empty_paths() {
        let ad = ExtendedTextAd::new("Head", "Line", "Text", "", "", URL).unwrap();
        let value = serde_json::to_value(ad.add_operation(4, Status::Paused, None)).unwrap();

        assert_eq!(value["operand"]["ad"]["xsi_type"], "ExpandedTextAd");
        assert_eq!(value["operand"]["ad"]["headlinePart1"], "Head");
        assert!(value["operand"]["ad"].get("path1").is_none());
        assert_eq!(value["operand"]["status"], "PAUSED");
        assert!(value["operand"].get("labels").is_none());
    }
}
