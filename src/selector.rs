//! Selectors for `get` calls and report definitions.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::errors::AdsError;

/// Days covered by a report when no range is given.
pub const DEFAULT_REPORT_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredicateOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
    StartsWith,
    Contains,
    DoesNotContain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    pub field: String,
    pub operator: PredicateOperator,
    pub values: Vec<String>,
}

impl Predicate {
    pub fn new<I, S>(field: &str, operator: PredicateOperator, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.to_string(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equals(field: &str, value: impl Into<String>) -> Self {
        Self::new(field, PredicateOperator::Equals, [value.into()])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field: String,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub start_index: usize,
    pub number_results: usize,
}

/// Inclusive date range, serialized as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(serialize_with = "compact_date")]
    pub min: NaiveDate,
    #[serde(serialize_with = "compact_date")]
    pub max: NaiveDate,
}

fn compact_date<S: serde::Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%Y%m%d").to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub predicates: Vec<Predicate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ordering: Vec<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl Selector {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn order_by(mut self, field: &str, sort_order: SortOrder) -> Self {
        self.ordering.push(OrderBy {
            field: field.to_string(),
            sort_order,
        });
        self
    }

    /// Copy of this selector restricted to one page.
    pub fn page(&self, start_index: usize, number_results: usize) -> Self {
        Self {
            paging: Some(Paging {
                start_index,
                number_results,
            }),
            ..self.clone()
        }
    }
}

/// What to put into a report and for which days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub report_type: String,
    pub fields: Vec<String>,
    pub predicates: Vec<Predicate>,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub last_days: Option<u32>,
}

impl ReportRequest {
    pub fn new<I, S>(report_type: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            report_type: report_type.to_string(),
            fields: fields.into_iter().map(Into::into).collect(),
            predicates: Vec::new(),
            date_min: None,
            date_max: None,
            last_days: None,
        }
    }

    pub fn with_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn between(mut self, date_min: NaiveDate, date_max: NaiveDate) -> Self {
        self.date_min = Some(date_min);
        self.date_max = Some(date_max);
        self
    }

    pub fn last_days(mut self, days: u32) -> Self {
        self.last_days = Some(days);
        self
    }

    /// Resolves the requested range relative to `today`.
    ///
    /// `last_days` and the default range both end yesterday.
    pub fn date_range_at(&self, today: NaiveDate) -> Result<DateRange, AdsError> {
        let yesterday = days_before(today, 1)?;

        match (self.date_min, self.date_max, self.last_days) {
            (Some(min), Some(max), None) => {
                if min > max {
                    return Err(AdsError::InvalidDateRange(format!(
                        "date_min {} is after date_max {}",
                        min, max
                    )));
                }
                Ok(DateRange { min, max })
            }
            (None, None, Some(days)) => Ok(DateRange {
                min: days_before(today, days)?,
                max: yesterday,
            }),
            (None, None, None) => Ok(DateRange {
                min: days_before(today, DEFAULT_REPORT_DAYS)?,
                max: yesterday,
            }),
            (_, _, Some(_)) => Err(AdsError::InvalidDateRange(
                "last_days cannot be combined with explicit dates".to_string(),
            )),
            _ => Err(AdsError::InvalidDateRange(
                "both date_min and date_max are required".to_string(),
            )),
        }
    }
}

fn days_before(today: NaiveDate, days: u32) -> Result<NaiveDate, AdsError> {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            AdsError::InvalidDateRange(format!("{} days before {} is out of range", days, today))
        })
}

/// Report definition as sent to the report download endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    pub report_name: String,
    pub date_range_type: String,
    pub report_type: String,
    pub download_format: String,
    pub selector: Selector,
}

/// Builds the definition for `request`, resolving dates against `today`.
pub fn report_definition_at(
    request: &ReportRequest,
    today: NaiveDate,
) -> Result<ReportDefinition, AdsError> {
    let date_range = request.date_range_at(today)?;

    Ok(ReportDefinition {
        report_name: request.report_type.clone(),
        date_range_type: "CUSTOM_DATE".to_string(),
        report_type: request.report_type.clone(),
        download_format: "CSV".to_string(),
        selector: Selector {
            fields: request.fields.clone(),
            predicates: request.predicates.clone(),
            date_range: Some(date_range),
            ..Default::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_explicit_range_definition() {
        let request = ReportRequest::new("KEYWORDS_PERFORMANCE_REPORT", ["Criteria", "Clicks"])
            .between(day(2018, 1, 1), day(2018, 1, 31));

        let definition = report_definition_at(&request, day(2018, 3, 1)).unwrap();
        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            json!({
                "reportName": "KEYWORDS_PERFORMANCE_REPORT",
                "dateRangeType": "CUSTOM_DATE",
                "reportType": "KEYWORDS_PERFORMANCE_REPORT",
                "downloadFormat": "CSV",
                "selector": {
                    "fields": ["Criteria", "Clicks"],
                    "dateRange": {"min": "20180101", "max": "20180131"}
                }
            })
        );
    }

    #[test]
    fn test_last_days_and_default_end_yesterday() {
        let today = day(2018, 5, 10);

        let range = ReportRequest::new("R", ["A"])
            .last_days(3)
            .date_range_at(today)
            .unwrap();
        assert_eq!(range.min, day(2018, 5, 7));
        assert_eq!(range.max, day(2018, 5, 9));

        let range = ReportRequest::new("R", ["A"]).date_range_at(today).unwrap();
        assert_eq!(range.min, day(2018, 5, 3));
        assert_eq!(range.max, day(2018, 5, 9));
    }

    #[test]
    fn test_conflicting_ranges_fail() {
        let today = day(2018, 5, 10);

        let both = ReportRequest::new("R", ["A"])
            .between(day(2018, 1, 1), day(2018, 1, 2))
            .last_days(3);
        assert!(matches!(
            both.date_range_at(today),
            Err(AdsError::InvalidDateRange(_))
        ));

        let mut only_min = ReportRequest::new("R", ["A"]);
        only_min.date_min = Some(day(2018, 1, 1));
        assert!(matches!(
            only_min.date_range_at(today),
            Err(AdsError::InvalidDateRange(_))
        ));

        let mut min_and_days = ReportRequest::new("R", ["A"]).last_days(2);
        min_and_days.date_min = Some(day(2018, 1, 1));
        assert!(min_and_days.date_range_at(today).is_err());
    }

    #[test]
    fn test_huge_last_days_is_rejected() {
        let today = day(2018, 5, 10);

        let result = ReportRequest::new("R", ["A"])
            .last_days(u32::MAX)
            .date_range_at(today);
        assert!(matches!(result, Err(AdsError::InvalidDateRange(_))));

        let far = ReportRequest::new("R", ["A"])
            .last_days(3650)
            .date_range_at(today)
            .unwrap();
        assert_eq!(far.min, day(2008, 5, 12));
    }

    #[test]
    fn test_predicates_serialized_only_when_present() {
        let plain = Selector::new(["Name"]);
        assert_eq!(
            serde_json::to_value(&plain).unwrap(),
            json!({"fields": ["Name"]})
        );

        let filtered = Selector::new(["Name"])
            .with_predicates(vec![Predicate::equals("CanManageClients", "FALSE")])
            .order_by("Name", SortOrder::Ascending)
            .page(500, 500);
        assert_eq!(
            serde_json::to_value(&filtered).unwrap(),
            json!({
                "fields": ["Name"],
                "predicates": [
                    {"field": "CanManageClients", "operator": "EQUALS", "values": ["FALSE"]}
                ],
                "ordering": [{"field": "Name", "sortOrder": "ASCENDING"}],
                "paging": {"startIndex": 500, "numberResults": 500}
            })
        );
    }
}
