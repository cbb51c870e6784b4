use serde::{Deserialize, Serialize};
use std::fmt;

/// Element of the path pointing at the offending field of a request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldPathElement {
    /// Field name, e.g. `operations`.
    pub field: String,
    /// Index into the field, when it is a list.
    #[serde(default)]
    pub index: Option<usize>,
}

/// Error object as returned by the API for a single operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawApiError {
    #[serde(default)]
    pub field_path: Option<String>,
    #[serde(default)]
    pub field_path_elements: Vec<FieldPathElement>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub error_string: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl RawApiError {
    /// Index of the operation this error refers to.
    ///
    /// Taken from the first field path element, falling back to parsing
    /// `operations[N]` out of the textual field path.
    pub fn operation_index(&self) -> Option<usize> {
        if let Some(index) = self.field_path_elements.first().and_then(|e| e.index) {
            return Some(index);
        }

        let path = self.field_path.as_deref()?;
        let start = path.find("operations[")? + "operations[".len();
        let end = path[start..].find(']')? + start;
        path[start..end].parse().ok()
    }
}

/// Failed operation reduced to its index and a printable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedError {
    pub index: usize,
    pub message: String,
}

impl NormalizedError {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Builds the printable record for an API error at `index`.
    pub fn from_api_error(index: usize, error: &RawApiError) -> Self {
        let reason = error
            .error_string
            .as_deref()
            .or(error.reason.as_deref())
            .unwrap_or("Unknown error");

        let message = match error.trigger.as_deref().map(str::trim) {
            Some(trigger) if !trigger.is_empty() => format!("{} (trigger: {})", reason, trigger),
            _ => reason.to_string(),
        };

        Self::new(index, message)
    }

    /// Normalizes a list of errors, using each error's own field path index
    /// and its position in the list when the path carries none.
    pub fn from_api_errors(errors: &[RawApiError]) -> Vec<Self> {
        errors
            .iter()
            .enumerate()
            .map(|(position, error)| {
                Self::from_api_error(error.operation_index().unwrap_or(position), error)
            })
            .collect()
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operation {}: {}", self.index, self.message)
    }
}
