//! Per-employee usage outcome.

use derive_getters::Getters;
use insightful_error::JsonError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// One application or website from an analytics response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct AppUsage {
    name: String,
    usage: Number,
}

impl AppUsage {
    /// Create an app usage entry.
    pub fn new(name: impl Into<String>, usage: impl Into<Number>) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
        }
    }

    /// Project one analytics record, defaulting an absent name to
    /// `"Unknown"` and an absent usage to `0`.
    pub fn from_record(index: usize, record: &Value) -> Result<Self, JsonError> {
        let object = record
            .as_object()
            .ok_or_else(|| JsonError::new(format!("app record {} is not an object", index)))?;

        let name = match object.get("name") {
            None | Some(Value::Null) => "Unknown".to_string(),
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(JsonError::new(format!(
                    "app record {} has non-string name: {}",
                    index, other
                )));
            }
        };

        let usage = match object.get("usage") {
            None | Some(Value::Null) => Number::from(0),
            Some(Value::Number(n)) => n.clone(),
            Some(other) => {
                return Err(JsonError::new(format!(
                    "app record {} has non-numeric usage: {}",
                    index, other
                )));
            }
        };

        Ok(Self { name, usage })
    }
}

/// Why an employee ended up without usage data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum NoDataReason {
    /// The API answered with an empty or non-array body
    #[display("empty response")]
    Empty,
    /// The fetch or its interpretation failed
    #[display("unavailable: {}", _0)]
    Unavailable(String),
}

/// Outcome of one usage query.
///
/// `HasData` holds index-aligned sequences of equal length; build it with
/// [`UsageResult::from_apps`] or [`UsageResult::from_body`] to keep that true.
/// Both `NoData` reasons render identically in exported records, but only
/// [`NoDataReason::Unavailable`] is worth retrying.
///
/// # Examples
///
/// ```
/// use insightful_core::{NoDataReason, UsageResult};
/// use serde_json::json;
///
/// let result = UsageResult::from_body(&json!([
///     {"name": "Slack", "usage": 120},
///     {"usage": 30},
/// ])).unwrap();
/// assert_eq!(result.app_names().unwrap(), ["Slack", "Unknown"]);
///
/// let empty = UsageResult::from_body(&json!([])).unwrap();
/// assert_eq!(empty, UsageResult::NoData(NoDataReason::Empty));
/// assert!(!empty.is_retry_worthwhile());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UsageResult {
    /// The employee has recorded usage in the window
    HasData {
        /// App or website names, in response order
        app_names: Vec<String>,
        /// Usage value for each name
        usage_values: Vec<Number>,
    },
    /// No usable data for the employee
    NoData(NoDataReason),
}

impl UsageResult {
    /// Interpret a raw analytics response body.
    ///
    /// A non-empty array yields `HasData`; an empty array or any non-array
    /// body yields `NoData(Empty)`. Malformed records are an error.
    pub fn from_body(body: &Value) -> Result<Self, JsonError> {
        let Some(records) = body.as_array() else {
            return Ok(Self::NoData(NoDataReason::Empty));
        };

        let apps = records
            .iter()
            .enumerate()
            .map(|(i, record)| AppUsage::from_record(i, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_apps(apps))
    }

    /// Build a result from projected app entries.
    pub fn from_apps(apps: Vec<AppUsage>) -> Self {
        if apps.is_empty() {
            return Self::NoData(NoDataReason::Empty);
        }
        let (app_names, usage_values) = apps.into_iter().map(|a| (a.name, a.usage)).unzip();
        Self::HasData {
            app_names,
            usage_values,
        }
    }

    /// A failed fetch.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::NoData(NoDataReason::Unavailable(reason.into()))
    }

    /// Whether usage data is present.
    pub fn has_data(&self) -> bool {
        matches!(self, Self::HasData { .. })
    }

    /// True only when the absence of data came from a failure.
    pub fn is_retry_worthwhile(&self) -> bool {
        matches!(self, Self::NoData(NoDataReason::Unavailable(_)))
    }

    /// App names, when present.
    pub fn app_names(&self) -> Option<&[String]> {
        match self {
            Self::HasData { app_names, .. } => Some(app_names),
            Self::NoData(_) => None,
        }
    }

    /// Usage values, when present.
    pub fn usage_values(&self) -> Option<&[Number]> {
        match self {
            Self::HasData { usage_values, .. } => Some(usage_values),
            Self::NoData(_) => None,
        }
    }

    /// Reason for missing data, when absent.
    pub fn no_data_reason(&self) -> Option<&NoDataReason> {
        match self {
            Self::HasData { .. } => None,
            Self::NoData(reason) => Some(reason),
        }
    }
}
