//! Wire types and query building for the budgeting backend.
//!
//! The backend is an opaque HTTP collaborator: the host performs the actual
//! fetches, this module owns the paths, parameter casing, filter handling,
//! and response shapes. Absent optional filters are omitted from the query,
//! never sent as empty values.

use serde::{Deserialize, Serialize};

use crate::error::{PlanviewError, Result};
use crate::format::{format_currency_uah, format_percent};

/// Content type of the report documents the backend serves.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Consolidated budget report (camelCase date parameters).
pub const CONSOLIDATED_PATH: &str = "/budgeting/consolidated";
/// Plan-fact main table report (snake_case date parameters).
pub const PLAN_FACT_TABLE_PATH: &str = "/plan-fact/main-table";
pub const PLAN_FACT_SUMMARY_PATH: &str = "/plan-fact/summary";
pub const TOP_DEVIATIONS_PATH: &str = "/plan-fact/top-deviations";
/// Job endpoints hang off these bases: `{base}/start`, `{base}/status`.
pub const BUDGETING_JOB_BASE: &str = "/budgeting";
pub const PLAN_FACT_JOB_BASE: &str = "/plan-fact";

/// A generated budget dataset snapshot selectable for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetVersion {
    pub id: u64,
    pub version: String,
    pub date_from: String,
    pub date_to: String,
}

/// Plan-fact summary figures for the selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFactSummary {
    pub total_plan: f64,
    pub plan_change_percent: f64,
    pub execution_percent: f64,
    pub anomalies_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomalies: Option<serde_json::Value>,
}

impl PlanFactSummary {
    /// Hryvnia rendering of the total plan figure.
    pub fn formatted_total_plan(&self) -> String {
        format_currency_uah(self.total_plan)
    }

    /// Deviation from plan; the backend sends this pre-multiplied.
    pub fn formatted_plan_change(&self) -> String {
        format_percent(self.plan_change_percent, false)
    }

    /// Plan execution; pre-multiplied as well.
    pub fn formatted_execution(&self) -> String {
        format_percent(self.execution_percent, false)
    }
}

/// Display label for a summary indicator key.
pub fn summary_label(key: &str) -> &str {
    match key {
        "total_plan" => "Загальний план",
        "plan_change_percent" => "Відхилення від плану",
        "execution_percent" => "Виконання",
        "anomalies_count" => "Аномалії",
        "budget_counts" => "Кількість бюджетів",
        other => other,
    }
}

/// One budget item's deviation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub budget_item: String,
    pub deviation_amount: f64,
    pub deviation_percent: f64,
}

/// Largest negative and positive deviations for the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TopDeviations {
    pub negative: Vec<Deviation>,
    pub positive: Vec<Deviation>,
}

/// Body of a job-start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStartRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_version: Option<String>,
}

/// Acknowledgement of a job-start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStartResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Polled job status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub is_running: bool,
    pub status: String,
}

/// Optional report filters; `None` fields are omitted from queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReportFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl ReportFilters {
    /// Present filters as query pairs, in stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        let entries: [(&'static str, Option<&str>); 8] = [
            ("budget", self.budget.as_deref()),
            ("budget_item", self.budget_item.as_deref()),
            ("cfo", self.cfo.as_deref()),
            ("org", self.org.as_deref()),
            ("macro_item", self.macro_item.as_deref()),
            ("budget_object", self.budget_object.as_deref()),
            ("sort_by", self.sort_by.as_deref()),
            ("sort_order", self.sort_order.as_deref()),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                pairs.push((key, value));
            }
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

/// A named filter bundle applied in one click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFilterPreset {
    pub id: String,
    pub label: String,
    pub filters: ReportFilters,
}

/// The plan-fact table's quick filter presets.
pub fn plan_fact_quick_filters() -> Vec<QuickFilterPreset> {
    vec![
        QuickFilterPreset {
            id: "logistics".to_string(),
            label: "Логістика".to_string(),
            filters: ReportFilters {
                budget: Some("Бюджет логістики".to_string()),
                ..ReportFilters::default()
            },
        },
        QuickFilterPreset {
            id: "production".to_string(),
            label: "Виробнича логістика".to_string(),
            filters: ReportFilters {
                budget: Some("Бюджет виробничої логістики".to_string()),
                ..ReportFilters::default()
            },
        },
        QuickFilterPreset {
            id: "warehouse".to_string(),
            label: "Оренда складів".to_string(),
            filters: ReportFilters {
                budget: Some("Бюджет оренди складів".to_string()),
                ..ReportFilters::default()
            },
        },
    ]
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

/// Percent-encode a query value (UTF-8 bytes, RFC 3986 unreserved set).
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if is_unreserved(b) {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Join pairs into a `k=v&k=v` query string with encoded values.
pub fn encode_query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Query string for the consolidated report endpoint.
pub fn consolidated_query(
    start_date: &str,
    end_date: &str,
    budget_version: Option<&str>,
    filters: &ReportFilters,
) -> String {
    let mut pairs = vec![("startDate", start_date), ("endDate", end_date)];
    if let Some(version) = budget_version {
        pairs.push(("budgetVersion", version));
    }
    pairs.extend(filters.query_pairs());
    encode_query(&pairs)
}

/// Query string for the plan-fact main table endpoint.
pub fn plan_fact_table_query(
    start_date: &str,
    end_date: &str,
    budget_version: Option<&str>,
    filters: &ReportFilters,
) -> String {
    let mut pairs = vec![("start_date", start_date), ("end_date", end_date)];
    if let Some(version) = budget_version {
        pairs.push(("budget_version", version));
    }
    pairs.extend(filters.query_pairs());
    encode_query(&pairs)
}

/// Reject a bad date range before any request goes out.
///
/// Dates are ISO `YYYY-MM-DD`; with that shape fixed, lexicographic order
/// is chronological order.
pub fn validate_date_range(start_date: &str, end_date: &str) -> Result<()> {
    fn is_iso_date(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            })
    }

    if !is_iso_date(start_date) || !is_iso_date(end_date) {
        return Err(PlanviewError::Validation(format!(
            "dates must be YYYY-MM-DD, got {start_date} / {end_date}"
        )));
    }
    if end_date < start_date {
        return Err(PlanviewError::Validation(format!(
            "end date {end_date} is before start date {start_date}"
        )));
    }
    Ok(())
}
