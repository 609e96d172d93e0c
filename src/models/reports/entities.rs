use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 报告状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub enum ReportStatus {
    Submitted,
    Reviewed,
    Rejected,
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<ReportStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid report status: '{s}'. Supported: submitted, reviewed, rejected"
            ))
        })
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Submitted => write!(f, "submitted"),
            ReportStatus::Reviewed => write!(f, "reviewed"),
            ReportStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ReportStatus::Submitted),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "rejected" => Ok(ReportStatus::Rejected),
            _ => Err(format!("Invalid report status: {s}")),
        }
    }
}

// 报告
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct Report {
    pub id: i64,
    pub author_id: i64,
    pub plan_id: Option<i64>,
    pub title: String,
    /// Markdown
    pub content: String,
    pub status: ReportStatus,
    pub review_note: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
