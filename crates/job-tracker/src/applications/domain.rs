use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::validation::ValidationError;

/// Identifier wrapper for tracked applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    /// Numeric value of identifiers minted by the store; `None` for hand-written ids.
    pub fn sequence(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Where an application currently sits in the hiring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Recruiter,
    Ongoing,
    Rejected,
    Success,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Recruiter => "Recruiter",
            ApplicationStatus::Ongoing => "Ongoing",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Success => "Success",
        }
    }

    pub fn label_for(status: Option<Self>) -> &'static str {
        status.map(Self::label).unwrap_or("No Status")
    }
}

/// A question asked during an interview round, with the answer given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One tracked job application as persisted in the document.
///
/// Keys the tracker does not model are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub date_received: NaiveDate,
    pub company: String,
    pub role: String,
    pub job_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_status"
    )]
    pub status: Option<ApplicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_questions: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_questions: Option<Vec<InterviewQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ApplicationRecord {
    pub fn status_label(&self) -> &'static str {
        ApplicationStatus::label_for(self.status)
    }

    pub fn received_in(&self, month: YearMonth) -> bool {
        month.contains(self.date_received)
    }
}

/// Persisted layout: `{ "applications": [ ... ] }`. Other top-level keys are
/// carried through rewrites in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationsDocument {
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Payload for creating a record. Required fields stay optional here so that
/// missing values surface as validation failures instead of decode errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    /// Accepted for compatibility with clients that echo records back; never stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_received: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_status"
    )]
    pub status: Option<ApplicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_questions: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_questions: Option<Vec<InterviewQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Partial update merged shallowly onto a stored record.
///
/// Outer `None` means "key absent, keep the stored value". For optional
/// fields `Some(None)` comes from an explicit `null` and clears the value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    /// Read so it never lands in `extra`; the stored identifier always wins.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub date_received: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub culture: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub mission: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub values: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub interview_process: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_stage: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_status_patch")]
    pub status: Option<Option<ApplicationStatus>>,
    #[serde(default, deserialize_with = "double_option")]
    pub metadata: Option<Option<BTreeMap<String, Value>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub prep_questions: Option<Option<BTreeMap<String, String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub interview_questions: Option<Option<Vec<InterviewQuestion>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Calendar month used to filter records by `dateReceived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        ((1..=12).contains(&month) && (0..=9999).contains(&year)).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month of the local clock at call time.
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonth(raw.to_string());
        let trimmed = raw.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }

        let (year, month) = (&trimmed[..4], &trimmed[5..]);
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Forms submit an empty string when no status is selected.
fn parse_status(raw: Option<String>) -> Result<Option<ApplicationStatus>, String> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => serde_json::from_value(Value::String(value.to_ascii_lowercase()))
            .map(Some)
            .map_err(|_| {
                format!(
                    "unknown status '{value}', expected one of recruiter, ongoing, rejected, success"
                )
            }),
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<ApplicationStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    parse_status(raw).map_err(serde::de::Error::custom)
}

fn deserialize_status_patch<'de, D>(
    deserializer: D,
) -> Result<Option<Option<ApplicationStatus>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_status(deserializer).map(Some)
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn year_month_parses_strict_format() {
        let month: YearMonth = "2024-03".parse().expect("valid month");
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2024-03");

        for raw in ["2024-3", "2024-13", "2024/03", "24-03-01", "abcd-ef", ""] {
            assert!(raw.parse::<YearMonth>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn year_month_contains_matches_calendar_month() {
        let march = YearMonth::new(2024, 3).expect("valid");
        let date = |d: &str| NaiveDate::parse_from_str(d, "%Y-%m-%d").expect("valid date");

        assert!(march.contains(date("2024-03-01")));
        assert!(march.contains(date("2024-03-31")));
        assert!(!march.contains(date("2024-04-01")));
        assert!(!march.contains(date("2023-03-15")));
    }

    #[test]
    fn record_keeps_unknown_keys_and_omits_absent_fields() {
        let raw = json!({
            "id": "7",
            "dateReceived": "2024-05-01",
            "company": "Acme",
            "role": "Engineer",
            "jobDescription": "Build things",
            "status": "ongoing",
            "salaryBand": "L5",
            "interviewQuestions": [{ "question": "Why us?", "myAnswer": "Mission" }]
        });

        let record: ApplicationRecord = serde_json::from_value(raw.clone()).expect("decodes");
        assert_eq!(record.id, ApplicationId::from("7"));
        assert_eq!(record.status, Some(ApplicationStatus::Ongoing));
        assert_eq!(record.extra.get("salaryBand"), Some(&json!("L5")));
        assert_eq!(serde_json::to_value(&record).expect("encodes"), raw);
    }

    #[test]
    fn empty_status_decodes_as_absent() {
        let record: ApplicationRecord = serde_json::from_value(json!({
            "id": "1",
            "dateReceived": "2024-05-01",
            "company": "Acme",
            "role": "Engineer",
            "jobDescription": "Build things",
            "status": ""
        }))
        .expect("decodes");

        assert_eq!(record.status, None);
        assert_eq!(record.status_label(), "No Status");
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: ApplicationPatch = serde_json::from_value(json!({
            "notes": null,
            "status": "rejected",
            "id": "other",
            "referral": "Jane"
        }))
        .expect("decodes");

        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.culture, None);
        assert_eq!(patch.status, Some(Some(ApplicationStatus::Rejected)));
        assert_eq!(patch.id, Some(json!("other")));
        assert!(!patch.extra.contains_key("id"));
        assert_eq!(patch.extra.get("referral"), Some(&json!("Jane")));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = serde_json::from_value::<ApplicationPatch>(json!({ "status": "ghosted" }));
        assert!(result.is_err());
    }

    #[test]
    fn sequence_ignores_non_numeric_ids() {
        assert_eq!(ApplicationId::from("12").sequence(), Some(12));
        assert_eq!(ApplicationId::from("app-3").sequence(), None);
    }
}
