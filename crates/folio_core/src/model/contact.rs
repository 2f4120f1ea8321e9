//! Contact message model.
//!
//! # Responsibility
//! - Name the contact form fields and the fixed inquiry options.
//! - Describe the row written to the contact collection.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Form fields in display order. All are required.
pub const CONTACT_FIELDS: [&str; 5] = ["name", "number", "email", "type", "message"];

/// Column holding the submission timestamp.
pub const TIME_FIELD: &str = "time";

/// Fixed inquiry options offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryType {
    #[serde(alias = "project-inquiry")]
    Project,
    Support,
    Collaboration,
    Hire,
}

impl InquiryType {
    pub const ALL: [InquiryType; 4] = [
        InquiryType::Project,
        InquiryType::Support,
        InquiryType::Collaboration,
        InquiryType::Hire,
    ];

    /// Value stored in the `type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Support => "support",
            Self::Collaboration => "collaboration",
            Self::Hire => "hire",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project Inquiry",
            Self::Support => "Support",
            Self::Collaboration => "Collaboration",
            Self::Hire => "Hire",
        }
    }
}

impl Display for InquiryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInquiryType(pub String);

impl Display for UnknownInquiryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown inquiry type `{}`; expected project|support|collaboration|hire",
            self.0
        )
    }
}

impl Error for UnknownInquiryType {}

impl FromStr for InquiryType {
    type Err = UnknownInquiryType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "project" | "project-inquiry" => Ok(Self::Project),
            "support" => Ok(Self::Support),
            "collaboration" => Ok(Self::Collaboration),
            "hire" => Ok(Self::Hire),
            other => Err(UnknownInquiryType(other.to_string())),
        }
    }
}

/// Row written to the contact collection.
///
/// `kind` stays a plain string: the store does not validate the option set
/// and neither does the form beyond presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub number: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub time: DateTime<Utc>,
}

impl ContactSubmission {
    /// Parses `kind` against the fixed option set.
    pub fn inquiry_type(&self) -> Result<InquiryType, UnknownInquiryType> {
        self.kind.parse()
    }
}

/// Formats a timestamp as ISO 8601 UTC with millisecond precision.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso_millis<S: Serializer>(
    time: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(time))
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, ContactSubmission, InquiryType};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn inquiry_type_accepts_long_project_alias() {
        assert_eq!(
            "project-inquiry".parse::<InquiryType>().unwrap(),
            InquiryType::Project
        );
        assert_eq!(" Hire ".parse::<InquiryType>().unwrap(), InquiryType::Hire);
        assert!("spam".parse::<InquiryType>().is_err());
    }

    #[test]
    fn timestamp_uses_millisecond_utc_format() {
        let time = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(&time), "2025-03-01T09:30:00.000Z");
    }

    #[test]
    fn submission_serializes_type_column() {
        let submission = ContactSubmission {
            name: "Jane".to_string(),
            number: "+1 555".to_string(),
            email: "jane@x.com".to_string(),
            kind: "support".to_string(),
            message: "hi".to_string(),
            time: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        };

        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["type"], json!("support"));
        assert_eq!(value["time"], json!("2025-03-01T09:30:00.000Z"));
        assert_eq!(submission.inquiry_type().unwrap(), InquiryType::Support);
    }
}
