use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::Type;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Admin,
    Lecturer,
    Student,
}

impl UserRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Lecturer => "lecturer",
            Self::Student => "student",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "adminlevel", rename_all = "lowercase")]
pub(crate) enum AdminLevel {
    #[default]
    Standard,
    Super,
}

/// Stored and emitted lowercase. Input is accepted in any casing so
/// `Present` and `present` name the same status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "attendancestatus", rename_all = "lowercase")]
pub(crate) enum AttendanceStatus {
    Present,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub(crate) const ALL: [AttendanceStatus; 3] = [Self::Present, Self::Absent, Self::Excused];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Excused => "excused",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Excused => "Excused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attendance status '{0}'")]
pub(crate) struct UnknownStatus(pub(crate) String);

impl FromStr for AttendanceStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "excused" => Ok(Self::Excused),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_any_casing() {
        assert_eq!("Present".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Present));
        assert_eq!("ABSENT".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Absent));
        assert_eq!(" excused ".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Excused));
        assert!("late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn unknown_status_names_the_input() {
        let err = "Late".parse::<AttendanceStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown attendance status 'Late'");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&AttendanceStatus::Present).unwrap();
        assert_eq!(json, "\"present\"");

        let parsed: AttendanceStatus = serde_json::from_str("\"Absent\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Absent);
    }

    #[test]
    fn role_names_match_storage() {
        for role in [UserRole::Admin, UserRole::Lecturer, UserRole::Student] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}
