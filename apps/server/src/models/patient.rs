//! Patient record and its JSON request/response shapes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_NAME_USE: &str = "official";
pub const DEFAULT_GENDER: &str = "unknown";

/// Stored patient. `birth_date` is always UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: Uuid,
    pub name_id: Uuid,
    pub name_use: String,
    pub family: String,
    /// Given names in the order supplied by the client.
    pub given: Vec<String>,
    /// male, female, other or unknown
    pub gender: String,
    pub birth_date: DateTime<Utc>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NameDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Name.Family is required."))]
    pub family: String,
    #[serde(default)]
    pub given: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    #[serde(default)]
    pub name: NameDto,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "deserialize_birth_date")]
    pub birth_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: Uuid,
    pub name: NameDto,
    pub gender: String,
    #[serde(serialize_with = "serialize_birth_date")]
    pub birth_date: DateTime<Utc>,
    pub active: bool,
}

impl From<&Patient> for PatientResponse {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: NameDto {
                id: Some(patient.name_id),
                name_use: Some(patient.name_use.clone()),
                family: patient.family.clone(),
                given: patient.given.clone(),
            },
            gender: patient.gender.clone(),
            birth_date: patient.birth_date,
            active: patient.active,
        }
    }
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self::from(&patient)
    }
}

/// Accepts RFC 3339 and the date-time forms the search parser accepts, plus a
/// bare `yyyy-MM-dd`. Values without an offset are taken as UTC.
fn deserialize_birth_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => patient_date_search::parse_instant(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid birthDate: {s}"))),
    }
}

fn serialize_birth_date<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
