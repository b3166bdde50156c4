//! Input records and the rows derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CITY, DEFAULT_COUNTRY, DEFAULT_DEGREE_TYPE, DEFAULT_STATUS, DEFAULT_VISIBILITY,
    LOOKUP_DEGREE_TYPE, UNKNOWN_PROGRAM_LABEL,
};

/// Generated primary key of a `universities` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniversityId(pub i32);

/// Generated primary key of a `programs` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramId(pub i32);

impl fmt::Display for UniversityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One object from the input array.
///
/// Every field is optional at this level; `null` and absence are treated
/// alike. Requirements are checked where the field is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ProgramRecord {
    pub university_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub degree_type: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub visibility: Option<String>,
}

impl ProgramRecord {
    /// Creates a record carrying only the two identifying fields.
    #[must_use]
    pub fn new(university_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            university_name: Some(university_name.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_degree_type(self, degree_type: impl Into<String>) -> Self {
        Self { degree_type: Some(degree_type.into()), ..self }
    }

    #[must_use]
    pub fn with_city(self, city: impl Into<String>) -> Self {
        Self { city: Some(city.into()), ..self }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self { description: Some(description.into()), ..self }
    }

    /// Converts one raw array element into a record.
    ///
    /// Only JSON objects are accepted; serde would otherwise map arrays onto
    /// fields positionally.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value)
    }

    /// The university name, if present and non-empty.
    #[must_use]
    pub fn university_name(&self) -> Option<&str> {
        self.university_name.as_deref().filter(|n| !n.is_empty())
    }

    /// `degree_type` used for the lookup key, defaulting to `masters`.
    #[must_use]
    pub fn lookup_degree_type(&self) -> &str {
        self.degree_type.as_deref().unwrap_or(LOOKUP_DEGREE_TYPE)
    }

    /// Program name for log lines.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_PROGRAM_LABEL)
    }
}

/// Short description of a JSON value's type, for error messages.
#[must_use]
pub const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Lookup key of a program: `(university_id, name, degree_type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramKey<'a> {
    pub university_id: UniversityId,
    pub name: &'a str,
    pub degree_type: &'a str,
}

impl<'a> ProgramKey<'a> {
    #[must_use]
    pub const fn new(university_id: UniversityId, name: &'a str, degree_type: &'a str) -> Self {
        Self { university_id, name, degree_type }
    }
}

/// A fully defaulted `programs` row ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProgram {
    pub university_id: UniversityId,
    pub name: String,
    pub description: Option<String>,
    pub degree_type: String,
    pub country: String,
    pub city: String,
    pub state: Option<String>,
    pub url: Option<String>,
    pub status: String,
    pub visibility: String,
}

impl NewProgram {
    /// Applies the insert defaults to `record`.
    ///
    /// `degree_type` falls back to `unknown` here, not to the lookup default.
    #[must_use]
    pub fn from_record(university_id: UniversityId, name: &str, record: &ProgramRecord) -> Self {
        let or_default = |field: &Option<String>, default: &str| {
            field.clone().unwrap_or_else(|| default.to_owned())
        };
        Self {
            university_id,
            name: name.to_owned(),
            description: record.description.clone(),
            degree_type: or_default(&record.degree_type, DEFAULT_DEGREE_TYPE),
            country: or_default(&record.country, DEFAULT_COUNTRY),
            city: or_default(&record.city, DEFAULT_CITY),
            state: record.state.clone(),
            url: record.url.clone(),
            status: or_default(&record.status, DEFAULT_STATUS),
            visibility: or_default(&record.visibility, DEFAULT_VISIBILITY),
        }
    }
}

/// A stored `universities` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub id: UniversityId,
    pub name: String,
}

/// A stored `programs` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    pub id: ProgramId,
    #[serde(flatten)]
    pub row: NewProgram,
}

impl Program {
    #[must_use]
    pub const fn new(id: ProgramId, row: NewProgram) -> Self {
        Self { id, row }
    }

    /// Whether this row matches a lookup key exactly.
    #[must_use]
    pub fn matches(&self, key: &ProgramKey<'_>) -> bool {
        self.row.university_id == key.university_id
            && self.row.name == key.name
            && self.row.degree_type == key.degree_type
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test code")]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn record_accepts_partial_object_and_ignores_unknown_fields() {
        let record = ProgramRecord::from_value(json!({
            "university_name": "Acme U",
            "name": "MS CS",
            "cost": "$40,000",
        }))
        .unwrap();
        assert_eq!(record.university_name(), Some("Acme U"));
        assert_eq!(record.label(), "MS CS");
        assert_eq!(record.degree_type, None);
    }

    #[test]
    fn record_treats_null_as_absent() {
        let record =
            ProgramRecord::from_value(json!({"university_name": null, "name": null})).unwrap();
        assert_eq!(record.university_name(), None);
        assert_eq!(record.label(), "Unknown");
    }

    #[test]
    fn record_rejects_non_objects() {
        let err = ProgramRecord::from_value(json!(["Acme U", "MS CS"])).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object, found an array"));
        assert!(ProgramRecord::from_value(json!("Acme U")).is_err());
    }

    #[test]
    fn record_rejects_non_string_fields() {
        assert!(ProgramRecord::from_value(json!({"university_name": 42, "name": "X"})).is_err());
    }

    #[test]
    fn empty_university_name_counts_as_missing() {
        let record = ProgramRecord::new("", "MS CS");
        assert_eq!(record.university_name(), None);
    }

    #[test]
    fn lookup_degree_type_defaults_to_masters() {
        let record = ProgramRecord::new("Acme U", "MS CS");
        assert_eq!(record.lookup_degree_type(), "masters");
        assert_eq!(record.with_degree_type("phd").lookup_degree_type(), "phd");
    }

    #[test]
    fn new_program_applies_insert_defaults() {
        let record = ProgramRecord::new("Acme U", "MS CS");
        let row = NewProgram::from_record(UniversityId(7), "MS CS", &record);
        assert_eq!(row.university_id, UniversityId(7));
        assert_eq!(row.degree_type, "unknown");
        assert_eq!(row.country, "United States");
        assert_eq!(row.city, "");
        assert_eq!(row.status, "active");
        assert_eq!(row.visibility, "pending");
        assert_eq!(row.description, None);
        assert_eq!(row.state, None);
        assert_eq!(row.url, None);
    }

    #[test]
    fn new_program_keeps_supplied_fields() {
        let record = ProgramRecord::from_value(json!({
            "university_name": "Acme U",
            "name": "MS CS",
            "degree_type": "masters",
            "country": "Canada",
            "city": "Toronto",
            "state": "ON",
            "url": "https://acme.example/mscs",
            "status": "archived",
            "visibility": "public",
            "description": "Thesis track",
        }))
        .unwrap();
        let row = NewProgram::from_record(UniversityId(1), "MS CS", &record);
        assert_eq!(row.degree_type, "masters");
        assert_eq!(row.country, "Canada");
        assert_eq!(row.city, "Toronto");
        assert_eq!(row.state.as_deref(), Some("ON"));
        assert_eq!(row.url.as_deref(), Some("https://acme.example/mscs"));
        assert_eq!(row.status, "archived");
        assert_eq!(row.visibility, "public");
        assert_eq!(row.description.as_deref(), Some("Thesis track"));
    }
}
