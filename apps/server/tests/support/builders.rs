use axum::body::Bytes;
use serde_json::{json, Value};

/// Converts a JSON value to request body bytes
pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Request body builder; unset fields are omitted from the JSON.
#[derive(Debug, Default)]
pub struct PatientBuilder {
    name_id: Option<String>,
    name_use: Option<String>,
    family: Option<String>,
    given: Vec<String>,
    gender: Option<String>,
    birth_date: Option<String>,
    active: Option<bool>,
}

impl PatientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_id(self, id: &str) -> Self {
        Self {
            name_id: Some(id.to_owned()),
            ..self
        }
    }

    pub fn name_use(self, name_use: &str) -> Self {
        Self {
            name_use: Some(name_use.to_owned()),
            ..self
        }
    }

    pub fn family(self, family: &str) -> Self {
        Self {
            family: Some(family.to_owned()),
            ..self
        }
    }

    /// Appends; call once per given name.
    pub fn given(mut self, given: &str) -> Self {
        self.given.push(given.to_owned());
        self
    }

    pub fn gender(self, gender: &str) -> Self {
        Self {
            gender: Some(gender.to_owned()),
            ..self
        }
    }

    pub fn birth_date(self, birth_date: &str) -> Self {
        Self {
            birth_date: Some(birth_date.to_owned()),
            ..self
        }
    }

    pub fn active(self, active: bool) -> Self {
        Self {
            active: Some(active),
            ..self
        }
    }

    pub fn build(self) -> Value {
        without_nulls(json!({
            "name": without_nulls(json!({
                "id": self.name_id,
                "use": self.name_use,
                "family": self.family,
                "given": self.given,
            })),
            "gender": self.gender,
            "birthDate": self.birth_date,
            "active": self.active,
        }))
    }
}

fn without_nulls(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.retain(|_, v| !v.is_null());
    }
    value
}

/// A valid patient born at `birth_date`
pub fn patient_born(family: &str, birth_date: &str) -> Value {
    PatientBuilder::new()
        .family(family)
        .given("Ivan")
        .given("Ivanovich")
        .birth_date(birth_date)
        .build()
}
