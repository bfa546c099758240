use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::database::models::technician::{normalize_code, NewTechnician, TechnicianPatch};

/// Fields an admin payload may carry.
pub const WRITABLE_FIELDS: &[&str] = &[
    "code",
    "name",
    "region",
    "email",
    "phone",
    "tech_manager_email",
    "tech_manager_phone",
    "ops_manager_email",
    "ops_manager_phone",
];

/// Store-owned fields. Clients routinely echo them back, so they are dropped, never applied.
const READ_ONLY_FIELDS: &[&str] = &["id"];

/// Errors that can occur while extracting a technician payload
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Payload must be a JSON object")]
    NotAnObject,
    #[error("No valid fields to update")]
    NothingToUpdate,
    #[error("Invalid technician fields: {0:?}")]
    Fields(BTreeMap<String, String>),
}

/// Extract an insert payload. `code` and `name` are required and normalized.
pub fn new_technician_from_json(json: Value) -> Result<NewTechnician, RecordError> {
    let mut input = FieldExtractor::new(json)?;

    let record = NewTechnician {
        code: input.required_text("code").map(|c| normalize_code(&c)).unwrap_or_default(),
        name: input.required_text("name").unwrap_or_default(),
        region: input.nullable_text("region").flatten(),
        email: input.nullable_text("email").flatten(),
        phone: input.nullable_text("phone").flatten(),
        tech_manager_email: input.nullable_text("tech_manager_email").flatten(),
        tech_manager_phone: input.nullable_text("tech_manager_phone").flatten(),
        ops_manager_email: input.nullable_text("ops_manager_email").flatten(),
        ops_manager_phone: input.nullable_text("ops_manager_phone").flatten(),
    };

    input.finish(record)
}

/// Extract a partial update. At least one writable field must be present.
pub fn technician_patch_from_json(json: Value) -> Result<TechnicianPatch, RecordError> {
    let mut input = FieldExtractor::new(json)?;

    let patch = TechnicianPatch {
        code: input.optional_text("code").map(|c| normalize_code(&c)),
        name: input.optional_text("name"),
        region: input.nullable_text("region"),
        email: input.nullable_text("email"),
        phone: input.nullable_text("phone"),
        tech_manager_email: input.nullable_text("tech_manager_email"),
        tech_manager_phone: input.nullable_text("tech_manager_phone"),
        ops_manager_email: input.nullable_text("ops_manager_email"),
        ops_manager_phone: input.nullable_text("ops_manager_phone"),
    };

    let patch = input.finish(patch)?;
    if patch.is_empty() {
        return Err(RecordError::NothingToUpdate);
    }
    Ok(patch)
}

/// Field-by-field reader over an untrusted JSON object, collecting every problem
/// so the client sees all of them at once.
struct FieldExtractor {
    fields: Map<String, Value>,
    errors: BTreeMap<String, String>,
}

impl FieldExtractor {
    fn new(json: Value) -> Result<Self, RecordError> {
        let Value::Object(mut fields) = json else {
            return Err(RecordError::NotAnObject);
        };

        for key in READ_ONLY_FIELDS {
            if fields.remove(*key).is_some() {
                tracing::debug!("Ignoring read-only field '{}' in technician payload", key);
            }
        }

        let mut errors = BTreeMap::new();
        for key in fields.keys() {
            if !WRITABLE_FIELDS.contains(&key.as_str()) {
                errors.insert(key.clone(), "unknown field".to_string());
            }
        }

        Ok(Self { fields, errors })
    }

    /// Required non-blank string, returned trimmed.
    fn required_text(&mut self, name: &str) -> Option<String> {
        if !self.fields.contains_key(name) {
            self.reject(name, "is required");
            return None;
        }
        self.optional_text(name)
    }

    /// Non-blank string when present; null is rejected since the column is mandatory.
    fn optional_text(&mut self, name: &str) -> Option<String> {
        match self.fields.remove(name)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::String(_) => {
                self.reject(name, "must not be empty");
                None
            }
            _ => {
                self.reject(name, "must be a string");
                None
            }
        }
    }

    /// `None` when absent, `Some(None)` for an explicit null.
    fn nullable_text(&mut self, name: &str) -> Option<Option<String>> {
        match self.fields.remove(name)? {
            Value::Null => Some(None),
            Value::String(s) => Some(Some(s)),
            _ => {
                self.reject(name, "must be a string or null");
                None
            }
        }
    }

    fn reject(&mut self, name: &str, reason: &str) {
        self.errors.insert(name.to_string(), reason.to_string());
    }

    fn finish<T>(self, value: T) -> Result<T, RecordError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(RecordError::Fields(self.errors))
        }
    }
}
