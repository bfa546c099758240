use serde::{Deserialize, Serialize};

/// Every column of the technicians table, in projection order.
pub const TECHNICIAN_COLUMNS: &[&str] = &[
    "id",
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

/// Columns returned by the contact search; `id` and `code` are never exposed there.
pub const CONTACT_COLUMNS: &[&str] = &[
    "name",
    "region",
    "email",
    "phone",
    "tech_manager_email",
    "tech_manager_phone",
    "ops_manager_email",
    "ops_manager_phone",
];

/// Full roster entry as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub region: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tech_manager_email: Option<String>,
    pub tech_manager_phone: Option<String>,
    pub ops_manager_email: Option<String>,
    pub ops_manager_phone: Option<String>,
}

/// Contact projection returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianContact {
    pub name: String,
    pub region: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tech_manager_email: Option<String>,
    pub tech_manager_phone: Option<String>,
    pub ops_manager_email: Option<String>,
    pub ops_manager_phone: Option<String>,
}

impl From<&Technician> for TechnicianContact {
    fn from(t: &Technician) -> Self {
        Self {
            name: t.name.clone(),
            region: t.region.clone(),
            email: t.email.clone(),
            phone: t.phone.clone(),
            tech_manager_email: t.tech_manager_email.clone(),
            tech_manager_phone: t.tech_manager_phone.clone(),
            ops_manager_email: t.ops_manager_email.clone(),
            ops_manager_phone: t.ops_manager_phone.clone(),
        }
    }
}

/// Insert payload. Absent optional fields are left to the store default (null).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewTechnician {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_manager_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_manager_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_manager_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_manager_phone: Option<String>,
}

/// Partial update. `None` leaves a column untouched; for nullable columns
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechnicianPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_manager_email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_manager_phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_manager_email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_manager_phone: Option<Option<String>>,
}

impl TechnicianPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalized form of a technician code: trimmed and upper-cased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}
