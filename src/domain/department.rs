use serde::{Deserialize, Serialize};

pub type DepartmentId = i64;

/// A department a product can belong to. Read-only from the console's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    #[serde(rename = "nome")]
    pub name: String,
}

impl Department {
    pub fn new(id: DepartmentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
