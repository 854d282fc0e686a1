// tinsel-core/src/models/toy.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One inventory entry. Persisted by every backend after each mutation and
/// loaded in full at startup. Records carry no relationships; name lookups
/// during update/categorize are by exact match, not by id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToyRecord {
    pub id: Uuid,
    pub name: String,
    pub amount: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
}

impl ToyRecord {
    /// A fresh record with a new id and no category.
    pub fn new(name: impl Into<String>, amount: u32) -> Self {
        ToyRecord {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            category: None,
        }
    }
}
