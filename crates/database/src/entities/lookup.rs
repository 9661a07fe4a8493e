//! Cuisine and allergy lookup tables

use serde::{Deserialize, Serialize};

/// Which lookup table and join table a name list lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    Cuisine,
    Allergy,
}

impl LookupKind {
    pub(crate) fn lookup_table(&self) -> &'static str {
        match self {
            LookupKind::Cuisine => "cuisines",
            LookupKind::Allergy => "allergies",
        }
    }

    pub(crate) fn join_table(&self) -> &'static str {
        match self {
            LookupKind::Cuisine => "user_cuisines",
            LookupKind::Allergy => "user_allergies",
        }
    }

    pub(crate) fn id_column(&self) -> &'static str {
        match self {
            LookupKind::Cuisine => "cuisine_id",
            LookupKind::Allergy => "allergy_id",
        }
    }
}
