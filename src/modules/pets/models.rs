use chrono::NaiveDate;
use serde::Deserialize;

/// Payload for registering a pet. Name, specie and birth date are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePet {
    pub name: Option<String>,
    pub specie: Option<String>,
    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,
}

/// Partial update. Adoption state is not editable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePet {
    pub name: Option<String>,
    pub specie: Option<String>,
    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,
}
