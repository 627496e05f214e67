use serde::{Deserialize, Serialize};

use crate::pii::Masked;
use crate::{CoreError, CoreResult};

/// Last name sent to the supplier when the traveler gave a single name.
pub const UNKNOWN_LAST_NAME: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

/// What to do when an offer prices more travelers than the form supplied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PassengerPolicy {
    /// Fill the missing slots with the first passenger.
    #[default]
    ReusePrimary,
    /// Refuse the booking.
    Strict,
}

// ============================================================================
// Frontend Traveler Input
// ============================================================================

/// One passenger as entered in the booking form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub passport_number: Masked<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: Gender,
}

/// Flat single-traveler fields sent by older frontends.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTraveler {
    pub full_name: Option<String>,
    pub passport_number: Option<Masked<String>>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
}

/// Traveler block of a booking request.
///
/// Either `{"passengers": [...]}` or the legacy flat fields. Current frontends
/// send both; the list takes precedence when it is non-empty.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TravelerInput {
    #[serde(default)]
    pub passengers: Vec<PassengerDetails>,
    #[serde(flatten)]
    pub legacy: LegacyTraveler,
}

impl TravelerInput {
    /// Collapse both accepted shapes into a non-empty passenger list.
    pub fn normalize(self) -> CoreResult<Vec<PassengerDetails>> {
        let passengers = if !self.passengers.is_empty() {
            self.passengers
        } else if let Some(full_name) = self.legacy.full_name {
            vec![PassengerDetails {
                full_name,
                passport_number: self.legacy.passport_number.unwrap_or_default(),
                email: self.legacy.email.unwrap_or_default(),
                gender: self.legacy.gender.unwrap_or_default(),
            }]
        } else {
            return Err(CoreError::ValidationError(
                "traveler data contains no passengers".to_string(),
            ));
        };

        if let Some(index) = passengers.iter().position(|p| p.full_name.trim().is_empty()) {
            return Err(CoreError::ValidationError(format!(
                "passenger {} has no full name",
                index + 1
            )));
        }

        Ok(passengers)
    }
}

// ============================================================================
// Placeholder Personal Data
// ============================================================================

/// Values sent to the supplier for fields the booking form does not collect.
///
/// These are configuration, not facts about the traveler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TravelerDefaults {
    pub date_of_birth: String,
    pub phone_country_code: String,
    pub phone_number: String,
    pub birth_place: String,
    pub issuance_location: String,
    pub issuance_date: String,
    pub expiry_date: String,
    pub issuance_country: String,
    pub validity_country: String,
    pub nationality: String,
}

impl Default for TravelerDefaults {
    fn default() -> Self {
        Self {
            date_of_birth: "1990-01-01".to_string(),
            phone_country_code: "62".to_string(),
            phone_number: "8123456789".to_string(),
            birth_place: "Jakarta".to_string(),
            issuance_location: "Jakarta".to_string(),
            issuance_date: "2020-01-01".to_string(),
            expiry_date: "2030-01-01".to_string(),
            issuance_country: "ID".to_string(),
            validity_country: "ID".to_string(),
            nationality: "ID".to_string(),
        }
    }
}

// ============================================================================
// Amadeus Traveler Document
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelerPayload {
    pub id: String,
    pub date_of_birth: String,
    pub name: TravelerName,
    pub gender: Gender,
    pub contact: TravelerContact,
    pub documents: Vec<TravelDocument>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelerName {
    pub first_name: String,
    pub last_name: String,
}

impl TravelerName {
    /// First whitespace-separated token is the first name, the rest is the last name.
    pub fn from_full_name(full_name: &str) -> Self {
        let mut parts = full_name.split_whitespace();
        let first_name = parts.next().unwrap_or_default().to_uppercase();
        let rest: Vec<&str> = parts.collect();
        let last_name = if rest.is_empty() {
            UNKNOWN_LAST_NAME.to_string()
        } else {
            rest.join(" ").to_uppercase()
        };

        Self { first_name, last_name }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelerContact {
    pub email_address: String,
    pub phones: Vec<Phone>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub device_type: String,
    pub country_calling_code: String,
    pub number: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelDocument {
    pub document_type: String,
    pub birth_place: String,
    pub issuance_location: String,
    pub issuance_date: String,
    pub number: Masked<String>,
    pub expiry_date: String,
    pub issuance_country: String,
    pub validity_country: String,
    pub nationality: String,
    pub holder: bool,
}

impl TravelerPayload {
    /// Build the supplier traveler for slot `id` from a form passenger.
    pub fn from_passenger(id: usize, passenger: &PassengerDetails, defaults: &TravelerDefaults) -> Self {
        Self {
            id: id.to_string(),
            date_of_birth: defaults.date_of_birth.clone(),
            name: TravelerName::from_full_name(&passenger.full_name),
            gender: passenger.gender,
            contact: TravelerContact {
                email_address: passenger.email.clone(),
                phones: vec![Phone {
                    device_type: "MOBILE".to_string(),
                    country_calling_code: defaults.phone_country_code.clone(),
                    number: defaults.phone_number.clone(),
                }],
            },
            documents: vec![TravelDocument {
                document_type: "PASSPORT".to_string(),
                birth_place: defaults.birth_place.clone(),
                issuance_location: defaults.issuance_location.clone(),
                issuance_date: defaults.issuance_date.clone(),
                number: passenger.passport_number.clone(),
                expiry_date: defaults.expiry_date.clone(),
                issuance_country: defaults.issuance_country.clone(),
                validity_country: defaults.validity_country.clone(),
                nationality: defaults.nationality.clone(),
                holder: true,
            }],
        }
    }
}
