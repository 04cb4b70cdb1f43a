//! Wire types of the prediction endpoints.

use serde::{Deserialize, Serialize};

/// `GET <agify>?name=...` response. `age` is `null` for unknown names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeResponse {
    #[serde(default)]
    pub count: u64,
    pub name: String,
    pub age: Option<u32>,
}

/// `GET <genderize>?name=...` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderResponse {
    #[serde(default)]
    pub count: u64,
    pub name: String,
    pub gender: Option<String>,
    #[serde(default)]
    pub probability: f64,
}

/// One ranked nationality guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryGuess {
    pub country_id: String,
    pub probability: f64,
}

/// `GET <nationalize>?name=...` response. `country` is ranked, most likely
/// first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NationalityResponse {
    #[serde(default)]
    pub count: u64,
    pub name: String,
    pub country: Vec<CountryGuess>,
}

impl NationalityResponse {
    /// Best guess country code, empty when the service has no guess.
    pub fn best_guess(&self) -> String {
        self.country
            .first()
            .map(|c| c.country_id.clone())
            .unwrap_or_default()
    }
}
