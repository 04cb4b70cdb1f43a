//! Data types for person records, list filters, and page selection.

use people_core::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A person row from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    pub age: u32,
    pub gender: String,
    pub nationality: String,
}

impl PersonRecord {
    /// Attach a store-assigned id to a set of person fields.
    pub fn from_parts(id: i64, person: NewPerson) -> Self {
        Self {
            id,
            name: person.name,
            surname: person.surname,
            patronymic: person.patronymic,
            age: person.age,
            gender: person.gender,
            nationality: person.nationality,
        }
    }
}

/// Every mutable column of a person row: what gets inserted on create and
/// overwritten on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub age: u32,
    pub gender: String,
    pub nationality: String,
}

/// Create/update request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInput {
    pub name: String,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
}

impl PersonInput {
    /// Reject blank required fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("name is required".into()));
        }
        if self.surname.trim().is_empty() {
            return Err(Error::Validation("surname is required".into()));
        }
        Ok(())
    }
}

/// Optional equality constraints for listing people. `None` leaves the
/// column unconstrained; present fields are ANDed. `age` is signed so that
/// an impossible value such as `-1` simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

impl PersonFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// 1-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Parse raw query values. Missing, unparseable, or non-positive values
    /// fall back to the defaults instead of failing.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            number: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            size: parse_positive(limit).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::from_query(None, None);
        assert_eq!(page, Page { number: 1, size: 10 });
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_page_coerces_invalid_values() {
        assert_eq!(Page::from_query(Some("0"), Some("-3")), Page::default());
        assert_eq!(Page::from_query(Some("abc"), Some("")), Page::default());
    }

    #[test]
    fn test_page_offset() {
        let page = Page::from_query(Some("2"), Some("5"));
        assert_eq!(page.offset(), 5);
        assert_eq!(page.limit(), 5);

        let page = Page::from_query(Some("4"), Some("25"));
        assert_eq!(page.offset(), 75);
    }

    #[test]
    fn test_input_validation() {
        let ok = PersonInput {
            name: "Dmitriy".into(),
            surname: "Ushakov".into(),
            patronymic: None,
        };
        assert!(ok.validate().is_ok());

        let blank_name = PersonInput {
            name: "   ".into(),
            ..ok.clone()
        };
        assert!(matches!(blank_name.validate(), Err(Error::Validation(_))));

        let blank_surname = PersonInput {
            surname: String::new(),
            ..ok
        };
        assert!(matches!(blank_surname.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_record_json_omits_missing_patronymic() {
        let record = PersonRecord {
            id: 1,
            name: "Dmitriy".into(),
            surname: "Ushakov".into(),
            patronymic: None,
            age: 34,
            gender: "male".into(),
            nationality: "RU".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Dmitriy",
                "surname": "Ushakov",
                "age": 34,
                "gender": "male",
                "nationality": "RU",
            })
        );
    }

    #[test]
    fn test_filter_is_empty() {
        assert!(PersonFilter::default().is_empty());
        let filter = PersonFilter {
            age: Some(30),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
