//! Runtime types.

use people_store::{NewPerson, PersonInput};
use serde::Serialize;

/// Result of one enrichment pass over a given name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub age: u32,
    pub gender: String,
    pub nationality: String,
}

impl Enrichment {
    /// Merge the guesses with user-supplied fields into a full row.
    pub fn merge(self, input: PersonInput) -> NewPerson {
        NewPerson {
            name: input.name,
            surname: input.surname,
            patronymic: input.patronymic,
            age: self.age,
            gender: self.gender,
            nationality: self.nationality,
        }
    }
}
