//! People Predict — clients for the agify / genderize / nationalize style
//! lookup-by-name endpoints.

pub mod clients;
pub mod types;

pub use clients::{AgeClient, GenderClient, LookupClient, NationalityClient, Predictor};
pub use types::*;
