//! External systems: Asana (task tracker) and Intercom (messaging).

pub mod asana;
pub mod intercom;

pub use asana::{ASANA_API_URL, AsanaAdapter};
pub use intercom::{INTERCOM_API_URL, IntercomAdapter};
