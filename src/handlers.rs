pub mod fields;
pub mod leads;
pub mod setup;
pub mod users;
