pub mod fmt;
pub mod validate;
pub mod validate_all;
