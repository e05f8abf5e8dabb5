pub mod academic_year;
pub mod extractor;
pub mod file_magic;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod validate;

pub use academic_year::{academic_year_for, current_academic_year};
pub use extractor::{SafeClassIdI64, SafeIDI64};
pub use file_magic::{normalized_extension, validate_magic_bytes};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
