pub mod jwt;
pub mod password;
pub mod validation;

pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};
pub use validation::{clean_phone, is_valid_email, validate_registration, DEFAULT_CITY};
