pub mod file_magic;
pub mod image_normalizer;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod validate;

pub use file_magic::{extension_of, validate_magic_bytes};
pub use image_normalizer::{NormalizedImage, normalize_image};
pub use parameter_error_handler::configure_parameter_handlers;
pub use sql::escape_like_pattern;
