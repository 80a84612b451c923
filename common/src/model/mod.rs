pub mod field;
pub mod upload;
pub mod value;
