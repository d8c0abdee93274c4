pub mod actor;
pub mod comment;
