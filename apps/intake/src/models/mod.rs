pub mod document;
pub mod feedback;
pub mod profile;
pub mod result;
