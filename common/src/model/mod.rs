pub mod csv;
pub mod generation;
pub mod mapping;
pub mod place_holder;
pub mod tag;
pub mod template;
