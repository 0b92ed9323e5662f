mod category;
mod category_name;

pub use category::Category;
pub use category_name::{CategoryName, CategoryNameError, FORBIDDEN_CHARACTERS, contains_forbidden_character};
