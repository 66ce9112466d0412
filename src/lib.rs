mod dynamic_array;
mod error;
pub mod sort;

pub use dynamic_array::{DynamicArray, DEFAULT_CAPACITY};
pub use error::ArrayError;
pub use sort::SortStrategy;
