// Document content transforms applied before pagination.

pub mod markup;

pub use markup::strip_markup;
