pub mod department;
pub mod product;

pub use department::*;
pub use product::*;
