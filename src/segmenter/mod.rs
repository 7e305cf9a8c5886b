pub mod paragraphs;
pub mod roles;

pub use paragraphs::*;
pub use roles::*;
