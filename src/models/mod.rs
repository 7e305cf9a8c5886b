pub mod dictionary;
pub mod metadata;
pub mod report;

pub use dictionary::*;
pub use metadata::*;
pub use report::*;
