pub mod formula;
pub mod theorem;
pub mod proof;
pub mod scope;
pub mod rules;

pub use formula::*;
pub use theorem::*;
pub use proof::*;
pub use scope::*;
