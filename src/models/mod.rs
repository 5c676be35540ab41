pub mod enums;
pub mod patient;
pub mod report;

pub use enums::*;
pub use patient::*;
pub use report::*;
