//! Document source: finding notes and deciding which need the classifier

pub mod error;
pub mod exclusion;
pub mod precheck;
pub mod scanner;

pub use error::{Result, ScoutError};
pub use exclusion::ExclusionList;
pub use precheck::check_content;
pub use scanner::{read_content, DiscoveredFile, Scanner};
