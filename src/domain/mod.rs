pub mod extraction;
pub mod record;
pub mod search_result;

pub use extraction::*;
pub use record::*;
pub use search_result::*;
