pub mod batch_processor;
pub mod openai_client;
pub mod record_enricher;
pub mod spreadsheet;
pub mod tavily_client;

pub use batch_processor::*;
pub use openai_client::*;
pub use record_enricher::*;
pub use spreadsheet::*;
pub use tavily_client::*;
