use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;

use crate::{
    domain::{EnrichedRecord, ExtractionResult, InputRecord},
    error::EnrichmentError,
};

use super::{ProfileExtractor, ProfileSearcher};

/// Runs search then extraction for a single record. This is where one record's
/// failure is contained: `enrich` always hands back a record.
#[derive(Clone)]
pub struct RecordEnricher {
    searcher: Arc<dyn ProfileSearcher>,
    extractor: Arc<dyn ProfileExtractor>,
}

impl RecordEnricher {
    pub fn new(searcher: Arc<dyn ProfileSearcher>, extractor: Arc<dyn ProfileExtractor>) -> Self {
        RecordEnricher {
            searcher,
            extractor,
        }
    }

    pub async fn enrich(&self, record: InputRecord) -> EnrichedRecord {
        let full_name = record.full_name.trim().to_string();
        if full_name.is_empty() {
            return EnrichedRecord::skipped(record);
        }

        let outcome = AssertUnwindSafe(self.find_profile(&full_name))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(EnrichmentError::Unexpected(panic_message(panic))));

        match outcome {
            Ok(extraction) => EnrichedRecord::resolved(record, extraction),
            Err(e) => {
                log::error!("Failed to enrich {}: {}", full_name, e);
                EnrichedRecord::failed(record)
            }
        }
    }

    async fn find_profile(&self, full_name: &str) -> Result<ExtractionResult, EnrichmentError> {
        let results = self.searcher.search(full_name).await?;

        Ok(self.extractor.extract(full_name, &results).await)
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(message) => *message,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "panic with non-string payload".to_string(),
        },
    }
}
