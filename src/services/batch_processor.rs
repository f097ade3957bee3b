use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::{Batch, InputRecord};

use super::RecordEnricher;

pub struct BatchProcessor {
    enricher: RecordEnricher,
}

impl BatchProcessor {
    pub fn new(enricher: RecordEnricher) -> Self {
        BatchProcessor { enricher }
    }

    /// Enriches every record one after the other. The batch has exactly one
    /// entry per input record, in input order.
    pub async fn process(&self, records: Vec<InputRecord>) -> Batch {
        let batch_id = Uuid::new_v4();
        let total = records.len();
        log::info!("Batch {}: enriching {} records", batch_id, total);

        let mut batch = Batch::with_capacity(total);
        for (idx, record) in records.into_iter().enumerate() {
            let enriched = self.enricher.enrich(record).await;
            log::info!(
                "Batch {}: record {}/{} {}",
                batch_id,
                idx + 1,
                total,
                enriched.status().as_str()
            );
            batch.push(enriched);
        }

        let mut summary: BTreeMap<&str, usize> = BTreeMap::new();
        for enriched in batch.iter() {
            *summary.entry(enriched.status().as_str()).or_default() += 1;
        }
        log::info!("Batch {}: done {:?}", batch_id, summary);

        batch
    }
}
