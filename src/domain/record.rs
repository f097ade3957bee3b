use super::extraction::ExtractionResult;

/// One row of an uploaded sheet. `cells` holds every column of the row, in
/// header order, so the output can carry them through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub full_name: String,
    pub cells: Vec<String>,
}

impl InputRecord {
    pub fn new(full_name: impl Into<String>, cells: Vec<String>) -> Self {
        InputRecord {
            full_name: full_name.into(),
            cells,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_name(full_name: &str) -> Self {
        InputRecord::new(full_name, vec![full_name.to_string()])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrichmentStatus {
    Resolved,
    NotFound,
    Skipped,
    Failed,
}

impl EnrichmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentStatus::Resolved => "resolved",
            EnrichmentStatus::NotFound => "not_found",
            EnrichmentStatus::Skipped => "skipped",
            EnrichmentStatus::Failed => "failed",
        }
    }
}

/// An input row plus the match found for it. Built once by the enricher and
/// never mutated afterwards, hence no public fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    record: InputRecord,
    extraction: ExtractionResult,
    status: EnrichmentStatus,
}

impl EnrichedRecord {
    pub fn resolved(record: InputRecord, extraction: ExtractionResult) -> Self {
        let extraction = extraction.normalized();
        let status = match extraction.is_not_found() {
            true => EnrichmentStatus::NotFound,
            false => EnrichmentStatus::Resolved,
        };

        EnrichedRecord {
            record,
            extraction,
            status,
        }
    }

    pub fn skipped(record: InputRecord) -> Self {
        EnrichedRecord {
            record,
            extraction: ExtractionResult::not_found(),
            status: EnrichmentStatus::Skipped,
        }
    }

    pub fn failed(record: InputRecord) -> Self {
        EnrichedRecord {
            record,
            extraction: ExtractionResult::not_found(),
            status: EnrichmentStatus::Failed,
        }
    }

    pub fn record(&self) -> &InputRecord {
        &self.record
    }

    pub fn extraction(&self) -> &ExtractionResult {
        &self.extraction
    }

    pub fn status(&self) -> EnrichmentStatus {
        self.status
    }
}

/// Enriched records in input order, one per input row.
pub type Batch = Vec<EnrichedRecord>;

#[cfg(test)]
mod tests {
    use super::{EnrichedRecord, EnrichmentStatus, InputRecord};
    use crate::domain::extraction::ExtractionResult;

    #[test]
    fn resolved_with_sentinel_is_not_found() {
        let enriched = EnrichedRecord::resolved(
            InputRecord::from_name("Jane Doe"),
            ExtractionResult {
                profile_url: "".to_string(),
                role: "CEO".to_string(),
                confidence: 70,
            },
        );

        assert_eq!(enriched.status(), EnrichmentStatus::NotFound);
        assert_eq!(enriched.extraction(), &ExtractionResult::not_found());
    }

    #[test]
    fn skipped_and_failed_carry_sentinel() {
        let skipped = EnrichedRecord::skipped(InputRecord::from_name(""));
        let failed = EnrichedRecord::failed(InputRecord::from_name("Jane Doe"));

        assert_eq!(skipped.extraction(), &ExtractionResult::not_found());
        assert_eq!(failed.extraction(), &ExtractionResult::not_found());
        assert_eq!(skipped.status(), EnrichmentStatus::Skipped);
        assert_eq!(failed.status(), EnrichmentStatus::Failed);
    }
}
