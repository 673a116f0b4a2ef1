use std::sync::Arc;

use tracing::{debug, warn};

use backend::PageAnalysis;
use exam_core::model::{ExamId, FallbackLayout, MappingTable, QuestionRange};

/// Where a resolved table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingOrigin {
    /// Derived from the actual document content by the analysis service.
    Authoritative,
    /// Synthesized locally from the fallback layout.
    Synthesized,
}

/// A mapping table together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapping {
    pub table: MappingTable,
    pub origin: MappingOrigin,
}

impl ResolvedMapping {
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        matches!(self.origin, MappingOrigin::Authoritative)
    }
}

/// Resolves the question→page mapping for an exam.
///
/// One resolution attempt per exam selection: the authoritative analysis is
/// tried first, and only after it has definitively failed is the fallback
/// synthesized. Resolution never fails — a bad remote answer degrades
/// accuracy, not availability.
#[derive(Clone)]
pub struct MappingResolver {
    analysis: Arc<dyn PageAnalysis>,
    fallback: FallbackLayout,
}

impl MappingResolver {
    #[must_use]
    pub fn new(analysis: Arc<dyn PageAnalysis>) -> Self {
        Self {
            analysis,
            fallback: FallbackLayout::default(),
        }
    }

    /// Overrides the fallback layout, for exams whose documents have
    /// different front matter.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackLayout) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn fallback(&self) -> FallbackLayout {
        self.fallback
    }

    /// Resolves the mapping table for the given exam and question range.
    ///
    /// Authoritative entries are adopted verbatim in the order received. A
    /// fetch failure, or a response that violates the table invariants
    /// (duplicate question numbers), counts as malformed and triggers the
    /// synthesized fallback instead.
    pub async fn resolve(&self, exam: &ExamId, range: QuestionRange) -> ResolvedMapping {
        match self.analysis.fetch_mappings(exam, range).await {
            Ok(entries) => match MappingTable::from_entries(entries) {
                Ok(table) => {
                    debug!(exam = %exam, entries = table.len(), "adopted authoritative page mapping");
                    ResolvedMapping {
                        table,
                        origin: MappingOrigin::Authoritative,
                    }
                }
                Err(e) => {
                    warn!(exam = %exam, error = %e, "authoritative mapping is inconsistent, synthesizing fallback");
                    self.synthesize(range)
                }
            },
            Err(e) => {
                warn!(exam = %exam, error = %e, "page analysis unavailable, synthesizing fallback");
                self.synthesize(range)
            }
        }
    }

    fn synthesize(&self, range: QuestionRange) -> ResolvedMapping {
        ResolvedMapping {
            table: self.fallback.synthesize(range),
            origin: MappingOrigin::Synthesized,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use backend::{InMemorySource, SourceError};
    use exam_core::model::{PageMapping, QuestionNumber};

    struct FailingAnalysis;

    #[async_trait]
    impl PageAnalysis for FailingAnalysis {
        async fn fetch_mappings(
            &self,
            _exam: &ExamId,
            _range: QuestionRange,
        ) -> Result<Vec<PageMapping>, SourceError> {
            Err(SourceError::Unreachable("connection refused".into()))
        }
    }

    struct DuplicateAnalysis;

    #[async_trait]
    impl PageAnalysis for DuplicateAnalysis {
        async fn fetch_mappings(
            &self,
            _exam: &ExamId,
            _range: QuestionRange,
        ) -> Result<Vec<PageMapping>, SourceError> {
            let entry = PageMapping::new(QuestionNumber::new(1), 18, 20).unwrap();
            Ok(vec![entry, entry])
        }
    }

    fn exam() -> ExamId {
        ExamId::new("az-204")
    }

    #[tokio::test]
    async fn authoritative_entries_are_adopted_verbatim() {
        let source = InMemorySource::new();
        source.insert_mappings(
            exam(),
            vec![
                PageMapping::new(QuestionNumber::new(2), 21, 23).unwrap(),
                PageMapping::new(QuestionNumber::new(1), 18, 20).unwrap(),
            ],
        );

        let resolver = MappingResolver::new(Arc::new(source));
        let resolved = resolver
            .resolve(&exam(), QuestionRange::new(1, 2).unwrap())
            .await;

        assert!(resolved.is_authoritative());
        // Order received, not sorted.
        assert_eq!(
            resolved.table.entries()[0].question(),
            QuestionNumber::new(2)
        );
    }

    #[tokio::test]
    async fn fetch_failure_synthesizes_the_fallback() {
        let resolver = MappingResolver::new(Arc::new(FailingAnalysis));
        let resolved = resolver
            .resolve(&exam(), QuestionRange::new(1, 200).unwrap())
            .await;

        assert_eq!(resolved.origin, MappingOrigin::Synthesized);
        assert_eq!(resolved.table.len(), 200);

        let first = resolved.table.get(QuestionNumber::new(1)).unwrap();
        assert_eq!((first.start_page(), first.end_page()), (18, 20));
        let last = resolved.table.get(QuestionNumber::new(200)).unwrap();
        assert_eq!((last.start_page(), last.end_page()), (515, 517));
    }

    #[tokio::test]
    async fn inconsistent_authoritative_data_falls_back() {
        let resolver = MappingResolver::new(Arc::new(DuplicateAnalysis));
        let resolved = resolver
            .resolve(&exam(), QuestionRange::new(1, 10).unwrap())
            .await;

        assert_eq!(resolved.origin, MappingOrigin::Synthesized);
        assert_eq!(resolved.table.len(), 10);
    }

    #[tokio::test]
    async fn empty_authoritative_response_is_adopted() {
        let source = InMemorySource::new();
        source.insert_mappings(exam(), Vec::new());

        let resolver = MappingResolver::new(Arc::new(source));
        let resolved = resolver
            .resolve(&exam(), QuestionRange::new(1, 10).unwrap())
            .await;

        assert!(resolved.is_authoritative());
        assert!(resolved.table.is_empty());
    }

    #[tokio::test]
    async fn custom_fallback_layout_is_honored() {
        let layout = FallbackLayout::new(5, 1.0).unwrap();
        let resolver = MappingResolver::new(Arc::new(FailingAnalysis)).with_fallback(layout);
        let resolved = resolver
            .resolve(&exam(), QuestionRange::new(1, 3).unwrap())
            .await;

        let first = resolved.table.get(QuestionNumber::new(1)).unwrap();
        assert_eq!((first.start_page(), first.end_page()), (5, 6));
    }
}
