use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use backend::{InMemorySource, PageAnalysis, SourceError};
use exam_core::model::{
    ExamId, FallbackLayout, PageMapping, QuestionNumber, QuestionRange,
};
use services::{DocumentViewer, JumpOutcome, MappingOrigin, MappingResolver, NavigationSync};

#[derive(Default)]
struct RecordingViewer {
    pages: Mutex<Vec<u32>>,
}

impl RecordingViewer {
    fn pages(&self) -> Vec<u32> {
        self.pages.lock().expect("pages lock").clone()
    }
}

impl DocumentViewer for RecordingViewer {
    fn go_to_page(&self, page: u32) {
        self.pages.lock().expect("pages lock").push(page);
    }
}

struct UnreachableAnalysis;

#[async_trait]
impl PageAnalysis for UnreachableAnalysis {
    async fn fetch_mappings(
        &self,
        _exam: &ExamId,
        _range: QuestionRange,
    ) -> Result<Vec<PageMapping>, SourceError> {
        Err(SourceError::Unreachable("connection refused".into()))
    }
}

fn exam() -> ExamId {
    ExamId::new("az-204")
}

#[tokio::test]
async fn fallback_resolution_keeps_navigation_usable() {
    let resolver = MappingResolver::new(Arc::new(UnreachableAnalysis));
    let resolved = resolver
        .resolve(&exam(), QuestionRange::new(1, 200).unwrap())
        .await;

    assert_eq!(resolved.origin, MappingOrigin::Synthesized);
    assert_eq!(resolved.table.len(), 200);

    let first = resolved.table.get(QuestionNumber::new(1)).unwrap();
    assert_eq!((first.start_page(), first.end_page()), (18, 20));
    let last = resolved.table.get(QuestionNumber::new(200)).unwrap();
    assert_eq!((last.start_page(), last.end_page()), (515, 517));

    // The synthesized table drives navigation with no further error
    // handling downstream.
    let viewer = Arc::new(RecordingViewer::default());
    let sync = NavigationSync::new(viewer.clone()).with_table(resolved.table);
    assert!(sync.jump_to_question(QuestionNumber::new(42)).jumped());
    assert_eq!(viewer.pages().len(), 1);
}

#[tokio::test]
async fn jump_then_page_change_round_trips_to_the_same_question() {
    let source = InMemorySource::new();
    source.insert_mappings(
        exam(),
        vec![
            PageMapping::new(QuestionNumber::new(1), 18, 20).unwrap(),
            PageMapping::new(QuestionNumber::new(2), 21, 23).unwrap(),
            PageMapping::new(QuestionNumber::new(3), 24, 27).unwrap(),
        ],
    );

    let resolver = MappingResolver::new(Arc::new(source));
    let resolved = resolver
        .resolve(&exam(), QuestionRange::new(1, 3).unwrap())
        .await;
    assert!(resolved.is_authoritative());

    let viewer = Arc::new(RecordingViewer::default());
    let mut sync = NavigationSync::new(viewer.clone()).with_table(resolved.table);

    let outcome = sync.jump_to_question(QuestionNumber::new(2));
    let JumpOutcome::Jumped { page, .. } = outcome else {
        panic!("expected a jump");
    };
    assert_eq!(page, 21);

    // The viewer reports the page it landed on; the same question must be
    // identified as current.
    assert_eq!(sync.on_page_changed(page), Some(QuestionNumber::new(2)));
    assert_eq!(sync.current_question(), Some(QuestionNumber::new(2)));
}

#[tokio::test]
async fn repeated_page_reports_are_idempotent() {
    let resolver = MappingResolver::new(Arc::new(UnreachableAnalysis));
    let resolved = resolver
        .resolve(&exam(), QuestionRange::new(1, 10).unwrap())
        .await;

    let viewer = Arc::new(RecordingViewer::default());
    let mut sync = NavigationSync::new(viewer.clone()).with_table(resolved.table);

    let first = sync.on_page_changed(19);
    let second = sync.on_page_changed(19);
    assert_eq!(first, second);
    assert_eq!(sync.current_question(), first);
    // Highlighting never commands navigation.
    assert!(viewer.pages().is_empty());
}

#[tokio::test]
async fn reselecting_the_exam_swaps_the_table_last_writer_wins() {
    let viewer = Arc::new(RecordingViewer::default());
    let resolver = MappingResolver::new(Arc::new(UnreachableAnalysis))
        .with_fallback(FallbackLayout::new(10, 2.0).unwrap());

    let first = resolver
        .resolve(&exam(), QuestionRange::new(1, 5).unwrap())
        .await;
    let second = resolver
        .resolve(&ExamId::new("dp-300"), QuestionRange::new(1, 3).unwrap())
        .await;

    let mut sync = NavigationSync::new(viewer).with_table(first.table);
    sync.on_page_changed(10);
    assert_eq!(sync.current_question(), Some(QuestionNumber::new(1)));

    // The second resolution lands and overwrites; the stale highlight goes
    // with the old table.
    sync.set_table(second.table);
    assert_eq!(sync.current_question(), None);
    assert_eq!(sync.table().len(), 3);
}

#[tokio::test]
async fn fallback_is_deterministic_across_invocations() {
    let resolver = MappingResolver::new(Arc::new(UnreachableAnalysis));
    let range = QuestionRange::new(1, 50).unwrap();

    let a = resolver.resolve(&exam(), range).await;
    let b = resolver.resolve(&exam(), range).await;
    assert_eq!(a.table, b.table);
}
