use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dflow_rs::pagination::{AsyncPaginator, CursorPage, PageRequest, Paginator};
use futures_util::StreamExt;

#[derive(Debug, Clone)]
struct Page {
    items: Vec<u32>,
    cursor: Option<String>,
}

impl CursorPage for Page {
    type Cursor = String;

    fn next_cursor(&self) -> Option<String> {
        self.cursor.clone()
    }
}

/// Pages linked as "c1", "c2", ...; the first page has no cursor
fn pages(layout: &[(&[u32], Option<&str>)]) -> Arc<Vec<Page>> {
    Arc::new(
        layout.iter()
            .map(|(items, cursor)| Page {
                items: items.to_vec(),
                cursor: cursor.map(String::from),
            })
            .collect(),
    )
}

fn page_index(request: &PageRequest<String>) -> usize {
    request
        .cursor
        .as_deref()
        .and_then(|c| c.trim_start_matches('c').parse().ok())
        .unwrap_or(0)
}

fn blocking(
    book: Arc<Vec<Page>>,
    fetches: Arc<AtomicUsize>,
) -> Paginator<'static, Page, u32, String, String> {
    Paginator::new(
        move |request: PageRequest<String>| {
            fetches.fetch_add(1, Ordering::SeqCst);
            book.get(page_index(&request))
                .cloned()
                .ok_or_else(|| format!("no page for {:?}", request.cursor))
        },
        |page: Page| page.items,
    )
}

fn streaming(
    book: Arc<Vec<Page>>,
    fetches: Arc<AtomicUsize>,
) -> AsyncPaginator<'static, Page, u32, String, String> {
    AsyncPaginator::new(
        move |request: PageRequest<String>| {
            fetches.fetch_add(1, Ordering::SeqCst);
            let page = book
                .get(page_index(&request))
                .cloned()
                .ok_or_else(|| format!("no page for {:?}", request.cursor));
            async move {
                tokio::task::yield_now().await;
                page
            }
        },
        |page: Page| page.items,
    )
}

#[test]
fn collect_all_concatenates_pages_in_order() {
    let book = pages(&[
        (&[1, 2, 3], Some("c1")),
        (&[4, 5, 6], Some("c2")),
        (&[7, 8, 9], None),
    ]);
    let fetches = Arc::new(AtomicUsize::new(0));
    let items = blocking(book, fetches.clone()).collect_all().unwrap();
    assert_eq!(items, (1..=9).collect::<Vec<_>>());
    assert_eq!(fetches.load(Ordering::SeqCst), 3);
}

#[test]
fn max_items_stops_mid_page_without_further_fetches() {
    let book = pages(&[(&[1, 2, 3], Some("c1")), (&[4, 5, 6], None)]);
    let fetches = Arc::new(AtomicUsize::new(0));
    let items = blocking(book, fetches.clone())
        .max_items(5)
        .collect_all()
        .unwrap();
    assert_eq!(items, vec![1, 2, 3, 4, 5]);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[test]
fn empty_source_yields_nothing() {
    let book = pages(&[(&[], None)]);
    let fetches = Arc::new(AtomicUsize::new(0));
    assert!(blocking(book.clone(), fetches.clone())
        .collect_all()
        .unwrap()
        .is_empty());
    assert_eq!(blocking(book, fetches.clone()).count_all().unwrap(), 0);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[test]
fn find_first_does_not_fetch_past_the_match() {
    let book = pages(&[
        (&[1, 2], Some("c1")),
        (&[3, 4], Some("c2")),
        (&[5, 6], None),
    ]);
    let fetches = Arc::new(AtomicUsize::new(0));
    let found = blocking(book.clone(), fetches.clone())
        .find_first(|x| *x == 4)
        .unwrap();
    assert_eq!(found, Some(4));
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    let missing = blocking(book, Arc::new(AtomicUsize::new(0)))
        .find_first(|x| *x == 42)
        .unwrap();
    assert_eq!(missing, None);
}

#[test]
fn falsy_cursor_ends_after_the_page() {
    let book = pages(&[(&[1, 2], Some("")), (&[3], None)]);
    let fetches = Arc::new(AtomicUsize::new(0));
    assert_eq!(blocking(book, fetches.clone()).count_all().unwrap(), 2);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn fetch_error_is_yielded_once() {
    // Cursor "c7" points at a page that does not exist.
    let book = pages(&[(&[1], Some("c7"))]);
    let results: Vec<Result<u32, String>> =
        blocking(book, Arc::new(AtomicUsize::new(0))).collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], Ok(1));
    assert!(results[1].is_err());
}

#[tokio::test]
async fn async_walk_matches_blocking_walk() {
    let book = pages(&[
        (&[1, 2, 3], Some("c1")),
        (&[4, 5, 6], Some("c2")),
        (&[7, 8, 9], None),
    ]);
    let fetches = Arc::new(AtomicUsize::new(0));
    let items = streaming(book.clone(), fetches.clone())
        .collect_all()
        .await
        .unwrap();
    assert_eq!(items, (1..=9).collect::<Vec<_>>());

    let bounded = streaming(book.clone(), Arc::new(AtomicUsize::new(0)))
        .max_items(5)
        .collect_all()
        .await
        .unwrap();
    assert_eq!(bounded, vec![1, 2, 3, 4, 5]);

    let count = streaming(book, Arc::new(AtomicUsize::new(0)))
        .count_all()
        .await
        .unwrap();
    assert_eq!(count, 9);
}

#[tokio::test]
async fn dropping_the_stream_stops_fetching() {
    let book = pages(&[
        (&[1, 2], Some("c1")),
        (&[3, 4], Some("c2")),
        (&[5, 6], None),
    ]);
    let fetches = Arc::new(AtomicUsize::new(0));
    let first_two: Vec<_> = streaming(book, fetches.clone())
        .into_stream()
        .take(2)
        .collect()
        .await;
    assert_eq!(first_two, vec![Ok(1), Ok(2)]);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn page_size_is_forwarded_as_limit() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let record = seen.clone();
    let book = pages(&[(&[1], Some("c1")), (&[2], None)]);
    let items = AsyncPaginator::new(
        move |request: PageRequest<String>| {
            record.lock().unwrap().push(request.clone());
            let page = book[page_index(&request)].clone();
            async move { Ok::<_, String>(page) }
        },
        |page: Page| page.items,
    )
    .page_size(25)
    .collect_all()
    .await
    .unwrap();

    assert_eq!(items, vec![1, 2]);
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].cursor, None);
    assert_eq!(seen[1].cursor.as_deref(), Some("c1"));
    assert!(seen.iter().all(|r| r.limit == Some(25)));
}
