//! Cursor pagination over any paginated endpoint.
//!
//! [`Paginator`] drives a blocking page fetch as an [`Iterator`];
//! [`AsyncPaginator`] drives an async page fetch as a [`Stream`]. Both walk
//! cursor-linked pages lazily, one page at a time, and share the same stopping
//! rules:
//!
//! - an absent or falsy cursor ends the walk after the current page, even
//!   when that page is empty; a present cursor is followed past empty pages
//! - `max_items` ends the walk as soon as that many items were yielded
//! - a fetch error is yielded once and ends the walk
//!
//! Cursor types are endpoint-specific (numeric offsets or opaque strings) and
//! are only ever handed back to the fetch function unchanged.

use std::collections::VecDeque;
use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::stream::{self, Stream, StreamExt, TryStreamExt};

/// Pagination parameters handed to the page fetch function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<C> {
    pub cursor: Option<C>,
    pub limit: Option<u32>,
}

impl<C> Default for PageRequest<C> {
    fn default() -> Self {
        Self {
            cursor: None,
            limit: None,
        }
    }
}

/// Continuation token of a paginated collection
pub trait PageCursor: Clone {
    /// Falsy cursors (empty string, zero offset) mark the last page
    fn is_exhausted(&self) -> bool;
}

impl PageCursor for String {
    fn is_exhausted(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! impl_numeric_cursor {
    ($($t:ty),*) => {
        $(
            impl PageCursor for $t {
                fn is_exhausted(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_numeric_cursor!(u32, u64, usize, i32, i64);

/// Paginated response carrying the cursor of the next page
pub trait CursorPage {
    type Cursor: PageCursor;

    /// Cursor of the next page, `None` on the last page
    fn next_cursor(&self) -> Option<Self::Cursor>;
}

enum Step<C, T> {
    Yield(T),
    Fetch(PageRequest<C>),
    Done,
}

/// Walk state shared by the blocking and async drivers
struct Walk<C, T> {
    cursor: Option<C>,
    buffer: VecDeque<T>,
    yielded: usize,
    max_items: Option<usize>,
    page_size: Option<u32>,
    fetched_any: bool,
    done: bool,
}

impl<C: PageCursor, T> Walk<C, T> {
    fn new() -> Self {
        Self {
            cursor: None,
            buffer: VecDeque::new(),
            yielded: 0,
            max_items: None,
            page_size: None,
            fetched_any: false,
            done: false,
        }
    }

    fn limit_reached(&self) -> bool {
        self.max_items.is_some_and(|max| self.yielded >= max)
    }

    fn next_step(&mut self) -> Step<C, T> {
        if self.done {
            return Step::Done;
        }
        // The first page is always fetched, even with `max_items == 0`.
        if self.fetched_any && self.limit_reached() {
            return self.finish();
        }
        if let Some(item) = self.buffer.pop_front() {
            self.yielded += 1;
            return Step::Yield(item);
        }
        if self.fetched_any && self.cursor.is_none() {
            return self.finish();
        }
        Step::Fetch(PageRequest {
            cursor: self.cursor.clone(),
            limit: self.page_size,
        })
    }

    fn accept_page(&mut self, cursor: Option<C>, items: Vec<T>) {
        self.fetched_any = true;
        self.cursor = cursor.filter(|c| !c.is_exhausted());
        self.buffer.extend(items);
    }

    fn finish(&mut self) -> Step<C, T> {
        self.done = true;
        self.buffer.clear();
        Step::Done
    }
}

type ItemsFn<'a, R, T> = Box<dyn Fn(R) -> Vec<T> + Send + 'a>;
type CursorFn<'a, R, C> = Box<dyn Fn(&R) -> Option<C> + Send + 'a>;

/// Lazy item iterator over a blocking page fetch
///
/// ```
/// use dflow_rs::pagination::{PageRequest, Paginator};
///
/// let pages = vec![(vec![1, 2], Some(2u64)), (vec![3], None)];
/// let items = Paginator::with_cursor(
///     |req: PageRequest<u64>| -> Result<_, ()> {
///         Ok(pages[req.cursor.map_or(0, |c| c as usize / 2)].clone())
///     },
///     |page: (Vec<i32>, Option<u64>)| page.0,
///     |page| page.1,
/// )
/// .collect_all()
/// .unwrap();
/// assert_eq!(items, vec![1, 2, 3]);
/// ```
pub struct Paginator<'a, R, T, C, E> {
    fetch: Box<dyn FnMut(PageRequest<C>) -> Result<R, E> + Send + 'a>,
    items: ItemsFn<'a, R, T>,
    cursor: CursorFn<'a, R, C>,
    walk: Walk<C, T>,
}

impl<'a, R, T, E> Paginator<'a, R, T, R::Cursor, E>
where
    R: CursorPage + 'a,
{
    /// Paginate a response type that knows its own next cursor
    pub fn new<F, I>(fetch: F, items: I) -> Self
    where
        F: FnMut(PageRequest<R::Cursor>) -> Result<R, E> + Send + 'a,
        I: Fn(R) -> Vec<T> + Send + 'a,
    {
        Self::with_cursor(fetch, items, R::next_cursor)
    }
}

impl<'a, R, T, C, E> Paginator<'a, R, T, C, E>
where
    C: PageCursor,
{
    /// Paginate with an explicit cursor extractor
    pub fn with_cursor<F, I, G>(fetch: F, items: I, cursor: G) -> Self
    where
        F: FnMut(PageRequest<C>) -> Result<R, E> + Send + 'a,
        I: Fn(R) -> Vec<T> + Send + 'a,
        G: Fn(&R) -> Option<C> + Send + 'a,
    {
        Self {
            fetch: Box::new(fetch),
            items: Box::new(items),
            cursor: Box::new(cursor),
            walk: Walk::new(),
        }
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.walk.max_items = Some(max_items);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.walk.page_size = Some(page_size);
        self
    }

    /// Resume from a cursor captured during an earlier walk
    pub fn starting_at(mut self, cursor: C) -> Self {
        self.walk.cursor = Some(cursor);
        self
    }

    pub fn collect_all(self) -> Result<Vec<T>, E> {
        self.collect()
    }

    /// Count items without retaining them
    pub fn count_all(self) -> Result<usize, E> {
        let mut count = 0;
        for item in self {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// First item matching `predicate`; no page after the matching one is fetched
    pub fn find_first<P>(self, mut predicate: P) -> Result<Option<T>, E>
    where
        P: FnMut(&T) -> bool,
    {
        for item in self {
            let item = item?;
            if predicate(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

impl<R, T, C, E> Iterator for Paginator<'_, R, T, C, E>
where
    C: PageCursor,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walk.next_step() {
                Step::Yield(item) => return Some(Ok(item)),
                Step::Done => return None,
                Step::Fetch(request) => match (self.fetch)(request) {
                    Ok(page) => {
                        let cursor = (self.cursor)(&page);
                        let items = (self.items)(page);
                        self.walk.accept_page(cursor, items);
                    }
                    Err(e) => {
                        self.walk.finish();
                        return Some(Err(e));
                    }
                },
            }
        }
    }
}

/// Lazy item stream over an async page fetch
///
/// The page fetch is the only suspension point; dropping the stream stops the walk.
pub struct AsyncPaginator<'a, R, T, C, E> {
    fetch: Box<dyn FnMut(PageRequest<C>) -> BoxFuture<'a, Result<R, E>> + Send + 'a>,
    items: ItemsFn<'a, R, T>,
    cursor: CursorFn<'a, R, C>,
    walk: Walk<C, T>,
}

impl<'a, R, T, E> AsyncPaginator<'a, R, T, R::Cursor, E>
where
    R: CursorPage + Send + 'a,
    R::Cursor: Send + 'a,
    T: Send + 'a,
    E: Send + 'a,
{
    pub fn new<F, Fut, I>(fetch: F, items: I) -> Self
    where
        F: FnMut(PageRequest<R::Cursor>) -> Fut + Send + 'a,
        Fut: Future<Output = Result<R, E>> + Send + 'a,
        I: Fn(R) -> Vec<T> + Send + 'a,
    {
        Self::with_cursor(fetch, items, R::next_cursor)
    }
}

impl<'a, R, T, C, E> AsyncPaginator<'a, R, T, C, E>
where
    R: Send + 'a,
    T: Send + 'a,
    C: PageCursor + Send + 'a,
    E: Send + 'a,
{
    pub fn with_cursor<F, Fut, I, G>(mut fetch: F, items: I, cursor: G) -> Self
    where
        F: FnMut(PageRequest<C>) -> Fut + Send + 'a,
        Fut: Future<Output = Result<R, E>> + Send + 'a,
        I: Fn(R) -> Vec<T> + Send + 'a,
        G: Fn(&R) -> Option<C> + Send + 'a,
    {
        Self {
            fetch: Box::new(move |request| Box::pin(fetch(request))),
            items: Box::new(items),
            cursor: Box::new(cursor),
            walk: Walk::new(),
        }
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.walk.max_items = Some(max_items);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.walk.page_size = Some(page_size);
        self
    }

    pub fn starting_at(mut self, cursor: C) -> Self {
        self.walk.cursor = Some(cursor);
        self
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<T, E>> + Send + 'a {
        stream::unfold(self, |mut pager| async move {
            loop {
                match pager.walk.next_step() {
                    Step::Yield(item) => return Some((Ok(item), pager)),
                    Step::Done => return None,
                    Step::Fetch(request) => match (pager.fetch)(request).await {
                        Ok(page) => {
                            let cursor = (pager.cursor)(&page);
                            let items = (pager.items)(page);
                            pager.walk.accept_page(cursor, items);
                        }
                        Err(e) => {
                            pager.walk.finish();
                            return Some((Err(e), pager));
                        }
                    },
                }
            }
        })
    }

    pub async fn collect_all(self) -> Result<Vec<T>, E> {
        self.into_stream().try_collect().await
    }

    pub async fn count_all(self) -> Result<usize, E> {
        self.into_stream()
            .try_fold(0usize, |count, _| async move { Ok::<usize, E>(count + 1) })
            .await
    }

    pub async fn find_first<P>(self, mut predicate: P) -> Result<Option<T>, E>
    where
        P: FnMut(&T) -> bool,
    {
        let stream = self.into_stream();
        futures_util::pin_mut!(stream);
        while let Some(item) = stream.next().await {
            let item = item?;
            if predicate(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}
