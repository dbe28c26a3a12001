//! Accumulating results across fixed-size upstream pages.

use std::future::Future;

/// Items gathered by [`fetch_up_to`]
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// At most `limit` items, in upstream order
    pub items: Vec<T>,
    /// Whether a follow-up request with a larger `skip` may return more
    pub has_more: bool,
}

/// Pagination bounds for [`fetch_up_to`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Number of items wanted
    pub limit: usize,
    /// Offset of the first upstream page
    pub skip: usize,
    /// Items per upstream page; the offset advances by this much per call
    pub page_size: usize,
    /// Safety bound: stop once the offset reaches `skip + hard_cap`
    pub hard_cap: usize,
}

/// Fetch pages starting at `window.skip` until `window.limit` items are
/// gathered or upstream runs dry.
///
/// Before each call the loop stops if enough items were gathered or the
/// offset reached `skip + hard_cap`. An empty page stops the loop; a short
/// page marks the source exhausted but its items are kept. The offset always
/// advances by `page_size`, whatever the page actually returned.
///
/// Errors from `fetch_page` are returned as-is; nothing is retried.
pub async fn fetch_up_to<T, E, F, Fut>(window: PageWindow, mut fetch_page: F) -> Result<Page<T>, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let PageWindow {
        limit,
        skip,
        page_size,
        hard_cap,
    } = window;

    let mut items: Vec<T> = Vec::new();
    let mut offset = skip;
    let mut exhausted = false;

    while items.len() < limit && !exhausted && offset < skip.saturating_add(hard_cap) {
        let page = fetch_page(offset).await?;
        tracing::debug!(offset, returned = page.len(), "Fetched page");

        if page.is_empty() {
            exhausted = true;
            break;
        }

        let short = page.len() < page_size;
        items.extend(page);
        offset = offset.saturating_add(page_size);

        if short {
            exhausted = true;
        }
    }

    let accumulated = items.len();
    items.truncate(limit);

    Ok(Page {
        items,
        has_more: !exhausted || accumulated > limit,
    })
}
