//! Paginated plot listings.
//!
//! A listing table alternates detail rows with collapsed extra rows; only the
//! detail rows carry a plot link, in their sixth column. Below the table a
//! `.pagination` list holds one item per page plus a trailing "next" item.

use tracing::{debug, instrument, warn};

use super::CrawlError;
use crate::page::{self, Page, PageAccessor, PageError, dom};

/// Column of a detail row holding the plot link
const LINK_COLUMN: usize = 6;

/// Plot links on the listing page `page`, in row order.
///
/// Reads rows 1, 3, 5, … of the first table's body. Detail rows without a
/// link are skipped.
pub fn collect_page_links(page: &Page) -> Result<Vec<String>, CrawlError> {
    let table = page.find("table")?;
    let body = dom::nth_child(table, "tbody", 1).ok_or_else(|| PageError::not_found("table > tbody"))?;

    let mut links = Vec::new();
    for (index, row) in dom::children(body)
        .filter(|child| child.value().name() == "tr")
        .step_by(2)
        .enumerate()
    {
        let href = dom::nth_child(row, "td", LINK_COLUMN)
            .and_then(|cell| dom::descendant(cell, "a"))
            .and_then(|anchor| anchor.value().attr("href"));
        match href {
            Some(href) => links.push(page.resolve(href)?),
            None => warn!(
                "Detail row {} of {} has no plot link; its plot is left out",
                index + 1,
                page.url()
            ),
        }
    }
    Ok(links)
}

/// Number of pages announced by the pagination control. No control means one.
pub fn page_count(page: &Page) -> Result<usize, CrawlError> {
    let items = page.find_all(".pagination li")?;
    Ok(items.len().saturating_sub(1).max(1))
}

/// Target of the pagination control's "next" item
fn next_page_link(page: &Page) -> Result<String, CrawlError> {
    let items = page.find_all(".pagination li")?;
    let href = items
        .last()
        .and_then(|item| dom::descendant(*item, "a"))
        .and_then(|anchor| anchor.value().attr("href"))
        .ok_or_else(|| CrawlError::MissingLink {
            what: format!("pagination control of {}", page.url()),
        })?;
    Ok(page.resolve(href)?)
}

/// Plot links of every page of the listing the session currently shows.
///
/// The page count is read once from the first page; the session then follows
/// the "next" control until that many pages have been read. The first page is
/// read in place, never reloaded.
#[instrument(skip(session))]
pub async fn collect_all_links<P>(session: &mut P) -> Result<Vec<String>, CrawlError>
where
    P: PageAccessor + ?Sized,
{
    let mut current = page::snapshot(session).await?;
    let pages = page_count(&current)?;
    let mut links = collect_page_links(&current)?;
    debug!("Page 1 of {}: {} links", pages, links.len());

    for number in 2..=pages {
        let next = next_page_link(&current)?;
        current = page::open(session, &next).await?;
        let found = collect_page_links(&current)?;
        debug!("Page {} of {}: {} links", number, pages, found.len());
        links.extend(found);
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::plot_listing;
    use crate::page::StaticSession;

    const PAGE_1: &str = "http://portal.test/Portal/Plots?scheme=7";
    const PAGE_2: &str = "http://portal.test/Portal/Plots?scheme=7&page=2";
    const PAGE_3: &str = "http://portal.test/Portal/Plots?scheme=7&page=3";

    fn plots(range: std::ops::Range<usize>) -> Vec<String> {
        range
            .map(|n| format!("http://portal.test/Portal/Plot?id={n}"))
            .collect()
    }

    fn listing(links: &[String], pager: Option<(usize, &str)>) -> String {
        let hrefs: Vec<&str> = links.iter().map(String::as_str).collect();
        plot_listing(&hrefs, pager)
    }

    #[test]
    fn test_collect_page_links_skips_collapsed_rows() {
        let links = plots(0..3);
        let page = Page::parse(PAGE_1, &listing(&links, None)).unwrap();
        assert_eq!(collect_page_links(&page).unwrap(), links);
        assert_eq!(page_count(&page).unwrap(), 1);
    }

    #[test]
    fn test_collect_page_links_resolves_relative_hrefs() {
        let page = Page::parse(PAGE_1, &plot_listing(&["Plot?id=9"], None)).unwrap();
        assert_eq!(
            collect_page_links(&page).unwrap(),
            vec!["http://portal.test/Portal/Plot?id=9".to_string()]
        );
    }

    #[test]
    fn test_detail_row_without_link_is_left_out() {
        let links = plots(0..3);
        let markup = listing(&links, None).replace(
            "<span><a href=\"http://portal.test/Portal/Plot?id=1\">View</a></span>",
            "<span>Withdrawn</span>",
        );
        let page = Page::parse(PAGE_1, &markup).unwrap();
        assert_eq!(
            collect_page_links(&page).unwrap(),
            vec![links[0].clone(), links[2].clone()]
        );
    }

    #[test]
    fn test_listing_without_table() {
        let page = Page::parse(PAGE_1, "<html><body><p>No plots</p></body></html>").unwrap();
        assert!(matches!(
            collect_page_links(&page),
            Err(CrawlError::Page(PageError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_collect_all_links_walks_every_page() {
        let mut session = StaticSession::new()
            .with_page(PAGE_1, listing(&plots(0..4), Some((3, PAGE_2))))
            .with_page(PAGE_2, listing(&plots(4..8), Some((3, PAGE_3))))
            .with_page(PAGE_3, listing(&plots(8..10), Some((3, "#"))));
        session.navigate(PAGE_1).await.unwrap();

        let links = collect_all_links(&mut session).await.unwrap();
        assert_eq!(links, plots(0..10));
        assert_eq!(session.history(), [PAGE_1, PAGE_2, PAGE_3]);
    }

    #[tokio::test]
    async fn test_single_page_listing() {
        let mut session = StaticSession::new().with_page(PAGE_1, listing(&plots(0..2), None));
        session.navigate(PAGE_1).await.unwrap();

        let links = collect_all_links(&mut session).await.unwrap();
        assert_eq!(links, plots(0..2));
        assert_eq!(session.history(), [PAGE_1]);
    }

    #[tokio::test]
    async fn test_broken_next_link_fails() {
        let mut session = StaticSession::new()
            .with_page(PAGE_1, listing(&plots(0..4), Some((2, PAGE_2))));
        session.navigate(PAGE_1).await.unwrap();

        let err = collect_all_links(&mut session).await.unwrap_err();
        assert!(matches!(
            err,
            CrawlError::Page(PageError::HttpStatus { status: 404, .. })
        ));
    }
}
