//! # Authority → Scheme → Plot Crawl
//!
//! Discovers every plot detail URL published for one authority:
//!
//! 1. `find_authority`: the authority's row in the entry listing, its scheme
//!    listing link and the advertised plot total
//! 2. `scheme_links`: one link per scheme row, read by a bounded worker pool
//! 3. `plot_links`: every paginated plot listing, concatenated in scheme order
//!
//! Each phase navigates the one shared session; only the row parsing of phase
//! 2 runs concurrently, on markup already copied out of the page.

mod error;
pub mod pagination;

pub use error::CrawlError;
pub use pagination::{collect_all_links, collect_page_links};

use std::sync::Arc;

use futures::future;
use scraper::Html;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument};
use url::Url;

use crate::page::{self, PageAccessor, PageError, dom};

/// Column of a scheme row holding the scheme's plot listing link
const SCHEME_LINK_COLUMN: usize = 3;

/// The authority's row in the entry listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityRow {
    /// Authority name as listed
    pub name: String,
    /// Scheme listing URL
    pub link: String,
    /// Plot total shown on the count link, if it reads as a number
    pub plot_count: Option<u32>,
}

/// Locate `name` in the entry listing and follow nothing yet.
///
/// The authority cell is matched on its full text; the count link sits in the
/// next cell of the same row.
#[instrument(skip(session))]
pub async fn find_authority<P>(
    session: &mut P,
    entry_url: &str,
    name: &str,
) -> Result<AuthorityRow, CrawlError>
where
    P: PageAccessor + ?Sized,
{
    let listing = page::open(session, entry_url).await?;
    let cell = listing
        .find_all("td")?
        .into_iter()
        .find(|td| dom::text(*td) == name)
        .ok_or_else(|| CrawlError::AuthorityNotFound {
            name: name.to_string(),
        })?;

    let anchor = dom::next_element_sibling(cell)
        .and_then(|count_cell| dom::descendant(count_cell, "a"))
        .ok_or_else(|| CrawlError::MissingLink {
            what: format!("authority row `{}`", name),
        })?;
    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| CrawlError::MissingLink {
            what: format!("count cell of `{}`", name),
        })?;

    let row = AuthorityRow {
        name: name.to_string(),
        link: listing.resolve(href)?,
        plot_count: dom::text(anchor).replace(',', "").parse().ok(),
    };

    info!(
        "Step 1 completed: {} lists {} plots",
        row.name,
        row.plot_count.map_or_else(|| "an unknown number of".to_string(), |n| n.to_string())
    );
    Ok(row)
}

/// Link of one scheme row, given the row's markup.
fn scheme_link_from_row(row: &str, base: &Url) -> Result<String, CrawlError> {
    let fragment = Html::parse_fragment(&format!("<table><tbody>{row}</tbody></table>"));
    let missing = || CrawlError::MissingLink {
        what: "scheme row".to_string(),
    };

    let tr = fragment
        .root_element()
        .descendants()
        .filter_map(scraper::ElementRef::wrap)
        .find(|element| element.value().name() == "tr")
        .ok_or_else(missing)?;
    let href = dom::nth_child(tr, "td", SCHEME_LINK_COLUMN)
        .and_then(|cell| dom::descendant(cell, "a"))
        .and_then(|anchor| anchor.value().attr("href"))
        .ok_or_else(missing)?;

    Ok(base.join(href.trim()).map_err(PageError::from)?.to_string())
}

/// Open the scheme listing at `listing_url` and read one link per scheme.
///
/// The listing's last row is a totals row and is ignored. Rows are parsed by
/// at most `concurrency` workers; links come back in row order.
#[instrument(skip(session))]
pub async fn scheme_links<P>(
    session: &mut P,
    listing_url: &str,
    concurrency: usize,
) -> Result<Vec<String>, CrawlError>
where
    P: PageAccessor + ?Sized,
{
    let (base, rows) = {
        let listing = page::open(session, listing_url).await?;
        let table = listing.find("table")?;
        let body = dom::descendant(table, "tbody").ok_or_else(|| PageError::not_found("table tbody"))?;
        let mut rows: Vec<String> = dom::children(body)
            .filter(|child| child.value().name() == "tr")
            .map(|tr| tr.html())
            .collect();
        rows.pop();
        (listing.url().clone(), rows)
    };
    debug!("Reading {} scheme rows with {} workers", rows.len(), concurrency);

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let base = Arc::new(base);

    let tasks = rows
        .into_iter()
        .map(|row| {
            let permit = semaphore.clone().acquire_owned();
            let base = base.clone();
            tokio::spawn(async move {
                let _permit = permit
                    .await
                    .map_err(|e| CrawlError::Semaphore(e.to_string()))?;
                scheme_link_from_row(&row, &base)
            })
        })
        .collect::<Vec<_>>();

    let results = future::join_all(tasks).await;

    let mut links = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(Ok(link)) => links.push(link),
            Ok(Err(e)) => return Err(e),
            Err(e) => return Err(CrawlError::Task(format!("Task failed: {}", e))),
        }
    }

    info!("Step 2 completed: {} schemes", links.len());
    Ok(links)
}

/// Every plot link of every scheme, in scheme order then page order.
#[instrument(skip(session, scheme_links), fields(schemes = scheme_links.len()))]
pub async fn plot_links<P>(session: &mut P, scheme_links: &[String]) -> Result<Vec<String>, CrawlError>
where
    P: PageAccessor + ?Sized,
{
    let mut links = Vec::new();
    for scheme in scheme_links {
        session.navigate(scheme).await?;
        let found = collect_all_links(session).await?;
        debug!("{} plots in {}", found.len(), scheme);
        links.extend(found);
    }

    info!("Step 3 completed: {} plot links", links.len());
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{authority_listing, plot_listing, scheme_listing};
    use crate::page::StaticSession;

    const ENTRY: &str = "http://portal.test/Portal/AuctionListNew";
    const SCHEMES: &str = "http://portal.test/Portal/Schemes?authority=1";

    fn entry_page() -> String {
        authority_listing(&[
            ("Ajmer Development Authority", "12", "/Portal/Schemes?authority=2"),
            ("Jaipur Development Authority", "1,234", "/Portal/Schemes?authority=1"),
        ])
    }

    #[tokio::test]
    async fn test_find_authority() {
        let mut session = StaticSession::new().with_page(ENTRY, entry_page());
        let row = find_authority(&mut session, ENTRY, "Jaipur Development Authority")
            .await
            .unwrap();
        assert_eq!(row.link, SCHEMES);
        assert_eq!(row.plot_count, Some(1234));
    }

    #[tokio::test]
    async fn test_find_authority_requires_exact_name() {
        let mut session = StaticSession::new().with_page(ENTRY, entry_page());
        let err = find_authority(&mut session, ENTRY, "Jaipur")
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::AuthorityNotFound { ref name } if name == "Jaipur"));
    }

    #[tokio::test]
    async fn test_scheme_links_drop_totals_row() {
        let hrefs = ["/Portal/Plots?scheme=1", "/Portal/Plots?scheme=2", "Plots?scheme=3"];
        let mut session = StaticSession::new().with_page(SCHEMES, scheme_listing(&hrefs));

        let links = scheme_links(&mut session, SCHEMES, 2).await.unwrap();
        assert_eq!(
            links,
            vec![
                "http://portal.test/Portal/Plots?scheme=1",
                "http://portal.test/Portal/Plots?scheme=2",
                "http://portal.test/Portal/Plots?scheme=3",
            ]
        );
    }

    #[tokio::test]
    async fn test_scheme_links_zero_concurrency_still_progresses() {
        let mut session =
            StaticSession::new().with_page(SCHEMES, scheme_listing(&["/Portal/Plots?scheme=1"]));
        let links = scheme_links(&mut session, SCHEMES, 0).await.unwrap();
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_scheme_row_without_link() {
        let base = Url::parse(SCHEMES).unwrap();
        let err = scheme_link_from_row("<tr><td>1</td><td>x</td><td>none</td></tr>", &base)
            .unwrap_err();
        assert!(matches!(err, CrawlError::MissingLink { .. }));
    }

    #[tokio::test]
    async fn test_plot_links_concatenate_in_scheme_order() {
        let scheme_a = "http://portal.test/Portal/Plots?scheme=1";
        let scheme_b = "http://portal.test/Portal/Plots?scheme=2";
        let mut session = StaticSession::new()
            .with_page(scheme_a, plot_listing(&["/p/1", "/p/2"], None))
            .with_page(scheme_b, plot_listing(&["/p/3"], None));

        let links = plot_links(&mut session, &[scheme_a.to_string(), scheme_b.to_string()])
            .await
            .unwrap();
        assert_eq!(
            links,
            vec![
                "http://portal.test/p/1",
                "http://portal.test/p/2",
                "http://portal.test/p/3",
            ]
        );
    }
}
