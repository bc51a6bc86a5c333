//! # Plot Page Field Extraction
//!
//! Reads the raw field values of one plot detail page. The page is split into
//! titled sections; each heading is followed by a table, and every field lives
//! at a fixed `(row, column)` of one of those tables (see [`crate::fields`]).
//!
//! A cell whose direct children include an anchor is read as the anchor's
//! resolved target, anything else as its rendered text. Callers never need to
//! know which fields are links.

mod error;

pub use error::ExtractError;

use std::time::Duration;

use scraper::ElementRef;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::fields::{CellLocator, FIELD_SPECS, Section, TITLE_CELL};
use crate::page::{self, Page, PageAccessor, dom};

/// Value of one table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Rendered text of the cell
    Text(String),
    /// Resolved target of the cell's anchor
    Link(String),
}

impl CellValue {
    /// The text or URL, whichever the cell held
    pub fn as_str(&self) -> &str {
        match self {
            CellValue::Text(s) | CellValue::Link(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Link(s) => s,
        }
    }
}

/// Raw values scraped from one plot page
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Auction title, used for derived flags only
    pub title: String,
    /// One value per entry of `FIELD_SPECS`, in the same order
    pub cells: Vec<CellValue>,
}

/// Bounds for the "page has rendered" wait
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Give up after this long
    pub timeout: Duration,
    /// Delay between re-reads of the page
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Locate the table body that follows the heading titled `heading`.
///
/// An exact heading match wins over a substring match, so "Auction Details"
/// never resolves to "Bid/Auction Details".
pub fn section_body<'a>(page: &'a Page, heading: &str) -> Result<ElementRef<'a>, ExtractError> {
    let not_found = || ExtractError::SectionNotFound {
        heading: heading.to_string(),
    };

    let headings = page.find_all("h4")?;
    let title = headings
        .iter()
        .find(|h| dom::text(**h) == heading)
        .or_else(|| headings.iter().find(|h| dom::text(**h).contains(heading)))
        .copied()
        .ok_or_else(not_found)?;

    let container = dom::parent_element(title).ok_or_else(not_found)?;
    let table = dom::next_element_sibling(container).ok_or_else(not_found)?;
    dom::descendant(table, "tbody").ok_or_else(not_found)
}

/// Read the cell at 1-based `(row, column)` of a section table body.
pub fn read_cell(
    page: &Page,
    body: ElementRef<'_>,
    row: usize,
    column: usize,
) -> Result<Option<CellValue>, ExtractError> {
    let Some(td) = dom::nth_child(body, "tr", row).and_then(|tr| dom::nth_child(tr, "td", column))
    else {
        return Ok(None);
    };

    let href = dom::children(td)
        .find(|child| child.value().name().eq_ignore_ascii_case("a"))
        .and_then(|anchor| anchor.value().attr("href"));

    match href {
        Some(href) => Ok(Some(CellValue::Link(page.resolve(href)?))),
        None => Ok(Some(CellValue::Text(dom::text(td)))),
    }
}

/// The four section tables of one plot page snapshot
pub struct PlotSections<'a> {
    page: &'a Page,
    auction: ElementRef<'a>,
    property: ElementRef<'a>,
    bid: ElementRef<'a>,
    fee_and_emd: ElementRef<'a>,
}

impl<'a> PlotSections<'a> {
    /// Locate every section of the page. Fails on the first missing one.
    pub fn locate(page: &'a Page) -> Result<Self, ExtractError> {
        Ok(Self {
            page,
            auction: section_body(page, Section::Auction.heading())?,
            property: section_body(page, Section::Property.heading())?,
            bid: section_body(page, Section::Bid.heading())?,
            fee_and_emd: section_body(page, Section::FeeAndEmd.heading())?,
        })
    }

    fn body(&self, section: Section) -> ElementRef<'a> {
        match section {
            Section::Auction => self.auction,
            Section::Property => self.property,
            Section::Bid => self.bid,
            Section::FeeAndEmd => self.fee_and_emd,
        }
    }

    /// Read one located cell
    pub fn read(&self, cell: CellLocator) -> Result<CellValue, ExtractError> {
        read_cell(self.page, self.body(cell.section), cell.row, cell.column)?.ok_or_else(|| {
            ExtractError::CellNotFound {
                cell: cell.to_string(),
            }
        })
    }

    /// Read the title and every field of `FIELD_SPECS`
    pub fn read_record(&self) -> Result<RawRecord, ExtractError> {
        let title = self.read(TITLE_CELL)?.into_string();
        let cells = FIELD_SPECS
            .iter()
            .map(|spec| self.read(spec.cell))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RawRecord { title, cells })
    }
}

/// Re-read the session's page until `cell` has non-empty text.
///
/// Missing sections or cells fail at once; only an empty cell is waited on.
/// Returns the snapshot in which the cell was filled.
pub async fn wait_for_text<P>(
    session: &mut P,
    cell: CellLocator,
    wait: WaitOptions,
) -> Result<Page, ExtractError>
where
    P: PageAccessor + ?Sized,
{
    let started = Instant::now();
    loop {
        let page = page::snapshot(session).await?;
        let filled = {
            let sections = PlotSections::locate(&page)?;
            !sections.read(cell)?.as_str().trim().is_empty()
        };
        if filled {
            return Ok(page);
        }

        let waited = started.elapsed();
        if waited >= wait.timeout {
            return Err(ExtractError::Timeout {
                what: cell.to_string(),
                waited,
            });
        }
        debug!("{} still empty, polling again", cell);
        drop(page);
        tokio::time::sleep(wait.poll_interval).await;
    }
}

/// Extract the raw record of the plot page the session currently shows.
#[instrument(skip(session))]
pub async fn extract_plot<P>(session: &mut P, wait: WaitOptions) -> Result<RawRecord, ExtractError>
where
    P: PageAccessor + ?Sized,
{
    let page = wait_for_text(session, TITLE_CELL, wait).await?;
    let sections = PlotSections::locate(&page)?;
    sections.read_record()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{PlotFixture, plot_page};
    use crate::page::StaticSession;

    const URL: &str = "http://portal.test/Portal/AuctionDetail?id=1";

    fn fast_wait() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(80),
            poll_interval: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_section_body_prefers_exact_heading() {
        let page = Page::parse(URL, &plot_page(&PlotFixture::default())).unwrap();
        let auction = section_body(&page, "Auction Details").unwrap();
        let value = read_cell(&page, auction, 1, 3).unwrap().unwrap();
        assert_eq!(value, CellValue::Text("Plot 12 (Corner) Commercial".to_string()));

        let bid = section_body(&page, "Bid/Auction Details").unwrap();
        let value = read_cell(&page, bid, 2, 3).unwrap().unwrap();
        assert_eq!(value.as_str(), "12,500");
    }

    #[test]
    fn test_section_not_found() {
        let page = Page::parse(URL, "<html><body><h4>Other</h4></body></html>").unwrap();
        match section_body(&page, "Property Details") {
            Err(ExtractError::SectionNotFound { heading }) => {
                assert_eq!(heading, "Property Details")
            }
            other => panic!("expected SectionNotFound, got {:?}", other.map(|b| b.html())),
        }
    }

    #[test]
    fn test_read_cell_resolves_links() {
        let page = Page::parse(URL, &plot_page(&PlotFixture::default())).unwrap();
        let bid = section_body(&page, "Bid/Auction Details").unwrap();
        let location = read_cell(&page, bid, 8, 3).unwrap().unwrap();
        assert_eq!(
            location,
            CellValue::Link("http://portal.test/Maps/Show?plot=12".to_string())
        );
        assert!(read_cell(&page, bid, 20, 3).unwrap().is_none());
        assert!(read_cell(&page, bid, 2, 9).unwrap().is_none());
    }

    #[test]
    fn test_read_record_order() {
        let page = Page::parse(URL, &plot_page(&PlotFixture::default())).unwrap();
        let record = PlotSections::locate(&page).unwrap().read_record().unwrap();
        assert_eq!(record.title, "Plot 12 (Corner) Commercial");
        assert_eq!(record.cells.len(), FIELD_SPECS.len());
        assert_eq!(record.cells[0].as_str(), "Vidhyadhar Nagar, Jaipur");
        assert_eq!(record.cells[4].as_str(), "100.5 Sq. Mtr.");
        assert_eq!(record.cells[10].as_str(), "1,25,000");
        assert!(matches!(record.cells[15], CellValue::Link(_)));
    }

    #[tokio::test]
    async fn test_wait_for_text_polls_until_rendered() {
        let empty = PlotFixture {
            title: String::new(),
            ..PlotFixture::default()
        };
        let mut session = StaticSession::new().with_renderings(
            URL,
            vec![plot_page(&empty), plot_page(&empty), plot_page(&PlotFixture::default())],
        );
        session.navigate(URL).await.unwrap();

        let record = extract_plot(&mut session, fast_wait()).await.unwrap();
        assert_eq!(record.title, "Plot 12 (Corner) Commercial");
    }

    #[tokio::test]
    async fn test_wait_for_text_times_out() {
        let empty = PlotFixture {
            title: "   ".to_string(),
            ..PlotFixture::default()
        };
        let mut session = StaticSession::new().with_page(URL, plot_page(&empty));
        session.navigate(URL).await.unwrap();

        let err = extract_plot(&mut session, fast_wait()).await.unwrap_err();
        assert!(matches!(err, ExtractError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_missing_section_fails_without_waiting() {
        let mut session = StaticSession::new().with_page(URL, "<html><body></body></html>");
        session.navigate(URL).await.unwrap();

        let wait = WaitOptions {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
        };
        let err = extract_plot(&mut session, wait).await.unwrap_err();
        assert!(matches!(err, ExtractError::SectionNotFound { .. }));
    }
}
