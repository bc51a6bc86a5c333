//! Portal page markup for tests

/// Field values rendered into a plot detail page
#[derive(Debug, Clone)]
pub struct PlotFixture {
    pub title: String,
    pub scheme: String,
    pub plot_no: String,
    pub developer_type: String,
    pub developer_name: String,
    pub area: String,
    pub usage_type: String,
    pub plot_type: String,
    pub bid_start: String,
    pub increment: String,
    pub reserve: String,
    pub emd: String,
    pub emd_start: String,
    pub emd_end: String,
    pub auction_start: String,
    pub auction_end: String,
    pub location_href: String,
}

impl Default for PlotFixture {
    fn default() -> Self {
        Self {
            title: "Plot 12 (Corner) Commercial".to_string(),
            scheme: "Vidhyadhar Nagar, Jaipur".to_string(),
            plot_no: "12".to_string(),
            developer_type: "JDA".to_string(),
            developer_name: "Jaipur Development Authority".to_string(),
            area: "100.5 Sq. Mtr.".to_string(),
            usage_type: "Residential".to_string(),
            plot_type: "Plot".to_string(),
            bid_start: "12,500".to_string(),
            increment: "500".to_string(),
            reserve: "12,56,250".to_string(),
            emd: "1,25,000".to_string(),
            emd_start: "01/03/2025".to_string(),
            emd_end: "15/03/2025".to_string(),
            auction_start: "16/03/2025".to_string(),
            auction_end: "20/03/2025".to_string(),
            location_href: "/Maps/Show?plot=12".to_string(),
        }
    }
}

fn row(cells: &[&str]) -> String {
    let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
    format!("<tr>{tds}</tr>")
}

fn section(heading: &str, rows: &[String]) -> String {
    format!(
        "<div class=\"panel\"><div class=\"panel-heading\"><h4>{heading}</h4></div>\n\
         <div class=\"panel-body\"><table class=\"table\"><tbody>{}</tbody></table></div></div>",
        rows.concat()
    )
}

/// A plot detail page laid out like the portal's
pub fn plot_page(plot: &PlotFixture) -> String {
    let auction = section(
        "Auction Details",
        &[row(&["Auction Title", ":", &plot.title, "", "", ""])],
    );
    let property = section(
        "Property Details",
        &[
            row(&["Scheme Name", ":", &plot.scheme, "", "", ""]),
            row(&["Zone", ":", "Zone 4", "Plot No", ":", &plot.plot_no]),
            row(&["Sector", ":", "-", "Developer Type", ":", &plot.developer_type]),
            row(&["Developer Name", ":", &plot.developer_name, "Area", ":", &plot.area]),
            row(&["Usage Type", ":", &plot.usage_type, "Plot Type", ":", &plot.plot_type]),
        ],
    );
    let location = format!("<a href=\"{}\" target=\"_blank\">View Map</a>", plot.location_href);
    let bid = section(
        "Bid/Auction Details",
        &[
            row(&["Auction Type", ":", "Open", "", "", ""]),
            row(&["Bid Start Price", ":", &plot.bid_start, "Minimum Increment", ":", &plot.increment]),
            row(&["Reserve Price", ":", &plot.reserve, "", "", ""]),
            row(&["EMD Start", ":", &plot.emd_start, "Auction Start", ":", &plot.auction_start]),
            row(&["EMD End", ":", &plot.emd_end, "Auction End", ":", &plot.auction_end]),
            row(&["Status", ":", "Live", "", "", ""]),
            row(&["Remarks", ":", "-", "", "", ""]),
            row(&["Location", ":", &location, "", "", ""]),
        ],
    );
    let fee = section(
        "Fee and EMD Details",
        &[row(&["EMD", ":", "Amount", &plot.emd, "", ""])],
    );

    format!("<html><body><div class=\"container\">{auction}{property}{bid}{fee}</div></body></html>")
}

/// Top-level authority listing: `(name, plot count, scheme listing href)`
pub fn authority_listing(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, &(name, count, href))| {
            let serial = (i + 1).to_string();
            let link = format!("<a href=\"{href}\">{count}</a>");
            row(&[serial.as_str(), name, link.as_str()])
        })
        .collect();
    format!("<html><body><table><tbody>{body}</tbody></table></body></html>")
}

/// Scheme listing with one row per scheme href plus a trailing totals row
pub fn scheme_listing(hrefs: &[&str]) -> String {
    let mut body: String = hrefs
        .iter()
        .enumerate()
        .map(|(i, href)| {
            let serial = (i + 1).to_string();
            let link = format!("<a href=\"{href}\">Scheme {serial}</a>");
            row(&[serial.as_str(), "Jaipur", link.as_str(), "4"])
        })
        .collect();
    body.push_str(&row(&["", "Total", "", "99"]));
    format!("<html><body><table><tbody>{body}</tbody></table></body></html>")
}

/// Plot listing page: each detail row is followed by a collapsed extra row.
/// `pager` is `(page count, next href)`.
pub fn plot_listing(hrefs: &[&str], pager: Option<(usize, &str)>) -> String {
    let body: String = hrefs
        .iter()
        .map(|href| {
            let link = format!("<span><a href=\"{href}\">View</a></span>");
            let detail = row(&["1", "Plot", "JDA", "Residential", "Live", &link]);
            let extra = "<tr class=\"collapse\"><td colspan=\"6\">details</td></tr>";
            format!("{detail}{extra}")
        })
        .collect();

    let pagination = match pager {
        Some((pages, next)) => {
            let items: String = (1..=pages)
                .map(|n| format!("<li><a href=\"?page={n}\">{n}</a></li>"))
                .collect();
            format!("<ul class=\"pagination\">{items}<li><a href=\"{next}\">&raquo;</a></li></ul>")
        }
        None => String::new(),
    };

    format!("<html><body><table><tbody>{body}</tbody></table>{pagination}</body></html>")
}
