//! # Output Columns and Field Locators
//!
//! Fixed knowledge about the plot detail page and the report it feeds:
//!
//! - `Field`: internal key of every output column
//! - `HEADER`: column titles, in report order (the source of truth for order)
//! - `FIELD_SPECS`: where each scraped field lives on the detail page
//! - `CALCULATED_FIELDS`: columns derived rather than scraped
//!
//! Positions are 1-based `(row, column)` pairs inside a section's table body.

use std::fmt;

/// Key of one output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    No,
    SchemeName,
    PlotNo,
    DeveloperType,
    DeveloperName,
    Area,
    AreaYard,
    UsageType,
    PlotType,
    BidStartPrice,
    BidIncrement,
    ReservePrice,
    EmdAmount,
    TotalAmount,
    Corner,
    Commercial,
    EmdDepositStartDate,
    EmdDepositEndDate,
    AuctionStartDate,
    AuctionEndDate,
    Location,
    AuctionLink,
    Priority,
}

/// Report columns in output order
pub const HEADER: [(Field, &str); 23] = [
    (Field::No, "No"),
    (Field::SchemeName, "Scheme Name"),
    (Field::PlotNo, "Plot No"),
    (Field::DeveloperType, "Developer Type"),
    (Field::DeveloperName, "Developer Name"),
    (Field::Area, "Area (in sq. meter)"),
    (Field::AreaYard, "Area (in sq. yard)"),
    (Field::UsageType, "Usage Type"),
    (Field::PlotType, "Plot Type"),
    (Field::BidStartPrice, "Bid Start Price"),
    (Field::BidIncrement, "Minimum Increment"),
    (Field::ReservePrice, "Reserve Price"),
    (Field::EmdAmount, "EMD Amount"),
    (Field::TotalAmount, "Total Amount"),
    (Field::Corner, "Corner"),
    (Field::Commercial, "Commercial"),
    (Field::EmdDepositStartDate, "EMD Deposit Start Date"),
    (Field::EmdDepositEndDate, "EMD Deposit End Date"),
    (Field::AuctionStartDate, "Auction Start Date"),
    (Field::AuctionEndDate, "Auction End Date"),
    (Field::Location, "Map Location"),
    (Field::AuctionLink, "Auction Link"),
    (Field::Priority, "Priority"),
];

impl Field {
    /// Position of this column in the report
    pub fn index(self) -> usize {
        // HEADER lists every variant in declaration order.
        self as usize
    }

    /// Column title
    pub fn title(self) -> &'static str {
        HEADER[self.index()].1
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Column titles in report order
pub fn header_titles() -> impl Iterator<Item = &'static str> {
    HEADER.iter().map(|(_, title)| *title)
}

/// Titled sections of the plot detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Auction,
    Property,
    Bid,
    FeeAndEmd,
}

impl Section {
    /// Heading text shown above the section's table
    pub fn heading(self) -> &'static str {
        match self {
            Section::Auction => "Auction Details",
            Section::Property => "Property Details",
            Section::Bid => "Bid/Auction Details",
            Section::FeeAndEmd => "Fee and EMD Details",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// How a scraped string becomes a typed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Left as scraped
    Raw,
    /// Wrapped in quotes so embedded commas survive
    Quoted,
    /// Parsed as a number with thousands separators
    Numeric,
    /// Parsed as a number, rendered as rupees
    Currency,
}

/// A 1-based cell position inside a section's table body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocator {
    pub section: Section,
    pub row: usize,
    pub column: usize,
}

impl fmt::Display for CellLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}]", self.section, self.row, self.column)
    }
}

/// Location of one scraped field on the plot detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub cell: CellLocator,
    pub coercion: Coercion,
}

const fn spec(
    field: Field,
    section: Section,
    row: usize,
    column: usize,
    coercion: Coercion,
) -> FieldSpec {
    FieldSpec {
        field,
        cell: CellLocator {
            section,
            row,
            column,
        },
        coercion,
    }
}

/// Title cell of the auction section. Drives the corner/commercial flags and
/// doubles as the "page has rendered" probe.
pub const TITLE_CELL: CellLocator = CellLocator {
    section: Section::Auction,
    row: 1,
    column: 3,
};

/// Scraped fields, in raw-record order
pub const FIELD_SPECS: [FieldSpec; 16] = [
    spec(Field::SchemeName, Section::Property, 1, 3, Coercion::Quoted),
    spec(Field::PlotNo, Section::Property, 2, 6, Coercion::Quoted),
    spec(Field::DeveloperType, Section::Property, 3, 6, Coercion::Quoted),
    spec(Field::DeveloperName, Section::Property, 4, 3, Coercion::Quoted),
    spec(Field::Area, Section::Property, 4, 6, Coercion::Numeric),
    spec(Field::UsageType, Section::Property, 5, 3, Coercion::Raw),
    spec(Field::PlotType, Section::Property, 5, 6, Coercion::Raw),
    spec(Field::BidStartPrice, Section::Bid, 2, 3, Coercion::Currency),
    spec(Field::BidIncrement, Section::Bid, 2, 6, Coercion::Currency),
    spec(Field::ReservePrice, Section::Bid, 3, 3, Coercion::Currency),
    spec(Field::EmdAmount, Section::FeeAndEmd, 1, 4, Coercion::Currency),
    spec(Field::EmdDepositStartDate, Section::Bid, 4, 3, Coercion::Raw),
    spec(Field::EmdDepositEndDate, Section::Bid, 5, 3, Coercion::Raw),
    spec(Field::AuctionStartDate, Section::Bid, 4, 6, Coercion::Raw),
    spec(Field::AuctionEndDate, Section::Bid, 5, 6, Coercion::Raw),
    spec(Field::Location, Section::Bid, 8, 3, Coercion::Quoted),
];

/// Rule producing a derived column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Running row counter starting at 1
    Sequence,
    /// Area converted to square yards
    AreaInYards,
    /// Area times the per-square-metre bid start price, as rupees
    TotalAmount,
    /// Title mentions "(corner)"
    IsCorner,
    /// Title mentions "commercial"
    IsCommercial,
    /// URL of the plot page itself
    SourceLink,
    /// Constant priority tag
    Priority,
}

/// A derived column and the rule filling it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculatedFieldSpec {
    pub field: Field,
    pub rule: Rule,
}

impl CalculatedFieldSpec {
    /// Final report position of the derived value
    pub fn insert_index(&self) -> usize {
        self.field.index()
    }
}

/// Derived columns, in ascending report position
pub const CALCULATED_FIELDS: [CalculatedFieldSpec; 7] = [
    CalculatedFieldSpec { field: Field::No, rule: Rule::Sequence },
    CalculatedFieldSpec { field: Field::AreaYard, rule: Rule::AreaInYards },
    CalculatedFieldSpec { field: Field::TotalAmount, rule: Rule::TotalAmount },
    CalculatedFieldSpec { field: Field::Corner, rule: Rule::IsCorner },
    CalculatedFieldSpec { field: Field::Commercial, rule: Rule::IsCommercial },
    CalculatedFieldSpec { field: Field::AuctionLink, rule: Rule::SourceLink },
    CalculatedFieldSpec { field: Field::Priority, rule: Rule::Priority },
];
