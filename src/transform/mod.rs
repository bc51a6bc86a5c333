//! # Record Transformation
//!
//! Turns a [`RawRecord`] into a report row:
//!
//! 1. `parse_raw_values` coerces each scraped string per its [`Coercion`]
//! 2. `apply_calculated_fields` fills the derived columns
//! 3. `format_currency_fields` marks the price columns as rupee amounts
//! 4. `RecordBuilder::build` lays every value out in `HEADER` order
//!
//! Values are keyed by [`Field`] until the last step, so positions never
//! shift while a record is being assembled.

pub mod currency;
mod error;

pub use currency::{format_currency, format_inr};
pub use error::TransformError;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::extract::{CellValue, RawRecord};
use crate::fields::{
    CALCULATED_FIELDS, CalculatedFieldSpec, Coercion, FIELD_SPECS, Field, FieldSpec, HEADER, Rule,
};

/// Square-yard conversion applied to the area
pub const AREA_YARD_FACTOR: f64 = 1.196;

/// Literal written to the priority column
pub const DEFAULT_PRIORITY: &str = "Normal";

/// Leading number of a comma-stripped string, `parseFloat` style
static LEADING_NUMBER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\s*[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?"));

/// A typed report value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Written as scraped
    Text(String),
    /// Written in double quotes
    Quoted(String),
    /// Written in shortest decimal form
    Number(f64),
    /// Written as a quoted rupee amount
    Currency(f64),
    /// `true` / `false`
    Bool(bool),
    /// Row counter
    Int(u64),
}

impl Value {
    /// Numeric content, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) | Value::Currency(n) => Some(*n),
            _ => None,
        }
    }

    /// Render as one CSV cell
    pub fn render(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Quoted(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            Value::Number(n) => n.to_string(),
            Value::Currency(n) => format_currency(*n),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
        }
    }
}

/// Parse the leading number of `text` after dropping thousands separators.
///
/// `"1,25,000"` is 125000 and `"100.5 Sq. Mtr."` is 100.5; text without a
/// leading number gives `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let pattern = LEADING_NUMBER.as_ref().ok()?;
    let stripped = text.replace(',', "");
    let matched = pattern.find(&stripped)?;
    matched.as_str().trim().parse().ok()
}

/// Values of one record, keyed by column
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    values: BTreeMap<Field, Value>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any earlier value
    pub fn set(&mut self, field: Field, value: Value) -> &mut Self {
        self.values.insert(field, value);
        self
    }

    pub fn get(&self, field: Field) -> Option<&Value> {
        self.values.get(&field)
    }

    fn number(&self, field: Field) -> Result<f64, TransformError> {
        self.get(field)
            .ok_or(TransformError::MissingField(field))?
            .as_number()
            .ok_or(TransformError::NotNumeric(field))
    }

    /// Lay the values out in report order. Every column must be set.
    pub fn build(mut self) -> Result<FormattedRecord, TransformError> {
        let values = HEADER
            .iter()
            .map(|(field, _)| {
                self.values
                    .remove(field)
                    .ok_or(TransformError::MissingField(*field))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FormattedRecord { values })
    }
}

/// A complete record in report order
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedRecord {
    values: Vec<Value>,
}

impl FormattedRecord {
    pub fn get(&self, field: Field) -> &Value {
        &self.values[field.index()]
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Rendered CSV cells
    pub fn cells(&self) -> Vec<String> {
        self.values.iter().map(Value::render).collect()
    }
}

/// Coerce scraped cells into typed values according to `specs`.
///
/// Numeric and currency columns are parsed; quoted columns are wrapped;
/// everything else is kept verbatim.
pub fn parse_raw_values(
    specs: &[FieldSpec],
    cells: &[CellValue],
) -> Result<RecordBuilder, TransformError> {
    if specs.len() != cells.len() {
        return Err(TransformError::RecordLength {
            expected: specs.len(),
            found: cells.len(),
        });
    }

    let mut builder = RecordBuilder::new();
    for (spec, cell) in specs.iter().zip(cells) {
        let raw = cell.as_str();
        let value = match spec.coercion {
            Coercion::Raw => Value::Text(raw.to_string()),
            Coercion::Quoted => Value::Quoted(raw.to_string()),
            Coercion::Numeric | Coercion::Currency => {
                let number = parse_number(raw).ok_or_else(|| TransformError::Parse {
                    field: spec.field,
                    value: raw.to_string(),
                })?;
                Value::Number(number)
            }
        };
        builder.set(spec.field, value);
    }
    Ok(builder)
}

/// Inputs to the derived columns that do not come from the cells
#[derive(Debug, Clone, Copy)]
pub struct CalculationContext<'a> {
    /// Row counter value for this record
    pub sequence: u64,
    /// Auction title
    pub title: &'a str,
    /// URL of the plot page
    pub source_link: &'a str,
}

/// Fill every derived column named by `rules`.
pub fn apply_calculated_fields(
    builder: &mut RecordBuilder,
    context: &CalculationContext<'_>,
    rules: &[CalculatedFieldSpec],
) -> Result<(), TransformError> {
    let title = context.title.to_lowercase();
    for spec in rules {
        let value = match spec.rule {
            Rule::Sequence => Value::Int(context.sequence),
            Rule::AreaInYards => Value::Number(builder.number(Field::Area)? * AREA_YARD_FACTOR),
            Rule::TotalAmount => Value::Currency(
                builder.number(Field::Area)? * builder.number(Field::BidStartPrice)?,
            ),
            Rule::IsCorner => Value::Bool(title.contains("(corner)")),
            Rule::IsCommercial => Value::Bool(title.contains("commercial")),
            Rule::SourceLink => Value::Text(context.source_link.to_string()),
            Rule::Priority => Value::Text(DEFAULT_PRIORITY.to_string()),
        };
        builder.set(spec.field, value);
    }
    Ok(())
}

/// Columns rendered as rupees by [`format_currency_fields`]
pub fn currency_fields() -> impl Iterator<Item = Field> {
    FIELD_SPECS
        .iter()
        .filter(|spec| spec.coercion == Coercion::Currency)
        .map(|spec| spec.field)
}

/// Mark the numeric values of `fields` as rupee amounts.
///
/// Columns already formatted or holding text are left alone, so the pass can
/// run more than once.
pub fn format_currency_fields(builder: &mut RecordBuilder, fields: impl IntoIterator<Item = Field>) {
    for field in fields {
        if let Some(Value::Number(n)) = builder.get(field) {
            let amount = *n;
            builder.set(field, Value::Currency(amount));
        }
    }
}

/// Record transformer holding the report's row counter
#[derive(Debug)]
pub struct Transformer {
    next_sequence: u64,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    pub fn new() -> Self {
        Self { next_sequence: 1 }
    }

    /// Counter value the next successful record will carry
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Transform one scraped record. The counter only advances on success.
    pub fn transform(
        &mut self,
        raw: &RawRecord,
        source_link: &str,
    ) -> Result<FormattedRecord, TransformError> {
        let mut builder = parse_raw_values(&FIELD_SPECS, &raw.cells)?;
        let context = CalculationContext {
            sequence: self.next_sequence,
            title: &raw.title,
            source_link,
        };
        apply_calculated_fields(&mut builder, &context, &CALCULATED_FIELDS)?;
        format_currency_fields(&mut builder, currency_fields());

        let record = builder.build()?;
        debug!("Transformed record {} from {}", self.next_sequence, source_link);
        self.next_sequence += 1;
        Ok(record)
    }
}
