// src/schema/fields.rs

use std::collections::HashSet;

use once_cell::sync::Lazy;
use thiserror::Error;

/// Number of sheet columns (A..S) that carry vehicle data.
pub const SCHEMA_WIDTH: usize = 19;

/// One named column of the vehicle sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Product,
    Km,
    Vno,
    Rc,
    Year,
    Rate,
    Case,
    Expense,
    RcRate,
    MecExpense,
    FinalPrice,
    ExtrExpense,
    Remarks,
    EngNo,
    ChassNo,
    SoldPrice,
    Advance,
    Balance,
}

impl Field {
    /// Key used for this field on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Product => "product",
            Field::Km => "km",
            Field::Vno => "vno",
            Field::Rc => "rc",
            Field::Year => "year",
            Field::Rate => "rate",
            Field::Case => "case",
            Field::Expense => "expense",
            Field::RcRate => "rcRate",
            Field::MecExpense => "mecExpense",
            Field::FinalPrice => "finalPrice",
            Field::ExtrExpense => "extrExpense",
            Field::Remarks => "remarks",
            Field::EngNo => "engNo",
            Field::ChassNo => "chassNo",
            Field::SoldPrice => "soldPrice",
            Field::Advance => "advance",
            Field::Balance => "balance",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field schema has {actual} columns, expected {expected}")]
    Width { expected: usize, actual: usize },
    #[error("column {position} is mapped to index {index}")]
    OutOfOrder { position: usize, index: usize },
    #[error("field `{0}` is mapped more than once")]
    Duplicate(&'static str),
}

/// Ordered column index → field correspondence for one sheet layout.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    columns: Vec<(usize, Field)>,
}

impl FieldSchema {
    /// Build a schema from `(index, field)` pairs, rejecting anything that is not
    /// exactly `SCHEMA_WIDTH` dense, ordered, distinct columns.
    pub fn new(columns: Vec<(usize, Field)>) -> Result<Self, SchemaError> {
        let schema = Self { columns };
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.len() != SCHEMA_WIDTH {
            return Err(SchemaError::Width {
                expected: SCHEMA_WIDTH,
                actual: self.columns.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.columns.len());
        for (position, &(index, field)) in self.columns.iter().enumerate() {
            if index != position {
                return Err(SchemaError::OutOfOrder { position, index });
            }
            if !seen.insert(field.as_str()) {
                return Err(SchemaError::Duplicate(field.as_str()));
            }
        }
        Ok(())
    }

    pub fn columns(&self) -> &[(usize, Field)] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Column layout of the `Sheet1!A:S` vehicle sheet.
pub static VEHICLE_SCHEMA: Lazy<FieldSchema> = Lazy::new(|| FieldSchema {
    columns: vec![
        (0, Field::Name),
        (1, Field::Product),
        (2, Field::Km),
        (3, Field::Vno), // V.NO
        (4, Field::Rc),
        (5, Field::Year),
        (6, Field::Rate), // RATE=CHARGE
        (7, Field::Case),
        (8, Field::Expense),
        (9, Field::RcRate),
        (10, Field::MecExpense),
        (11, Field::FinalPrice),
        (12, Field::ExtrExpense),
        (13, Field::Remarks),
        (14, Field::EngNo),
        (15, Field::ChassNo),
        (16, Field::SoldPrice),
        (17, Field::Advance),
        (18, Field::Balance),
    ],
});
