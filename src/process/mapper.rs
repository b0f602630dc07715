// src/process/mapper.rs

use crate::schema::{FieldSchema, VehicleRecord};

/// Project one kept row onto `schema`. Cells past the end of the row become `""`.
pub fn map_row<S: AsRef<str>>(schema: &FieldSchema, row: &[S], id: u32) -> VehicleRecord {
    let mut record = VehicleRecord {
        id,
        ..VehicleRecord::default()
    };
    for &(index, field) in schema.columns() {
        if let Some(cell) = row.get(index) {
            *record.slot_mut(field) = cell.as_ref().to_owned();
        }
    }
    record
}
