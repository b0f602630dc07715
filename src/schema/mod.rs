pub mod fields;
pub mod record;

pub use fields::{Field, FieldSchema, SchemaError, SCHEMA_WIDTH, VEHICLE_SCHEMA};
pub use record::VehicleRecord;
