// src/schema/record.rs

use serde::{Deserialize, Serialize};

use super::fields::Field;

/// One vehicle row of the inventory sheet.
///
/// All sheet-backed fields are kept as the raw cell text; a cell that is absent
/// in the sheet is an empty string, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub id: u32,
    pub name: String,
    pub product: String,
    pub km: String,
    pub vno: String,
    pub rc: String,
    pub year: String,
    pub rate: String,
    pub case: String,
    pub expense: String,
    pub rc_rate: String,
    pub mec_expense: String,
    pub final_price: String,
    pub extr_expense: String,
    pub remarks: String,
    pub eng_no: String,
    pub chass_no: String,
    pub sold_price: String,
    pub advance: String,
    pub balance: String,
}

impl VehicleRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Product => &self.product,
            Field::Km => &self.km,
            Field::Vno => &self.vno,
            Field::Rc => &self.rc,
            Field::Year => &self.year,
            Field::Rate => &self.rate,
            Field::Case => &self.case,
            Field::Expense => &self.expense,
            Field::RcRate => &self.rc_rate,
            Field::MecExpense => &self.mec_expense,
            Field::FinalPrice => &self.final_price,
            Field::ExtrExpense => &self.extr_expense,
            Field::Remarks => &self.remarks,
            Field::EngNo => &self.eng_no,
            Field::ChassNo => &self.chass_no,
            Field::SoldPrice => &self.sold_price,
            Field::Advance => &self.advance,
            Field::Balance => &self.balance,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Product => &mut self.product,
            Field::Km => &mut self.km,
            Field::Vno => &mut self.vno,
            Field::Rc => &mut self.rc,
            Field::Year => &mut self.year,
            Field::Rate => &mut self.rate,
            Field::Case => &mut self.case,
            Field::Expense => &mut self.expense,
            Field::RcRate => &mut self.rc_rate,
            Field::MecExpense => &mut self.mec_expense,
            Field::FinalPrice => &mut self.final_price,
            Field::ExtrExpense => &mut self.extr_expense,
            Field::Remarks => &mut self.remarks,
            Field::EngNo => &mut self.eng_no,
            Field::ChassNo => &mut self.chass_no,
            Field::SoldPrice => &mut self.sold_price,
            Field::Advance => &mut self.advance,
            Field::Balance => &mut self.balance,
        }
    }

    /// Both `vno` and `product` are filled in, so the record can be listed.
    pub fn is_listable(&self) -> bool {
        !self.vno.is_empty() && !self.product.is_empty()
    }
}
