//! Shared test records and logger setup.

#![allow(dead_code, non_snake_case)]

use chrono::NaiveDateTime;
use mooring::Record;
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Customer {
    pub id_Customer: i32,
    pub Name: String,
    pub Born: Option<NaiveDateTime>,
    pub Balance: Decimal,
    pub Active: bool,
    pub Model_Dirty: bool,
    pub Cargo_Notes: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Invoice {
    pub InvoiceID: i64,
    pub Orders_id: i32,
    pub Total: Decimal,
    pub ref_Orders_CustomerName: Option<String>,
}

/// Every supported attribute type, for round trips
#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Sample {
    pub id_Sample: i64,
    pub Text: String,
    pub Letter: char,
    pub Tiny: i8,
    pub Small: i16,
    pub Regular: i32,
    pub Big: i64,
    pub UTiny: u8,
    pub USmall: u16,
    pub URegular: u32,
    pub UBig: u64,
    pub Money: Decimal,
    pub Ratio: f64,
    pub Weight: f32,
    pub Flag: bool,
    pub Stamp: NaiveDateTime,
    pub Blob: Vec<u8>,
    pub Token: Uuid,
    pub Maybe: Option<i32>,
    pub MaybeText: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
#[table_name = "tblSettings"]
#[primary_key_name = "SettingKey"]
#[primary_key_not_identity]
pub struct Setting {
    pub SettingKey: String,
    pub Payload: String,
}
