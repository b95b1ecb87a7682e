pub mod bvalue;
pub mod encode;

pub use bvalue::BValue;   // re-export
pub use encode::{bvalue_to_json, encode_bvalue, encode_bvalue_into};   // re-export
