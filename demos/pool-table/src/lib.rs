use wasm_bindgen::prelude::*;

pub mod config;
pub mod draw;
pub mod layout;
pub mod ledger;
pub mod physics;
pub mod table;

pub use table::PoolTable;

widgets_web::export_widget!(PoolTable, "pool-table");
