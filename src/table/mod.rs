mod value;
mod table;
mod store;
mod loader;

pub use value::{Value, Coerced, ValueKey};
pub use table::{Table, Column};
pub use store::TableStore;
pub use loader::TableLoader;

pub const SUPPLIERS: &str = "suppliers";
pub const PARTS: &str = "parts";
pub const PURCHASE_ORDERS: &str = "purchase_orders";
pub const PO_LINES: &str = "po_lines";

/// Source tables of a procurement dataset, in load order.
pub const PROCUREMENT_TABLES: [&str; 4] = [SUPPLIERS, PARTS, PURCHASE_ORDERS, PO_LINES];
