//! # Commands Module
//!
//! Everything a frontend can ask the POS host to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs             ◄─── You are here (exports)
//! ├── order.rs           ◄─── get_order, add_line, select_line
//! └── sell_by_amount.rs  ◄─── sell_by_amount
//! ```
//!
//! Each command takes only the state it needs and returns
//! `Result<T, ApiError>` with a serializable `T`.

pub mod order;
pub mod sell_by_amount;

pub use order::{add_line, get_order, select_line, LineDto, OrderResponse};
pub use sell_by_amount::{parse_amount, sell_by_amount, SaleSummary};
