//! # State Module
//!
//! State the POS host keeps between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────┐      │
//! │  │       OrderState         │        │        PosConfig         │      │
//! │  │                          │        │                          │      │
//! │  │  Arc<Mutex<Order>>       │        │  weight_step             │      │
//! │  │  lines, selected line    │        │  currency_rounding       │      │
//! │  └──────────────────────────┘        └──────────────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • OrderState: Protected by Arc<Mutex<T>> for exclusive access         │
//! │  • PosConfig: Read-only after initialization                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod order;

pub use config::{
    ConfigError, PosConfig, ENV_CURRENCY_CODE, ENV_CURRENCY_ROUNDING, ENV_PRICE_DECIMALS,
    ENV_WEIGHT_STEP,
};
pub use order::{LineEditor, Order, OrderLine, OrderState};
