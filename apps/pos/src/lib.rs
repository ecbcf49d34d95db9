//! # sba-pos: Point-of-Sale Host
//!
//! The order-line editor side of sell-by-amount. It owns the order, the store
//! configuration and logging, and hands the arithmetic to `sba-core` through
//! the `OrderLineHost` trait.
//!
//! ## Module Organization
//! ```text
//! sba_pos/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── main.rs         ◄─── Demo binary
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── order.rs    ◄─── Order, lines, LineEditor (OrderLineHost)
//! │   └── config.rs   ◄─── PosConfig (env + defaults)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── order.rs    ◄─── get_order, add_line, select_line
//! │   └── sell_by_amount.rs
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ErrorCode};
pub use state::{OrderState, PosConfig};

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,sba_core=debug,sba_pos=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=sba_core=trace` - Trace the solver only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
