//! # Sell-by-Amount Demo
//!
//! Builds a one-line order and sells it by amount, printing the summary the
//! confirmation dialog would show.
//!
//! ## Usage
//! ```bash
//! # 1000 worth of peanuts at 500/g with 13% tax
//! cargo run -p sba-pos -- 1000
//!
//! # Custom product
//! cargo run -p sba-pos -- 2500 --name Cashews --price 900 --tax 1300
//!
//! # Scale in 10 g steps, cash rounding to 5
//! SBA_WEIGHT_STEP=10 SBA_CURRENCY_ROUNDING=5 cargo run -p sba-pos -- 1000
//! ```

use std::process::ExitCode;

use sba_pos::commands::{add_line, sell_by_amount};
use sba_pos::{init_tracing, OrderState, PosConfig};
use tracing::{error, info};

const USAGE: &str =
    "usage: sell-by-amount <amount> [--name <product>] [--price <list price>] [--tax <bps>]...";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct DemoArgs {
    amount: String,
    name: String,
    price: f64,
    tax_bps: Vec<u32>,
}

impl DemoArgs {
    fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut amount = None;
        let mut name = "Peanuts".to_string();
        let mut price = 500.0;
        let mut tax_bps = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--name" => name = args.next().ok_or("--name needs a value")?,
                "--price" => {
                    let raw = args.next().ok_or("--price needs a value")?;
                    price = raw
                        .parse()
                        .map_err(|_| format!("invalid price: {}", raw))?;
                }
                "--tax" => {
                    let raw = args.next().ok_or("--tax needs a value")?;
                    tax_bps.push(raw.parse().map_err(|_| format!("invalid tax: {}", raw))?);
                }
                flag if flag.starts_with("--") => return Err(format!("unknown flag: {}", flag)),
                value => {
                    if amount.is_some() {
                        return Err(format!("unexpected argument: {}", value));
                    }
                    amount = Some(value.to_string());
                }
            }
        }

        if tax_bps.is_empty() {
            tax_bps.push(1300);
        }

        Ok(DemoArgs {
            amount: amount.ok_or("missing amount")?,
            name,
            price,
            tax_bps,
        })
    }
}

fn run(args: &DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PosConfig::from_env();
    info!(?config, "Configuration loaded");

    let order = OrderState::new();
    add_line(&order, &config, &args.name, args.price, &args.tax_bps)?;

    match sell_by_amount(&order, &config, &args.amount)? {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => info!("Empty amount, nothing sold"),
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let args = match DemoArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Sell by amount failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<DemoArgs, String> {
        DemoArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["1000"]).unwrap();
        assert_eq!(
            args,
            DemoArgs {
                amount: "1000".to_string(),
                name: "Peanuts".to_string(),
                price: 500.0,
                tax_bps: vec![1300],
            }
        );
    }

    #[test]
    fn test_flags() {
        let args = parse(&["--price", "900", "2500", "--name", "Cashews", "--tax", "1000", "--tax", "200"])
            .unwrap();
        assert_eq!(args.amount, "2500");
        assert_eq!(args.name, "Cashews");
        assert_eq!(args.price, 900.0);
        assert_eq!(args.tax_bps, vec![1000, 200]);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["1000", "2000"]).is_err());
        assert!(parse(&["1000", "--price"]).is_err());
        assert!(parse(&["1000", "--price", "cheap"]).is_err());
        assert!(parse(&["1000", "--verbose"]).is_err());
    }
}
