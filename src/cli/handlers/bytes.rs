// src/cli/handlers/bytes.rs

use crate::{cli::args::BytesArgs, core::bytes::human_bytes};
use anyhow::Result;

/// Prints every value of `bytes` in human friendly units, one per line.
pub fn handle(args: BytesArgs) -> Result<()> {
    for value in args.values {
        println!("{}", human_bytes(value));
    }
    Ok(())
}
