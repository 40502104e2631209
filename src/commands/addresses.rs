//! `convoy addresses` — render the participant address list from a keys
//! file.
//!
//! The same transformation `convoy deploy` performs between key generation
//! and `deploy build`, exposed standalone so the literal can be inspected
//! or wired into other tooling.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::keys;
use crate::output::json;
use crate::participants::AddressList;

/// Arguments for the addresses command.
#[derive(Args, Default)]
pub struct AddressesArgs {
    /// Keys file to read
    #[arg(long, default_value = "keys.json")]
    pub keys_file: PathBuf,
}

/// Run `convoy addresses`.
///
/// Prints the bracketed literal (`["0x...", "0x..."]`); with `--json`,
/// prints the addresses as a plain JSON array instead. An empty keys file
/// prints `[]` and exits 0; a missing or malformed file exits non-zero.
///
/// # Errors
///
/// Returns an error if the keys file cannot be read or parsed.
pub fn run(args: &AddressesArgs, json_output: bool) -> Result<()> {
    let records = match keys::load_keys(&args.keys_file) {
        Ok(records) => records,
        Err(e) => {
            if json_output {
                println!("{}", json::format_error(&e.to_string(), "keys_error")?);
            }
            return Err(e.into());
        }
    };
    let addresses = AddressList::from_keys(&records);
    if json_output {
        println!("{}", serde_json::to_string(addresses.addresses())?);
    } else {
        println!("{}", addresses.render());
    }
    Ok(())
}
