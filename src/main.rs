//! css2android binary

use css2android::{Cli, ConvertError};
use std::process;

fn main() {
    let mut cli = Cli::new();

    match cli.run() {
        Ok(()) => {}
        Err(ConvertError::FileNotFound { path }) => {
            eprintln!("{}", path);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Conversion failed: {}", e);
            process::exit(1);
        }
    }
}
