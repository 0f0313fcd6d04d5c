//! Main entry point for TokenlistCli

#![deny(warnings, missing_docs, trivial_casts, unused_qualifications)]
#![forbid(unsafe_code)]

use tokenlist_cli::application::APP;

/// Boot TokenlistCli
fn main() {
    abscissa_core::boot(&APP);
}
