/**
 * Angular Refactor CLI - ng-extract-component
 *
 * Extract a fragment of a component template into a new component
 */
use std::process;

use angular_refactor_cli::extract_component::{command, main_extract_component};

fn main() {
    let matches = command().get_matches();
    process::exit(main_extract_component(&matches));
}
