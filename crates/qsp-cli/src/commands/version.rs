//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum state preparation and particle evolution",
        style("qsp").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsp-ir       Circuit intermediate representation");
    println!("  qsp-hal      Backend abstraction and results");
    println!("  qsp-prep     Grover–Rudolph and Kitaev–Webb preparation");
    println!("  qsp-evolve   Split-operator time evolution");
    println!("  qsp-cli      Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
