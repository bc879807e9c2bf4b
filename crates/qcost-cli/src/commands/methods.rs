//! Methods command implementation.

use console::style;
use qcost_models::Method;
use qcost_models::method::DEPRECATED;

/// Execute the methods command.
pub fn execute() {
    println!("{}", style("Available methods:").bold());
    for method in Method::ALL {
        let mut notes = Vec::new();
        if method.requires_integrals() {
            notes.push("needs integrals");
        }
        if method.uses_plane_waves() {
            notes.push("plane waves");
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        };
        println!(
            "  {:<30} {}{}",
            style(method.as_str()).cyan(),
            method.description(),
            style(notes).dim()
        );
    }
    println!();
    for name in DEPRECATED {
        println!("  {:<30} {}", style(name).dim(), style("deprecated").yellow());
    }
}
