//! Console output utilities.

use console::style;

use crate::api::Collection;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     igsync                                            ║
║     Saved Instagram collections, mirrored locally     ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(username: &str, collections: &[String], storage_dir: &str) {
    let selection = if collections.is_empty() {
        "all".to_string()
    } else {
        collections.join(", ")
    };

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Account: {}", username);
    println!("  Collections: {}", selection);
    println!("  Directory: {}", storage_dir);
    println!();
}

/// Print the remote collections in listing order.
pub fn print_collection_list(collections: &[Collection]) {
    println!();
    println!(
        "{}",
        style(format!("{} collections:", collections.len())).bold()
    );
    for collection in collections {
        println!("  {}  {}", collection.name, style(&collection.id).dim());
    }
    println!();
}
