// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

use warehouse_tracker::demo;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "demo" {
        run_demo();
    } else {
        // UI mode (default)
        run_ui_mode()?;
    }

    Ok(())
}

fn run_demo() {
    let juice = demo::juice();
    let beer = demo::beer();

    println!("After creation:");
    println!("Juice storage: {}", juice);
    println!("Beer storage: {}", beer);

    println!("Beer getters:");
    println!("capacity = {}", beer.capacity());
    println!("balance = {}", beer.balance());
    println!("space left = {}", beer.available_space());
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    use warehouse_tracker::OverflowPolicy;

    println!("🖥️  Loading Warehouse Tracker UI...\n");

    let mut app = ui::App::new(demo::demo_inventory(OverflowPolicy::Clamp));
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin warehouse-server --features server");
    std::process::exit(1);
}
