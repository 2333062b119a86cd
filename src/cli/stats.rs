use super::AppContext;
use super::ui::{self, StyleType};
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(ctx: &AppContext, reset: bool) -> Result<()> {
    if reset {
        ctx.store().reset_stats().await;
        println!("Usage statistics reset.");
        return Ok(());
    }

    let stats = ctx.store().load_stats().await;
    println!("{}", ctx.style("Usage statistics", StyleType::Title));
    println!(
        "{} {}",
        ctx.style("Total conversions:", StyleType::Label),
        stats.conversions
    );
    println!(
        "{} {}",
        ctx.style("Favorite currency:", StyleType::Label),
        stats.most_used().unwrap_or("-")
    );

    if stats.currencies.is_empty() {
        return Ok(());
    }

    let mut counts: Vec<_> = stats.currencies.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("From", ctx.theme),
        ui::header_cell("Conversions", ctx.theme),
    ]);
    for (code, count) in counts {
        table.add_row(vec![Cell::new(code), ui::amount_cell(count.to_string())]);
    }
    println!("{table}");
    Ok(())
}
