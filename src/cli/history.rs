use super::AppContext;
use super::convert;
use super::ui::{self, StyleType};
use crate::core::ConversionRequest;
use crate::core::format::{format_money, format_number};
use anyhow::{Result, bail};
use chrono::Local;
use comfy_table::Cell;

pub async fn run(ctx: &AppContext, clear: bool, replay: Option<usize>) -> Result<()> {
    if clear {
        ctx.store().clear_history().await;
        println!("History cleared.");
        return Ok(());
    }

    let history = ctx.store().load_history().await;

    if let Some(index) = replay {
        let Some(entry) = index.checked_sub(1).and_then(|i| history.get(i)) else {
            bail!("No history entry #{index}");
        };
        let request = ConversionRequest::new(entry.amount, entry.from.clone(), entry.to.clone())
            .map_err(convert::report)?;
        return convert::perform(ctx, &request, false).await;
    }

    if history.is_empty() {
        println!("{}", ctx.style("No conversions yet", StyleType::Subtle));
        return Ok(());
    }

    println!("{}", ctx.style("Recent conversions", StyleType::Title));
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#", ctx.theme),
        ui::header_cell("Conversion", ctx.theme),
        ui::header_cell("Rate", ctx.theme),
        ui::header_cell("Date", ctx.theme),
    ]);

    for (i, entry) in history.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!(
                "{} → {}",
                format_money(entry.amount, &entry.from, &ctx.locale),
                format_money(entry.result, &entry.to, &ctx.locale)
            )),
            ui::amount_cell(format_number(entry.rate, &ctx.locale)),
            Cell::new(entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        ctx.style("Replay an entry with: cconv history --replay <#>", StyleType::Subtle)
    );
    Ok(())
}
