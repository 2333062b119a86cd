use super::AppContext;
use super::ui;
use crate::core::currency::load_currencies;
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let currencies = load_currencies(&ctx.currency_list).await;
    let prefs = ctx.store().load_prefs().await;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code", ctx.theme),
        ui::header_cell("Name", ctx.theme),
        ui::header_cell("", ctx.theme),
    ]);

    for (code, name) in &currencies {
        let marker = match (&prefs.from, &prefs.to) {
            (Some(from), _) if from.as_str() == code => "last from",
            (_, Some(to)) if to.as_str() == code => "last to",
            _ => "",
        };
        table.add_row(vec![Cell::new(code), Cell::new(name), Cell::new(marker)]);
    }

    println!("{table}");
    Ok(())
}
