use super::AppContext;
use super::ui;
use crate::core::format::{format_money, format_number};
use crate::core::ConversionRequest;
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;

/// Quick pairs shown by the `favorites` command.
pub const FAVORITE_PAIRS: [(&str, &str); 5] = [
    ("USD", "IDR"),
    ("EUR", "IDR"),
    ("JPY", "IDR"),
    ("SGD", "IDR"),
    ("AUD", "IDR"),
];

fn favorite_requests(amount: &str) -> Result<Vec<ConversionRequest>> {
    FAVORITE_PAIRS
        .iter()
        .map(|(from, to)| {
            ConversionRequest::parse(amount, Some(from), Some(to)).map_err(super::convert::report)
        })
        .collect()
}

/// Quotes every favorite pair. These are previews, so nothing is added to
/// history or stats.
pub async fn run(ctx: &AppContext, amount: &str) -> Result<()> {
    let requests = favorite_requests(amount)?;

    let pb = ui::new_progress_bar(requests.len() as u64);
    let futures = requests.iter().map(|request| async {
        let result = ctx.service.quote(request, |_, _| {}).await;
        pb.inc(1);
        result
    });
    let results = join_all(futures).await;
    pb.finish_and_clear();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair", ctx.theme),
        ui::header_cell("Amount", ctx.theme),
        ui::header_cell("Converted", ctx.theme),
        ui::header_cell("Rate", ctx.theme),
    ]);

    for (request, result) in requests.iter().zip(results) {
        let pair = format!("{} → {}", request.from, request.to);
        let amount = ui::amount_cell(format_money(request.amount, &request.from, &ctx.locale));
        match result {
            Ok(result) => table.add_row(vec![
                Cell::new(pair),
                amount,
                ui::amount_cell(format_money(
                    result.converted_amount,
                    &request.to,
                    &ctx.locale,
                )),
                ui::amount_cell(format_number(result.rate, &ctx.locale)),
            ]),
            Err(e) => table.add_row(vec![
                Cell::new(pair),
                amount,
                ui::error_cell(&e.user_message()),
                Cell::new("-"),
            ]),
        };
    }

    println!("{table}");
    Ok(())
}
