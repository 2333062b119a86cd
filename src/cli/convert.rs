use super::AppContext;
use super::ui::{self, StyleType};
use crate::core::format::format_money;
use crate::core::{
    ConversionOutcome, ConversionRequest, ConversionResult, ConvertError, CurrencyCode,
};
use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct JsonOutput<'a> {
    amount: f64,
    from: &'a CurrencyCode,
    to: &'a CurrencyCode,
    #[serde(flatten)]
    result: &'a ConversionResult,
}

/// Turns a conversion failure into the message shown to the user.
pub(crate) fn report(e: ConvertError) -> anyhow::Error {
    debug!(error = ?e, "Conversion failure details");
    anyhow!(e.user_message())
}

fn usage_summary(outcome: &ConversionOutcome) -> String {
    format!(
        "Total conversions: {} · Favorite currency: {} · History: {} saved",
        outcome.stats.conversions,
        outcome.stats.most_used().unwrap_or("-"),
        outcome.history.len()
    )
}

pub async fn run(
    ctx: &AppContext,
    amount: &str,
    from: Option<&str>,
    to: Option<&str>,
    swap: bool,
    json: bool,
) -> Result<()> {
    let prefs = ctx.store().load_prefs().await;
    let from = from
        .map(str::to_string)
        .or_else(|| prefs.from.map(String::from))
        .unwrap_or_else(|| ctx.config.default_from.clone());
    let to = to
        .map(str::to_string)
        .or_else(|| prefs.to.map(String::from))
        .unwrap_or_else(|| ctx.config.default_to.clone());

    let mut request =
        ConversionRequest::parse(amount, Some(&from), Some(&to)).map_err(report)?;
    if swap {
        request = request.swapped();
    }

    perform(ctx, &request, json).await
}

/// Converts, records the result and prints it.
pub(crate) async fn perform(ctx: &AppContext, request: &ConversionRequest, json: bool) -> Result<()> {
    let spinner = ui::new_spinner("Converting...");
    let outcome = ctx
        .service
        .convert(request, |attempt, max| {
            spinner.set_message(format!("Retrying... ({attempt}/{max})"))
        })
        .await;
    spinner.finish_and_clear();

    let outcome = outcome.map_err(report)?;
    let result = &outcome.result;

    if json {
        let output = JsonOutput {
            amount: request.amount,
            from: &request.from,
            to: &request.to,
            result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let line = format!(
        "{} → {}",
        format_money(request.amount, &request.from, &ctx.locale),
        format_money(result.converted_amount, &request.to, &ctx.locale)
    );
    println!("{}", ctx.style(&line, StyleType::Result));
    println!(
        "Rate: 1 {} = {}",
        request.from,
        format_money(result.rate, &request.to, &ctx.locale)
    );
    let updated = match &result.source {
        Some(source) => format!("Last updated: {} (via {source})", result.as_of),
        None => format!("Last updated: {}", result.as_of),
    };
    println!("{}", ctx.style(&updated, StyleType::Subtle));
    println!("{}", ctx.style(&usage_summary(&outcome), StyleType::Subtle));
    Ok(())
}
