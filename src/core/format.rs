//! Locale-aware money formatting.

use crate::core::currency::CurrencyCode;

const MIN_FRACTION_DIGITS: usize = 2;
const MAX_FRACTION_DIGITS: usize = 4;
const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPlacement {
    Prefix,
    PrefixSpaced,
    SuffixSpaced,
}

/// Number conventions for a language tag such as `en-US` or `de_DE.UTF-8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    tag: String,
    group: char,
    decimal: char,
    placement: SymbolPlacement,
    /// Lakh/crore grouping (`1,00,000`) used for Indian regions.
    indian_grouping: bool,
}

impl Default for Locale {
    fn default() -> Self {
        Self::parse("en-US")
    }
}

impl Locale {
    pub fn parse(raw: &str) -> Self {
        let tag = raw
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .replace('_', "-");
        let language = tag.split('-').next().unwrap_or_default().to_ascii_lowercase();
        let indian_grouping = tag
            .split('-')
            .skip(1)
            .any(|part| part.eq_ignore_ascii_case("IN"));

        let (group, decimal, placement) = match language.as_str() {
            "de" | "es" | "it" | "da" | "tr" | "el" => ('.', ',', SymbolPlacement::SuffixSpaced),
            "id" | "pt" | "nl" => ('.', ',', SymbolPlacement::PrefixSpaced),
            "fr" => (NARROW_NBSP, ',', SymbolPlacement::SuffixSpaced),
            "sv" | "nb" | "no" | "fi" | "ru" | "pl" | "cs" | "uk" => {
                (NBSP, ',', SymbolPlacement::SuffixSpaced)
            }
            _ => (',', '.', SymbolPlacement::Prefix),
        };

        Self {
            tag: if tag.is_empty() || tag == "C" || tag == "POSIX" {
                "en-US".to_string()
            } else {
                tag
            },
            group,
            decimal,
            placement,
            indian_grouping,
        }
    }

    /// Reads the locale from the usual environment variables, defaulting to `en-US`.
    pub fn detect() -> Self {
        ["LC_ALL", "LC_MONETARY", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

fn currency_symbol(code: &CurrencyCode) -> &str {
    match code.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "INR" => "₹",
        "KRW" => "₩",
        "IDR" => "Rp",
        "BRL" => "R$",
        "AUD" => "A$",
        "CAD" => "CA$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "MXN" => "MX$",
        "TRY" => "₺",
        "RUB" => "₽",
        "PHP" => "₱",
        "VND" => "₫",
        "THB" => "฿",
        "ILS" => "₪",
        other => other,
    }
}

fn group_digits(digits: &str, locale: &Locale) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 2);
    for (i, c) in digits.chars().enumerate() {
        let remaining = len - i;
        let boundary = if locale.indian_grouping {
            remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)
        } else {
            remaining % 3 == 0
        };
        if i > 0 && boundary {
            grouped.push(locale.group);
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a plain number with 2 to 4 fraction digits.
pub fn format_number(value: f64, locale: &Locale) -> String {
    let rounded = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (integer, fraction) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let mut fraction = fraction.trim_end_matches('0').to_string();
    while fraction.len() < MIN_FRACTION_DIGITS {
        fraction.push('0');
    }

    let sign = if value < 0.0 && rounded.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!(
        "{sign}{}{}{fraction}",
        group_digits(integer, locale),
        locale.decimal
    )
}

/// Formats an amount of money in the conventions of `locale`.
pub fn format_money(value: f64, currency: &CurrencyCode, locale: &Locale) -> String {
    if !value.is_finite() {
        return format!("{value:.2} {currency}");
    }

    let number = format_number(value, locale);
    let symbol = currency_symbol(currency);
    let alphabetic = symbol.chars().last().is_some_and(|c| c.is_ascii_alphabetic());

    match locale.placement {
        SymbolPlacement::Prefix if alphabetic => format!("{symbol}{NBSP}{number}"),
        SymbolPlacement::Prefix => format!("{symbol}{number}"),
        SymbolPlacement::PrefixSpaced => format!("{symbol}{NBSP}{number}"),
        SymbolPlacement::SuffixSpaced => format!("{number}{NBSP}{symbol}"),
    }
}
