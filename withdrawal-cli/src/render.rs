//! Text rendering of withdrawal reports.
//!
//! Source amounts are shown in dollars with western digit grouping; the
//! resident tax is additionally shown in rupees with Indian grouping
//! (`₹4,80,481.86`).

use std::fmt::Write;

use rust_decimal::Decimal;
use withdrawal_core::calculations::common::round_half_up;
use withdrawal_core::{WithdrawalReport, WithdrawalRequest};

pub const SOURCE_SYMBOL: &str = "$";
pub const RESIDENT_SYMBOL: &str = "₹";

/// How the integer digits of an amount are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Groups of three: `1,234,567`.
    Western,
    /// Last three, then groups of two: `12,34,567`.
    Indian,
}

fn group_digits(
    digits: &str,
    grouping: Grouping,
) -> String {
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();

    let first = end.min(3);
    groups.push(&digits[end - first..end]);
    end -= first;

    let size = match grouping {
        Grouping::Western => 3,
        Grouping::Indian => 2,
    };
    while end > 0 {
        let take = end.min(size);
        groups.push(&digits[end - take..end]);
        end -= take;
    }

    groups.reverse();
    groups.join(",")
}

/// Formats an amount with a currency symbol, digit grouping and two decimals.
pub fn format_currency(
    amount: Decimal,
    symbol: &str,
    grouping: Grouping,
) -> String {
    let rounded = round_half_up(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}{symbol}{}.{cents}", group_digits(whole, grouping))
}

pub fn format_usd(amount: Decimal) -> String {
    format_currency(amount, SOURCE_SYMBOL, Grouping::Western)
}

pub fn format_inr(amount: Decimal) -> String {
    format_currency(amount, RESIDENT_SYMBOL, Grouping::Indian)
}

/// Renders a report as the human-readable result cards.
pub fn render_text(
    report: &WithdrawalReport,
    request: &WithdrawalRequest,
) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "Withdrawal: {} from {} ({})",
        format_usd(report.principal),
        request.plan.label(),
        if report.meta.is_early {
            "early"
        } else {
            "not early"
        }
    );
    let _ = writeln!(
        out,
        "Exchange rate: {}1 = {}{}",
        SOURCE_SYMBOL,
        RESIDENT_SYMBOL,
        report.meta.conversion_rate.normalize()
    );

    for entry in &report.results {
        let r = &entry.result;
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({})", entry.residency.code(), entry.residency.label());
        let _ = writeln!(out, "  {:<18}{:>18}", "US tax", format_usd(r.source_tax));
        let _ = writeln!(
            out,
            "  {:<18}{:>18}",
            "India tax",
            format_inr(entry.resident_tax_local)
        );
        let _ = writeln!(out, "  {:<18}{:>18}", "Penalty", format_usd(r.penalty));
        let _ = writeln!(
            out,
            "  {:<18}{:>18}",
            "Total deducted",
            format_usd(r.total_deducted)
        );
        let _ = writeln!(out, "  {:<18}{:>18}", "You receive", format_usd(r.receivable));
    }

    out
}
