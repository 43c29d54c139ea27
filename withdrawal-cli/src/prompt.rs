//! Interactive collection of a withdrawal request on a terminal.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use tracing::debug;
use withdrawal_core::{PlanType, WithdrawalRequest};

use crate::input::{parse_amount, parse_yes_no};

/// Writes `question`, then reads lines until `parse` accepts one.
fn ask<R, W, T>(
    input: &mut R,
    output: &mut W,
    question: &str,
    retry_hint: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{question} ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input ended before '{question}' was answered");
        }

        match parse(&line) {
            Some(value) => return Ok(value),
            None => writeln!(output, "{retry_hint}")?,
        }
    }
}

/// Asks for the early flag, the amount and the plan type, in that order.
pub fn collect_request<R, W>(
    input: &mut R,
    output: &mut W,
) -> Result<WithdrawalRequest>
where
    R: BufRead,
    W: Write,
{
    let is_early = ask(
        input,
        output,
        "Are you withdrawing before age 59½? (yes/no):",
        "Please answer yes or no.",
        parse_yes_no,
    )?;

    let principal = ask(
        input,
        output,
        "Amount you want to withdraw (USD):",
        "Please enter a number, e.g. 50,000.",
        |s| parse_amount(s).ok(),
    )?;

    let plan = ask(
        input,
        output,
        "Your plan (401k, IRA, Roth 401k, Roth IRA):",
        "Unrecognized plan. Enter one of: 401k, IRA, Roth 401k, Roth IRA.",
        PlanType::parse,
    )?;

    debug!(%principal, is_early, ?plan, "collected withdrawal request");

    Ok(WithdrawalRequest {
        principal,
        is_early,
        plan,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn collects_all_three_answers() {
        let mut input = "yes\n50,000\nRoth IRA\n".as_bytes();
        let mut output = Vec::new();

        let request = collect_request(&mut input, &mut output).unwrap();

        assert_eq!(
            request,
            WithdrawalRequest {
                principal: dec!(50000),
                is_early: true,
                plan: PlanType::RothIra,
            }
        );
    }

    #[test]
    fn reasks_after_invalid_answers() {
        let mut input = "maybe\nno\nlots\n11925\n403b\nira\n".as_bytes();
        let mut output = Vec::new();

        let request = collect_request(&mut input, &mut output).unwrap();

        assert!(!request.is_early);
        assert_eq!(request.principal, dec!(11925));
        assert_eq!(request.plan, PlanType::TraditionalIra);

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Please answer yes or no."));
        assert!(transcript.contains("Please enter a number"));
        assert!(transcript.contains("Unrecognized plan."));
    }

    #[test]
    fn fails_when_input_ends_early() {
        let mut input = "yes\n".as_bytes();
        let mut output = Vec::new();

        let err = collect_request(&mut input, &mut output).unwrap_err();

        assert!(err.to_string().contains("input ended"));
    }
}
