//! Words command - spell an amount in Indian numbering.

use clap::Args;

use rasid_core::render::amount_phrase;
use rasid_core::{rupees_in_words, CellValue};

use super::config::load_config;

/// Arguments for the words command.
#[derive(Args)]
pub struct WordsArgs {
    /// Amount, e.g. 1500 or 12345678.90 (paise are not spelled)
    #[arg(required = true, allow_hyphen_values = true)]
    amount: String,

    /// Print only the words, without "Rupees" and "Only"
    #[arg(long)]
    plain: bool,
}

pub async fn run(args: WordsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let currency = if args.plain {
        None
    } else {
        Some(load_config(config_path)?.render.currency_words)
    };
    println!("{}", spell(&args.amount, currency.as_deref())?);
    Ok(())
}

fn spell(amount: &str, currency: Option<&str>) -> anyhow::Result<String> {
    let value = CellValue::from(amount)
        .to_decimal()
        .ok_or_else(|| anyhow::anyhow!("Not a number: {}", amount))?;

    let words = rupees_in_words(value)
        .ok_or_else(|| anyhow::anyhow!("Amount must not be negative: {}", amount))?;
    Ok(match currency {
        Some(currency) => amount_phrase(currency, &words),
        None => words,
    })
}
