//! Amounts in words using the Indian numbering system.

use std::collections::{HashMap, VecDeque};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const CRORE: u128 = 10_000_000;
const LAKH: u128 = 100_000;
const THOUSAND: u128 = 1_000;
const HUNDRED: u128 = 100;

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

const TEENS: [&str; 10] = [
    "Ten", "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen",
    "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Spell out a whole amount, grouping by crore, lakh, thousand and hundred.
///
/// ```
/// use rasid_core::amount_in_words;
///
/// assert_eq!(amount_in_words(0), "Zero");
/// assert_eq!(amount_in_words(1500), "One Thousand Five Hundred");
/// assert_eq!(amount_in_words(250_000), "Two Lakh Fifty Thousand");
/// ```
pub fn amount_in_words(amount: u128) -> String {
    if amount == 0 {
        return "Zero".to_string();
    }

    words_for(amount).join(" ")
}

/// Words for the whole rupees of a decimal amount, after rounding to paise.
/// Paise are not spelled. `None` for negative amounts.
pub fn rupees_in_words(amount: Decimal) -> Option<String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return None;
    }
    let whole = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .trunc()
        .to_u128()?;
    Some(amount_in_words(whole))
}

/// Words for one amount. Group counts are spelled independently, so a
/// leading "and" only depends on what this call itself emitted.
fn words_for(amount: u128) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut rest = amount;

    for (unit, name) in [(CRORE, "Crore"), (LAKH, "Lakh"), (THOUSAND, "Thousand")] {
        if rest >= unit {
            parts.extend(words_for(rest / unit));
            parts.push(name.to_string());
            rest %= unit;
        }
    }

    if rest >= HUNDRED {
        parts.push(ONES[(rest / HUNDRED) as usize].to_string());
        parts.push("Hundred".to_string());
        rest %= HUNDRED;
    }

    if rest > 0 {
        if !parts.is_empty() {
            parts.push("and".to_string());
        }
        push_below_hundred(rest, &mut parts);
    }

    parts
}

fn push_below_hundred(n: u128, parts: &mut Vec<String>) {
    let n = n as usize;
    match n {
        0 => {}
        1..=9 => parts.push(ONES[n].to_string()),
        10..=19 => parts.push(TEENS[n - 10].to_string()),
        _ => {
            parts.push(TENS[n / 10].to_string());
            if n % 10 > 0 {
                parts.push(ONES[n % 10].to_string());
            }
        }
    }
}

/// Bounded memo of amount-in-words results.
///
/// Owned by the caller; evicts the oldest entry once full.
#[derive(Debug, Clone)]
pub struct WordsCache {
    capacity: usize,
    entries: HashMap<u128, String>,
    order: VecDeque<u128>,
}

impl WordsCache {
    /// Create a cache holding at most `capacity` amounts. Zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Words for `amount`, computed on first use.
    pub fn words(&mut self, amount: u128) -> String {
        if let Some(words) = self.entries.get(&amount) {
            return words.clone();
        }

        let words = amount_in_words(amount);
        if self.capacity == 0 {
            return words;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(amount);
        self.entries.insert(amount, words.clone());
        words
    }

    /// Number of cached amounts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all cached amounts.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for WordsCache {
    fn default() -> Self {
        Self::new(128)
    }
}
