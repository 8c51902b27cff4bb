//! Spelling amounts out in English words.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const ONES: [&str; 20] = [
    "ZERO",
    "ONE",
    "TWO",
    "THREE",
    "FOUR",
    "FIVE",
    "SIX",
    "SEVEN",
    "EIGHT",
    "NINE",
    "TEN",
    "ELEVEN",
    "TWELVE",
    "THIRTEEN",
    "FOURTEEN",
    "FIFTEEN",
    "SIXTEEN",
    "SEVENTEEN",
    "EIGHTEEN",
    "NINETEEN",
];

const TENS: [&str; 10] = [
    "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

// Largest first.
const MAGNITUDES: [(u64, &str); 3] = [
    (1_000_000_000, "BILLION"),
    (1_000_000, "MILLION"),
    (1_000, "THOUSAND"),
];

pub const MAJOR_UNIT: &str = "PESOS";
pub const MINOR_UNIT: &str = "CENTAVOS";

/// Spell a non-negative integer in uppercase English words.
pub fn words(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }

    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return match n % 10 {
            0 => tens.to_string(),
            rem => format!("{} {}", tens, ONES[rem as usize]),
        };
    }

    if n < 1_000 {
        let head = format!("{} HUNDRED", ONES[(n / 100) as usize]);
        return match n % 100 {
            0 => head,
            rem => format!("{} {}", head, words(rem)),
        };
    }

    // n >= 1000 so the thousand entry always matches.
    let (value, label) = MAGNITUDES
        .iter()
        .copied()
        .find(|(value, _)| n >= *value)
        .unwrap_or(MAGNITUDES[2]);

    let head = format!("{} {}", words(n / value), label);
    match n % value {
        0 => head,
        rem => format!("{} {}", head, words(rem)),
    }
}

/// Split a money amount into whole units and centavos.
///
/// Centavos are rounded half away from zero, so 123.455 gives (123, 46).
pub fn split_amount(amount: Decimal) -> (u64, u64) {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let whole = rounded.trunc();
    let centavos = ((rounded - whole) * Decimal::ONE_HUNDRED).trunc();

    (
        whole.to_u64().unwrap_or_default(),
        centavos.to_u64().unwrap_or_default(),
    )
}

/// Spell a money amount the way it is printed on receipts, e.g.
/// `ONE THOUSAND FIVE HUNDRED PESOS ONLY`.
pub fn amount_in_words(amount: Decimal) -> String {
    let (whole, centavos) = split_amount(amount);

    if centavos > 0 {
        format!(
            "{} {} AND {} {} ONLY",
            words(whole),
            MAJOR_UNIT,
            words(centavos),
            MINOR_UNIT
        )
    } else {
        format!("{} {} ONLY", words(whole), MAJOR_UNIT)
    }
}
