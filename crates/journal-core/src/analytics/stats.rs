use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Helper math (pure Decimal, no f64)
// ---------------------------------------------------------------------------

pub(crate) fn sqrt_decimal(x: Decimal) -> Decimal {
    if x <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let two = Decimal::from(2);
    let mut guess = if x > Decimal::ONE { x / two } else { Decimal::ONE };
    for _ in 0..40 {
        let next = (guess + x / guess) / two;
        if next == guess {
            break;
        }
        guess = next;
    }
    guess
}

pub(crate) fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len() as u64)
}

/// Population standard deviation (divides by n). Zero for fewer than two
/// observations.
pub(crate) fn population_stdev(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let m = mean(values);
    let var = values
        .iter()
        .map(|v| {
            let d = *v - m;
            d * d
        })
        .sum::<Decimal>()
        / Decimal::from(values.len() as u64);
    sqrt_decimal(var)
}
