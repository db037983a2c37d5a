//! Currency formatting passed explicitly to the presentation layer.
//!
//! Replaces process-wide locale state: whoever renders money holds a
//! `CurrencyFormat` and asks it to format values.

/// How to render a monetary amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    /// Symbol printed before the amount, separated by a space.
    pub symbol: String,
    /// Separator between the integer and fractional parts.
    pub decimal_separator: char,
    /// Separator between groups of three integer digits.
    pub thousands_separator: char,
    /// Number of fractional digits.
    pub precision: usize,
}

impl CurrencyFormat {
    /// Brazilian Real, `pt_BR` conventions: `R$ 1.234,56`.
    pub fn brl() -> Self {
        CurrencyFormat {
            symbol: "R$".to_string(),
            decimal_separator: ',',
            thousands_separator: '.',
            precision: 2,
        }
    }

    /// Formats `value` with the currency symbol, e.g. `-R$ 1.234,56`.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let sign = if self.is_negative(value) { "-" } else { "" };
        format!("{}{} {}", sign, self.symbol, self.amount(value))
    }

    /// Formats `value` without the currency symbol, e.g. `-1.234,56`.
    pub fn format_amount(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let sign = if self.is_negative(value) { "-" } else { "" };
        format!("{}{}", sign, self.amount(value))
    }

    /// Negative values that round to zero print unsigned.
    fn is_negative(&self, value: f64) -> bool {
        value < 0.0 && self.amount(value) != self.amount(0.0)
    }

    /// Grouped absolute value of `value`.
    fn amount(&self, value: f64) -> String {
        let fixed = format!("{:.*}", self.precision, value.abs());
        let (integer, fraction) = match fixed.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
        for (i, digit) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(digit);
        }
        if let Some(fraction) = fraction {
            grouped.push(self.decimal_separator);
            grouped.push_str(fraction);
        }
        grouped
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::brl()
    }
}
