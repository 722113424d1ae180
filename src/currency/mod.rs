//! Built-in display currencies and amount formatting.
//!
//! Amounts are never converted between currencies. A currency only decides
//! which symbol is printed in front of a figure.

use once_cell::sync::Lazy;

use fintrack_domain::Currency;

use crate::errors::FinanceError;

static CATALOG: Lazy<Vec<Currency>> = Lazy::new(|| {
    [
        ("USD", "$", "US Dollar"),
        ("EUR", "€", "Euro"),
        ("GBP", "£", "British Pound"),
        ("JPY", "¥", "Japanese Yen"),
        ("CAD", "C$", "Canadian Dollar"),
        ("AUD", "A$", "Australian Dollar"),
        ("CHF", "CHF", "Swiss Franc"),
        ("CNY", "¥", "Chinese Yuan"),
        ("INR", "₹", "Indian Rupee"),
        ("MXN", "$", "Mexican Peso"),
        ("BRL", "R$", "Brazilian Real"),
        ("MAD", "DH", "Moroccan Dirham"),
    ]
    .into_iter()
    .map(|(code, symbol, name)| Currency::new(code, symbol, name))
    .collect()
});

/// Every supported currency, in display order.
pub fn catalog() -> &'static [Currency] {
    &CATALOG
}

/// Looks up a currency by ISO code, ignoring case.
pub fn find(code: &str) -> Option<&'static Currency> {
    let code = code.trim();
    CATALOG
        .iter()
        .find(|currency| currency.code.eq_ignore_ascii_case(code))
}

pub fn resolve(code: &str) -> Result<Currency, FinanceError> {
    find(code)
        .cloned()
        .ok_or_else(|| FinanceError::UnknownCurrency(code.trim().to_string()))
}

/// Renders `amount` with two decimals behind the currency symbol.
pub fn format_amount(amount: f64, currency: &Currency) -> String {
    format!("{}{:.2}", currency.symbol, amount)
}
