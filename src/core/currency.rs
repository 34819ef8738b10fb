//! Currency registry and the `CurrencyCode` type

use crate::core::error::HubError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Display metadata for a known currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub flag: &'static str,
}

const fn info(
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    flag: &'static str,
) -> CurrencyInfo {
    CurrencyInfo {
        code,
        name,
        symbol,
        flag,
    }
}

/// Every currency the hub knows about. A code is valid iff it appears here.
pub static CURRENCIES: [CurrencyInfo; 29] = [
    info("USD", "US Dollar", "$", "🇺🇸"),
    info("EUR", "Euro", "€", "🇪🇺"),
    info("GBP", "British Pound", "£", "🇬🇧"),
    info("ZAR", "South African Rand", "R", "🇿🇦"),
    info("AED", "UAE Dirham", "د.إ", "🇦🇪"),
    info("AUD", "Australian Dollar", "A$", "🇦🇺"),
    info("BRL", "Brazilian Real", "R$", "🇧🇷"),
    info("CAD", "Canadian Dollar", "C$", "🇨🇦"),
    info("CHF", "Swiss Franc", "Fr", "🇨🇭"),
    info("CNY", "Chinese Yuan", "¥", "🇨🇳"),
    info("DKK", "Danish Krone", "kr", "🇩🇰"),
    info("EGP", "Egyptian Pound", "E£", "🇪🇬"),
    info("HKD", "Hong Kong Dollar", "HK$", "🇭🇰"),
    info("INR", "Indian Rupee", "₹", "🇮🇳"),
    info("JPY", "Japanese Yen", "¥", "🇯🇵"),
    info("KRW", "South Korean Won", "₩", "🇰🇷"),
    info("MXN", "Mexican Peso", "Mex$", "🇲🇽"),
    info("MYR", "Malaysian Ringgit", "RM", "🇲🇾"),
    info("NOK", "Norwegian Krone", "kr", "🇳🇴"),
    info("NZD", "New Zealand Dollar", "NZ$", "🇳🇿"),
    info("PHP", "Philippine Peso", "₱", "🇵🇭"),
    info("PLN", "Polish Zloty", "zł", "🇵🇱"),
    info("RUB", "Russian Ruble", "₽", "🇷🇺"),
    info("SAR", "Saudi Riyal", "SR", "🇸🇦"),
    info("SEK", "Swedish Krona", "kr", "🇸🇪"),
    info("SGD", "Singapore Dollar", "S$", "🇸🇬"),
    info("THB", "Thai Baht", "฿", "🇹🇭"),
    info("TRY", "Turkish Lira", "₺", "🇹🇷"),
    info("TWD", "Taiwan Dollar", "NT$", "🇹🇼"),
];

/// A currency code that is guaranteed to be in [`CURRENCIES`].
///
/// Holds the registry index, so it is `Copy` and lookups of display data
/// never fail.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(u8);

pub const USD: CurrencyCode = CurrencyCode(0);
pub const EUR: CurrencyCode = CurrencyCode(1);
pub const GBP: CurrencyCode = CurrencyCode(2);
pub const ZAR: CurrencyCode = CurrencyCode(3);
pub const JPY: CurrencyCode = CurrencyCode(14);
pub const CNY: CurrencyCode = CurrencyCode(9);
pub const AUD: CurrencyCode = CurrencyCode(5);
pub const CAD: CurrencyCode = CurrencyCode(7);
pub const CHF: CurrencyCode = CurrencyCode(8);

/// Target currency most lookups default to; batch fetches are quoted from it.
pub const HOME_CURRENCY: CurrencyCode = ZAR;

pub const POPULAR_CURRENCIES: [CurrencyCode; 8] = [USD, EUR, GBP, JPY, CNY, AUD, CAD, CHF];

impl CurrencyCode {
    /// Parses a code case-insensitively, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, HubError> {
        let wanted = s.trim().to_ascii_uppercase();
        CURRENCIES
            .iter()
            .position(|c| c.code == wanted)
            .map(|index| CurrencyCode(index as u8))
            .ok_or_else(|| HubError::Validation(format!("Unsupported currency code: '{}'", s.trim())))
    }

    pub fn info(&self) -> &'static CurrencyInfo {
        &CURRENCIES[self.0 as usize]
    }

    pub fn code(&self) -> &'static str {
        self.info().code
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// All registry codes, in registry order.
    pub fn all() -> impl Iterator<Item = CurrencyCode> {
        (0..CURRENCIES.len()).map(|index| CurrencyCode(index as u8))
    }
}

pub fn currency_info(code: &str) -> Option<&'static CurrencyInfo> {
    CurrencyCode::parse(code).ok().map(|c| c.info())
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::parse(s)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CurrencyCode::parse(&raw).map_err(serde::de::Error::custom)
    }
}
