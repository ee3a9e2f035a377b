// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core data-types: token amounts and timestamps, with their conversions to and from the
//! on-chain representation.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use alloy::primitives::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An amount of ether, stored as a whole number of wei.
///
/// Any `uint256` the contract stores is a valid amount, so converting from the on-chain
/// representation never fails.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default, Debug)]
pub struct Amount(U256);

/// Human-readable formats get the decimal string in ether, binary formats the wei count.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            String::deserialize(deserializer)?
                .parse()
                .map_err(de::Error::custom)
        } else {
            U256::deserialize(deserializer).map(Amount)
        }
    }
}

impl From<Amount> for U256 {
    fn from(amount: Amount) -> U256 {
        amount.0
    }
}

impl From<U256> for Amount {
    fn from(wei: U256) -> Amount {
        Amount(wei)
    }
}

/// Failures of amount arithmetic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    /// A ratio was taken against zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// `10^18`, the number of wei in one ether.
const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

impl Amount {
    /// The number of decimal digits of an ether amount: one ether is `10^18` wei.
    pub const DECIMAL_PLACES: u8 = 18;

    /// One ether.
    pub const ONE: Amount = Amount(U256::from_limbs([WEI_PER_ETHER, 0, 0, 0]));

    /// No ether at all.
    pub const ZERO: Amount = Amount(U256::ZERO);

    /// `ether` whole ether.
    pub fn from_tokens(ether: u128) -> Amount {
        Amount(Self::ONE.0 * U256::from(ether))
    }

    /// `milliether` thousandths of an ether.
    pub fn from_millis(milliether: u128) -> Amount {
        Amount(U256::from(WEI_PER_ETHER / 1_000) * U256::from(milliether))
    }

    /// Exactly `wei` wei.
    pub const fn from_wei(wei: U256) -> Amount {
        Amount(wei)
    }

    /// The amount in wei.
    pub const fn wei(&self) -> U256 {
        self.0
    }

    /// Whether this is no ether at all.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Prints the amount in ether. Trailing zeros are trimmed, but at least one fractional
/// digit is kept (`1.0`, `2.5`); a formatting precision raises that minimum.
impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = Amount::DECIMAL_PLACES as usize;
        let (whole, fraction) = self.0.div_rem(Amount::ONE.0);
        // The remainder is below 10^18 and fits in a `u64`.
        let fraction = format!("{:0places$}", fraction.to::<u64>());
        let fraction = fraction.trim_end_matches('0');
        let width = f.precision().unwrap_or(1).max(fraction.len());
        write!(f, "{whole}.{fraction:0<width$}")
    }
}

/// Why a decimal string is not a valid amount of ether.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    /// Not a plain decimal number.
    #[error("not a decimal number")]
    Parse,
    /// More wei than an [`Amount`] holds.
    #[error("amount is too large")]
    TooHigh,
    /// Finer than one wei.
    #[error("at most {} digits are allowed after the point", Amount::DECIMAL_PLACES)]
    TooManyDigits,
    /// Zero or negative.
    #[error("amount must be strictly positive")]
    NotPositive,
}

/// Parses a plain decimal number of ether, such as `1`, `0.25` or `1_000.5`. Signs other
/// than a leading `+`, exponents and special values are rejected.
impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let src = src.trim();
        if src.starts_with('-') {
            return Err(ParseAmountError::NotPositive);
        }
        let src = src.strip_prefix('+').unwrap_or(src);
        let (whole, fraction) = src.split_once('.').unwrap_or((src, ""));
        let whole = whole.replace('_', "");
        let fraction = fraction.replace('_', "");
        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseAmountError::Parse);
        }
        let all_digits = |digits: &str| digits.chars().all(|c| c.is_ascii_digit());
        if !all_digits(&whole) || !all_digits(&fraction) {
            return Err(ParseAmountError::Parse);
        }
        let places = Amount::DECIMAL_PLACES as usize;
        if fraction.len() > places {
            return Err(ParseAmountError::TooManyDigits);
        }
        let ten = U256::from(10u8);
        let mut wei = U256::ZERO;
        for digit in whole.chars().chain(fraction.chars()) {
            let digit = U256::from(digit as u8 - b'0');
            wei = wei
                .checked_mul(ten)
                .and_then(|wei| wei.checked_add(digit))
                .ok_or(ParseAmountError::TooHigh)?;
        }
        let scale = ten.pow(U256::from(places - fraction.len()));
        wei.checked_mul(scale)
            .map(Amount)
            .ok_or(ParseAmountError::TooHigh)
    }
}

/// Converts an on-chain integer amount, in wei, into a decimal string in ether.
pub fn to_major_unit(wei: U256) -> String {
    Amount::from(wei).to_string()
}

/// Converts a decimal string in ether into the on-chain integer amount, in wei.
///
/// Only strictly positive amounts with at most [`Amount::DECIMAL_PLACES`] fractional
/// digits are accepted.
pub fn to_minor_unit(decimal: &str) -> Result<U256, ParseAmountError> {
    let amount = decimal.parse::<Amount>()?;
    if amount.is_zero() {
        return Err(ParseAmountError::NotPositive);
    }
    Ok(amount.wei())
}

/// Returns how much of `target` has been `raised`, as a percentage rounded to the nearest
/// integer. Values above 100 are returned as they are, saturating at `u64::MAX`.
pub fn progress_percentage(target: Amount, raised: Amount) -> Result<u64, ArithmeticError> {
    if target.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    let target = target.wei();
    let percentage = match raised.wei().checked_mul(U256::from(100u8)) {
        Some(scaled) => scaled.saturating_add(target / U256::from(2u8)) / target,
        // Only reachable for amounts near 2^256 wei, where rounding is irrelevant.
        None => (raised.wei() / target).saturating_mul(U256::from(100u8)),
    };
    Ok(percentage.saturating_to::<u64>())
}

/// A timestamp, in milliseconds since the Unix epoch.
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default, Debug, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Returns the current time according to the system clock.
    pub fn now() -> Timestamp {
        Timestamp(
            u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default(),
        )
    }

    /// Returns the timestamp of the given number of seconds since the Unix epoch.
    pub const fn from_seconds(seconds: u64) -> Timestamp {
        Timestamp(seconds.saturating_mul(1_000))
    }

    /// Returns the number of milliseconds since the Unix epoch.
    pub const fn millis(&self) -> u64 {
        self.0
    }

    /// Returns the number of whole seconds since the Unix epoch, as stored on-chain.
    pub const fn seconds(&self) -> u64 {
        self.0 / 1_000
    }

    /// Returns the number of milliseconds between `other` and `self`, or zero if `other` is
    /// not earlier than `self`.
    pub const fn millis_since(&self, other: Timestamp) -> u64 {
        self.0.saturating_sub(other.0)
    }

    /// Returns the timestamp that is `millis` milliseconds later than `self`.
    pub const fn saturating_add_millis(&self, millis: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(millis))
    }

    /// Returns the timestamp that is `millis` milliseconds earlier than `self`.
    pub const fn saturating_sub_millis(&self, millis: u64) -> Timestamp {
        Timestamp(self.0.saturating_sub(millis))
    }
}

impl From<u64> for Timestamp {
    fn from(t: u64) -> Timestamp {
        Timestamp(t)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date_time) = i64::try_from(self.0)
            .ok()
            .and_then(chrono::DateTime::from_timestamp_millis)
        {
            return date_time.naive_utc().fmt(f);
        }
        self.0.fmt(f)
    }
}

#[cfg(test)]
#[path = "unit_tests/data_types_tests.rs"]
mod tests;
