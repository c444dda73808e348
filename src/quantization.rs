//! Conversions between human-scale prices and sizes and the market's integer units.
//!
//! Prices round to the nearest tick, ties to even. Sizes always round down: a converted size never
//! commits more inventory than the caller named.
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Converts a price in quote units per base unit into ticks.
pub fn price_to_ticks(
    price: f64,
    tick_size_in_quote_lots_per_base_unit: u64,
    num_quote_lots_per_quote_unit: u64,
) -> ClientResult<u64> {
    check_positive(price, "price")?;
    check_granularity(
        tick_size_in_quote_lots_per_base_unit,
        "tick_size_in_quote_lots_per_base_unit",
    )?;
    check_granularity(num_quote_lots_per_quote_unit, "num_quote_lots_per_quote_unit")?;
    let ticks = price * num_quote_lots_per_quote_unit as f64
        / tick_size_in_quote_lots_per_base_unit as f64;
    to_u64(ticks.round_ties_even(), "price_in_ticks")
}

/// The price, in quote units per base unit, that a tick count stands for.
pub fn ticks_to_price(
    price_in_ticks: u64,
    tick_size_in_quote_lots_per_base_unit: u64,
    num_quote_lots_per_quote_unit: u64,
) -> ClientResult<f64> {
    check_granularity(num_quote_lots_per_quote_unit, "num_quote_lots_per_quote_unit")?;
    Ok(price_in_ticks as f64 * tick_size_in_quote_lots_per_base_unit as f64
        / num_quote_lots_per_quote_unit as f64)
}

/// Converts base units into base lots, rounding down.
pub fn base_units_to_base_lots_floor(
    units: f64,
    num_base_lots_per_base_unit: u64,
) -> ClientResult<u64> {
    check_positive(units, "base_units")?;
    check_granularity(num_base_lots_per_base_unit, "num_base_lots_per_base_unit")?;
    floor_lots(units, num_base_lots_per_base_unit, "num_base_lots")
}

/// Converts quote units into quote lots, rounding down.
pub fn quote_units_to_quote_lots(
    units: f64,
    num_quote_lots_per_quote_unit: u64,
) -> ClientResult<u64> {
    check_positive(units, "quote_units")?;
    check_granularity(num_quote_lots_per_quote_unit, "num_quote_lots_per_quote_unit")?;
    floor_lots(units, num_quote_lots_per_quote_unit, "num_quote_lots")
}

fn floor_lots(units: f64, lots_per_unit: u64, field: &'static str) -> ClientResult<u64> {
    scaled_floor_lots(units, lots_per_unit, 1, field)
}

/// Lots for `units` that are `scale` times finer than the lot's unit, rounded down so that
/// `lots * scale / lots_per_unit <= units`.
fn scaled_floor_lots(
    units: f64,
    lots_per_unit: u64,
    scale: u32,
    field: &'static str,
) -> ClientResult<u64> {
    let per_unit = lots_per_unit as f64;
    let scale = scale as f64;
    let mut lots = (units * per_unit / scale).floor();
    if !lots.is_finite() {
        return Err(ClientError::Overflow { field });
    }
    // The product can round up across an integer boundary. Step one ulp at a time: above 2^53
    // subtracting 1.0 leaves the value unchanged.
    while lots > 0.0 && lots * scale / per_unit > units {
        lots = f64::from_bits(lots.to_bits() - 1).floor();
    }
    to_u64(lots, field)
}

fn check_positive(value: f64, field: &'static str) -> ClientResult {
    // NaN fails the comparison as well
    if !(value > 0.0) {
        return Err(ClientError::InvalidQuantity { field, value });
    }
    Ok(())
}

fn check_granularity(value: u64, field: &str) -> ClientResult {
    if value == 0 {
        return Err(ClientError::config(format!("{field} must be non-zero")));
    }
    Ok(())
}

fn to_u64(value: f64, field: &'static str) -> ClientResult<u64> {
    // u64::MAX as f64 rounds up to 2^64, which is itself out of range
    if !value.is_finite() || value >= u64::MAX as f64 {
        return Err(ClientError::Overflow { field });
    }
    Ok(value as u64)
}

fn default_raw_base_units_per_base_unit() -> u32 {
    1
}

/// The integer grid a market quotes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketGranularity {
    pub tick_size_in_quote_lots_per_base_unit: u64,
    pub num_quote_lots_per_quote_unit: u64,
    pub num_base_lots_per_base_unit: u64,
    /// Raw base units making up one base unit.
    #[serde(default = "default_raw_base_units_per_base_unit")]
    pub raw_base_units_per_base_unit: u32,
}

impl MarketGranularity {
    pub fn new(
        tick_size_in_quote_lots_per_base_unit: u64,
        num_quote_lots_per_quote_unit: u64,
        num_base_lots_per_base_unit: u64,
    ) -> ClientResult<Self> {
        let granularity = Self {
            tick_size_in_quote_lots_per_base_unit,
            num_quote_lots_per_quote_unit,
            num_base_lots_per_base_unit,
            raw_base_units_per_base_unit: 1,
        };
        granularity.validate()?;
        Ok(granularity)
    }

    pub fn with_raw_base_units_per_base_unit(mut self, raw_base_units_per_base_unit: u32) -> Self {
        self.raw_base_units_per_base_unit = raw_base_units_per_base_unit;
        self
    }

    pub fn validate(&self) -> ClientResult {
        check_granularity(
            self.tick_size_in_quote_lots_per_base_unit,
            "tick_size_in_quote_lots_per_base_unit",
        )?;
        check_granularity(self.num_quote_lots_per_quote_unit, "num_quote_lots_per_quote_unit")?;
        check_granularity(self.num_base_lots_per_base_unit, "num_base_lots_per_base_unit")?;
        check_granularity(
            self.raw_base_units_per_base_unit as u64,
            "raw_base_units_per_base_unit",
        )
    }

    pub fn float_price_to_ticks(&self, price: f64) -> ClientResult<u64> {
        price_to_ticks(
            price,
            self.tick_size_in_quote_lots_per_base_unit,
            self.num_quote_lots_per_quote_unit,
        )
    }

    pub fn ticks_to_float_price(&self, price_in_ticks: u64) -> ClientResult<f64> {
        ticks_to_price(
            price_in_ticks,
            self.tick_size_in_quote_lots_per_base_unit,
            self.num_quote_lots_per_quote_unit,
        )
    }

    /// Converts raw base units (before the market's scale factor) into base lots, rounding down.
    pub fn raw_base_units_to_base_lots_rounded_down(&self, raw_units: f64) -> ClientResult<u64> {
        check_granularity(
            self.raw_base_units_per_base_unit as u64,
            "raw_base_units_per_base_unit",
        )?;
        check_positive(raw_units, "base_units")?;
        check_granularity(self.num_base_lots_per_base_unit, "num_base_lots_per_base_unit")?;
        scaled_floor_lots(
            raw_units,
            self.num_base_lots_per_base_unit,
            self.raw_base_units_per_base_unit,
            "num_base_lots",
        )
    }

    pub fn quote_units_to_quote_lots(&self, units: f64) -> ClientResult<u64> {
        quote_units_to_quote_lots(units, self.num_quote_lots_per_quote_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn granularity() -> MarketGranularity {
        MarketGranularity::new(1000, 10_000, 1000).unwrap()
    }

    #[test]
    fn thousand_units_is_a_million_lots() {
        assert_eq!(base_units_to_base_lots_floor(1000.0, 1000).unwrap(), 1_000_000);
    }

    #[test]
    fn prices_round_to_nearest_tick() {
        let g = granularity();
        // 0.12 quote units = 1200 quote lots = 1.2 ticks
        assert_eq!(g.float_price_to_ticks(0.12).unwrap(), 1);
        assert_eq!(g.float_price_to_ticks(0.18).unwrap(), 2);
        assert_eq!(g.float_price_to_ticks(1.0).unwrap(), 10);
        // exact halves go to the even tick
        assert_eq!(g.float_price_to_ticks(0.25).unwrap(), 2);
        assert_eq!(g.float_price_to_ticks(0.15).unwrap(), 2);
        assert_eq!(g.ticks_to_float_price(10).unwrap(), 1.0);
    }

    #[test]
    fn rejects_non_positive_and_nan() {
        for value in [0.0, -1.5, f64::NAN] {
            let err = price_to_ticks(value, 1000, 10_000).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Quantization);
            assert!(matches!(err, ClientError::InvalidQuantity { .. }));
            assert!(base_units_to_base_lots_floor(value, 1000).is_err());
            assert!(quote_units_to_quote_lots(value, 1000).is_err());
        }
    }

    #[test]
    fn overflow() {
        assert!(matches!(
            price_to_ticks(1e30, 1, 1),
            Err(ClientError::Overflow { .. })
        ));
        assert!(matches!(
            base_units_to_base_lots_floor(f64::INFINITY, 1),
            Err(ClientError::Overflow { .. })
        ));
        assert!(matches!(
            quote_units_to_quote_lots(1.9e19, 1),
            Err(ClientError::Overflow { .. })
        ));
    }

    #[test]
    fn zero_granularity_is_a_configuration_error() {
        assert_eq!(
            price_to_ticks(1.0, 0, 10).unwrap_err().kind(),
            ErrorKind::Configuration
        );
        assert!(MarketGranularity::new(1000, 0, 1000).is_err());
    }

    #[test]
    fn raw_units_are_scaled() {
        let g = granularity().with_raw_base_units_per_base_unit(1000);
        assert_eq!(g.raw_base_units_to_base_lots_rounded_down(5000.0).unwrap(), 5000);
        assert_eq!(g.quote_units_to_quote_lots(200.0).unwrap(), 2_000_000);
    }

    #[test]
    fn floor_never_exceeds_units() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let units: f64 = rng.gen_range(1e-6..1e6);
            let lots_per_unit: u64 = rng.gen_range(1..1_000_000);
            let lots = base_units_to_base_lots_floor(units, lots_per_unit).unwrap();
            assert!(lots as f64 / lots_per_unit as f64 <= units);
        }
    }

    #[test]
    fn floor_terminates_above_f64_integer_precision() {
        let units = 1.022464113484296e17;
        let lots = base_units_to_base_lots_floor(units, 24).unwrap();
        assert!(lots > 2_400_000_000_000_000_000);
        assert!(lots as f64 / 24.0 <= units);
    }

    #[test]
    fn raw_floor_never_exceeds_raw_units() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10_000 {
            let raw_per: u32 = rng.gen_range(1..1_000_000);
            let lots_per_unit: u64 = rng.gen_range(1..1_000_000);
            let raw_units: f64 = rng.gen_range(1e-3..1e9);
            let g = MarketGranularity::new(1, 1, lots_per_unit)
                .unwrap()
                .with_raw_base_units_per_base_unit(raw_per);
            let lots = g.raw_base_units_to_base_lots_rounded_down(raw_units).unwrap();
            assert!(lots as f64 * raw_per as f64 / lots_per_unit as f64 <= raw_units);
        }
    }

    #[test]
    fn price_to_ticks_is_monotonic() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut prices: Vec<f64> = (0..5_000).map(|_| rng.gen_range(1e-4..1e4)).collect();
        prices.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let ticks: Vec<u64> = prices
            .iter()
            .map(|p| price_to_ticks(*p, 1000, 10_000).unwrap())
            .collect();
        assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
    }
}
