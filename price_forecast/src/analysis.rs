//! Descriptive analysis of a price history
//!
//! Latest values of the usual technical indicators plus summary statistics
//! over the whole series. Indicators that lack enough history are `None`.

use crate::data::{PricePoint, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::metrics::round_to;
use crate::source::PriceSource;
use serde::Serialize;
use trade_math::statistics::{mean, sample_std_dev};
use trade_math::{BollingerBands, Macd, RelativeStrengthIndex, SimpleMovingAverage};
use tracing::debug;

const RSI_PERIOD: usize = 14;
const MACD_SPANS: (usize, usize, usize) = (12, 26, 9);
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_WIDTH: f64 = 2.0;

/// Trailing simple moving averages of the close
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovingAverages {
    pub ma_10: Option<f64>,
    pub ma_20: Option<f64>,
    pub ma_50: Option<f64>,
}

/// MACD(12, 26, 9) at the last close
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdSnapshot {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

/// Bollinger Bands(20, 2) at the last close
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerSnapshot {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
}

/// Indicator values at the last close
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TechnicalIndicators {
    pub moving_averages: MovingAverages,
    pub rsi: Option<f64>,
    pub macd: MacdSnapshot,
    pub bollinger_bands: BollingerSnapshot,
}

/// Direction of the last close relative to the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Uptrend,
    Downtrend,
}

/// Summary statistics over the whole series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSummary {
    pub current_price: f64,
    /// Change from the previous close
    pub price_change: f64,
    pub percent_change: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub average_price: f64,
    /// Sample standard deviation over the mean price
    pub volatility: f64,
    pub trend: Trend,
}

/// Everything returned for one analysis request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub current_price: f64,
    /// Every close, rounded to two decimals
    pub price_data: Vec<PricePoint>,
    pub technical_indicators: TechnicalIndicators,
    pub summary: PriceSummary,
}

/// Streaming state for every indicator, fed one close at a time
struct IndicatorSet {
    ma_10: SimpleMovingAverage,
    ma_20: SimpleMovingAverage,
    ma_50: SimpleMovingAverage,
    rsi: RelativeStrengthIndex,
    macd: Macd,
    bollinger: BollingerBands,
}

impl IndicatorSet {
    fn new() -> Result<Self> {
        let (fast, slow, signal) = MACD_SPANS;
        Ok(Self {
            ma_10: SimpleMovingAverage::new(10)?,
            ma_20: SimpleMovingAverage::new(20)?,
            ma_50: SimpleMovingAverage::new(50)?,
            rsi: RelativeStrengthIndex::new(RSI_PERIOD)?,
            macd: Macd::new(fast, slow, signal)?,
            bollinger: BollingerBands::new(BOLLINGER_PERIOD, BOLLINGER_WIDTH)?,
        })
    }

    fn update(&mut self, price: f64) -> Result<()> {
        self.ma_10.update(price)?;
        self.ma_20.update(price)?;
        self.ma_50.update(price)?;
        self.rsi.update(price)?;
        self.macd.update(price)?;
        self.bollinger.update(price)?;
        Ok(())
    }

    fn snapshot(&self) -> TechnicalIndicators {
        let cents = |v: trade_math::Result<f64>| v.ok().map(|v| round_to(v, 2));
        let fine = |v: trade_math::Result<f64>| v.ok().map(|v| round_to(v, 4));

        TechnicalIndicators {
            moving_averages: MovingAverages {
                ma_10: cents(self.ma_10.value()),
                ma_20: cents(self.ma_20.value()),
                ma_50: cents(self.ma_50.value()),
            },
            rsi: cents(self.rsi.value()),
            macd: MacdSnapshot {
                macd: fine(self.macd.macd_value()),
                signal: fine(self.macd.signal_value()),
                histogram: fine(self.macd.histogram()),
            },
            bollinger_bands: BollingerSnapshot {
                upper: cents(self.bollinger.upper_band()),
                middle: cents(self.bollinger.middle_band()),
                lower: cents(self.bollinger.lower_band()),
            },
        }
    }
}

/// Technical indicators at the last close of `prices`
pub fn technical_indicators(prices: &[f64]) -> Result<TechnicalIndicators> {
    let mut indicators = IndicatorSet::new()?;
    for &price in prices {
        indicators.update(price)?;
    }
    Ok(indicators.snapshot())
}

/// Summary statistics of `prices`.
///
/// A single price has no previous close, so its change is zero; with fewer
/// than two prices the volatility is zero as well.
pub fn summarize(prices: &[f64]) -> Result<PriceSummary> {
    let (first, current) = match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => {
            return Err(ForecastError::InsufficientData {
                required: 1,
                available: 0,
            })
        }
    };
    let previous = if prices.len() > 1 {
        prices[prices.len() - 2]
    } else {
        current
    };

    let price_change = current - previous;
    let percent_change = if previous != 0.0 {
        price_change / previous * 100.0
    } else {
        0.0
    };

    let average = mean(prices)?;
    let volatility = match sample_std_dev(prices) {
        Ok(std_dev) if average > 0.0 => std_dev / average,
        _ => 0.0,
    };

    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);

    Ok(PriceSummary {
        current_price: round_to(current, 2),
        price_change: round_to(price_change, 2),
        percent_change: round_to(percent_change, 2),
        period_high: round_to(high, 2),
        period_low: round_to(low, 2),
        average_price: round_to(average, 2),
        volatility: round_to(volatility, 4),
        trend: if current > first {
            Trend::Uptrend
        } else {
            Trend::Downtrend
        },
    })
}

/// Describe `series` for `symbol`
pub fn analyze(symbol: &str, series: &PriceSeries) -> Result<AnalysisReport> {
    let prices = series.prices();
    let summary = summarize(&prices)?;
    let technical_indicators = technical_indicators(&prices)?;

    debug!(
        symbol,
        points = prices.len(),
        rsi = ?technical_indicators.rsi,
        "analysed price history"
    );

    Ok(AnalysisReport {
        symbol: symbol.to_uppercase(),
        current_price: summary.current_price,
        price_data: series
            .points()
            .iter()
            .map(|p| PricePoint::new(p.date, round_to(p.price, 2)))
            .collect(),
        technical_indicators,
        summary,
    })
}

/// Fetch `symbol` from `source` and [`analyze`] it
pub fn analyze_from_source<S: PriceSource + ?Sized>(
    source: &S,
    symbol: &str,
) -> Result<AnalysisReport> {
    let series = source.fetch_series(symbol)?;
    if series.is_empty() {
        return Err(ForecastError::UpstreamDataUnavailable {
            symbol: symbol.to_uppercase(),
            reason: "source returned an empty series".to_string(),
        });
    }
    analyze(symbol, &series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_summary_values() {
        let summary = summarize(&[10.0, 12.0, 11.0, 14.0, 12.6]).unwrap();
        assert_eq!(summary.current_price, 12.6);
        assert_eq!(summary.price_change, -1.4);
        assert_eq!(summary.percent_change, -10.0);
        assert_eq!(summary.period_high, 14.0);
        assert_eq!(summary.period_low, 10.0);
        assert_eq!(summary.average_price, 11.92);
        assert_eq!(summary.trend, Trend::Uptrend);
        assert!(summary.volatility > 0.0);
    }

    #[test]
    fn test_single_price_summary() {
        let summary = summarize(&[5.0]).unwrap();
        assert_eq!(summary.price_change, 0.0);
        assert_eq!(summary.volatility, 0.0);
        assert_eq!(summary.trend, Trend::Downtrend);
    }

    #[test]
    fn test_empty_summary_rejected() {
        assert!(matches!(
            summarize(&[]),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_indicators_need_history() {
        let prices: Vec<f64> = (0..15).map(|t| 20.0 + t as f64).collect();
        let indicators = technical_indicators(&prices).unwrap();

        assert_abs_diff_eq!(indicators.moving_averages.ma_10.unwrap(), 29.5, epsilon = 1e-9);
        assert!(indicators.moving_averages.ma_20.is_none());
        assert!(indicators.moving_averages.ma_50.is_none());
        assert_eq!(indicators.rsi, Some(100.0));
        assert!(indicators.macd.macd.unwrap() > 0.0);
        assert!(indicators.bollinger_bands.middle.is_none());
    }

    #[test]
    fn test_trend_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Trend::Downtrend).unwrap(),
            "\"downtrend\""
        );
    }
}
