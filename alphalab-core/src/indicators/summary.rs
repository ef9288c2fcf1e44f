//! Technical summary — every indicator at the last bar plus a vote-count
//! overall signal.
//!
//! Each indicator contributes one qualitative reading (oversold/overbought,
//! bullish/bearish, above/below). Nine readings vote; six or more on one
//! side is a strong signal, four or more a plain one. OBV is reported but
//! does not vote.

use serde::{Deserialize, Serialize};

use crate::domain::{bar::closes, PriceBar};

use super::adx::{adx, AdxOutput};
use super::bollinger::{bollinger, BandPosition, BollingerOutput};
use super::cci::cci;
use super::ema::{ema_last, sma_last};
use super::macd::{macd, MacdOutput};
use super::obv::obv;
use super::rsi::rsi;
use super::stochastic::{stochastic, StochasticOutput};
use super::vwap::vwap;
use super::williams_r::williams_r;

/// Oscillator reading relative to its overbought/oversold thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorSignal {
    Oversold,
    Overbought,
    Neutral,
}

/// Directional reading of a trend-following indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendSignal {
    Bullish,
    Bearish,
    Neutral,
}

/// ADX trend-strength classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdxTrend {
    NoTrend,
    Uptrend,
    StrongUptrend,
    Downtrend,
    StrongDowntrend,
}

/// Price position relative to a reference level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelativePosition {
    Above,
    Below,
}

/// Aggregate vote over all indicator readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallSignal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

/// Moving average block: short/medium/long SMAs, the two MACD EMAs, and
/// their alignment. Averages default to 0.0 below their window length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub sma20: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub trend: TrendSignal,
}

impl MovingAverages {
    fn compute(close_series: &[f64]) -> Self {
        let sma20 = sma_last(close_series, 20).unwrap_or(0.0);
        let sma50 = sma_last(close_series, 50).unwrap_or(0.0);
        let sma200 = sma_last(close_series, 200).unwrap_or(0.0);
        let ema12 = if close_series.len() >= 12 {
            ema_last(close_series, 12)
        } else {
            0.0
        };
        let ema26 = if close_series.len() >= 26 {
            ema_last(close_series, 26)
        } else {
            0.0
        };

        let current = close_series.last().copied().unwrap_or(0.0);
        let trend = if sma20 > sma50 && (sma200 == 0.0 || sma50 > sma200) && current > sma20 {
            TrendSignal::Bullish
        } else if sma20 < sma50 && (sma200 == 0.0 || sma50 < sma200) && current < sma20 {
            TrendSignal::Bearish
        } else {
            TrendSignal::Neutral
        };

        Self {
            sma20,
            sma50,
            sma200,
            ema12,
            ema26,
            trend,
        }
    }
}

/// All indicator outputs at the last bar with their qualitative readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    pub rsi: f64,
    pub rsi_signal: IndicatorSignal,
    pub macd: MacdOutput,
    pub macd_trend: TrendSignal,
    pub bollinger: BollingerOutput,
    pub moving_averages: MovingAverages,
    pub stochastic: StochasticOutput,
    pub stochastic_signal: IndicatorSignal,
    pub vwap: f64,
    pub vwap_position: RelativePosition,
    pub adx: AdxOutput,
    pub adx_trend: AdxTrend,
    pub williams_r: f64,
    pub williams_signal: IndicatorSignal,
    pub cci: f64,
    pub cci_signal: IndicatorSignal,
    pub obv: f64,
    pub overall: OverallSignal,
}

impl TechnicalSummary {
    /// Compute every indicator at the last bar of `bars`.
    pub fn compute(bars: &[PriceBar]) -> Self {
        let close_series = closes(bars);
        let current = close_series.last().copied().unwrap_or(0.0);

        let rsi_value = rsi(&close_series, 14);
        let rsi_signal = oscillator_signal(rsi_value, 30.0, 70.0);

        let macd_out = macd(&close_series, 12, 26, 9);
        let macd_trend = if macd_out.histogram > 0.0 && macd_out.macd > macd_out.signal {
            TrendSignal::Bullish
        } else if macd_out.histogram < 0.0 && macd_out.macd < macd_out.signal {
            TrendSignal::Bearish
        } else {
            TrendSignal::Neutral
        };

        let bollinger_out = bollinger(&close_series, 20, 2.0);
        let moving_averages = MovingAverages::compute(&close_series);

        let stochastic_out = stochastic(bars, 14, 3);
        let stochastic_signal = oscillator_signal(stochastic_out.k, 20.0, 80.0);

        let vwap_value = vwap(bars, 20);
        let vwap_position = if current > vwap_value {
            RelativePosition::Above
        } else {
            RelativePosition::Below
        };

        let adx_out = adx(bars, 14);
        let adx_trend = classify_adx(&adx_out);

        let williams_value = williams_r(bars, 14);
        let williams_signal = oscillator_signal(williams_value, -80.0, -20.0);

        let cci_value = cci(bars, 20);
        let cci_signal = oscillator_signal(cci_value, -100.0, 100.0);

        let mut summary = Self {
            rsi: rsi_value,
            rsi_signal,
            macd: macd_out,
            macd_trend,
            bollinger: bollinger_out,
            moving_averages,
            stochastic: stochastic_out,
            stochastic_signal,
            vwap: vwap_value,
            vwap_position,
            adx: adx_out,
            adx_trend,
            williams_r: williams_value,
            williams_signal,
            cci: cci_value,
            cci_signal,
            obv: obv(bars),
            overall: OverallSignal::Neutral,
        };
        summary.overall = summary.vote();
        summary
    }

    /// Tally bullish vs bearish readings across the nine voting indicators.
    fn vote(&self) -> OverallSignal {
        let mut bullish = 0;
        let mut bearish = 0;

        let mut oscillator_vote = |signal: IndicatorSignal| match signal {
            IndicatorSignal::Oversold => bullish += 1,
            IndicatorSignal::Overbought => bearish += 1,
            IndicatorSignal::Neutral => {}
        };
        oscillator_vote(self.rsi_signal);
        oscillator_vote(self.stochastic_signal);
        oscillator_vote(self.williams_signal);
        oscillator_vote(self.cci_signal);

        match self.macd_trend {
            TrendSignal::Bullish => bullish += 1,
            TrendSignal::Bearish => bearish += 1,
            TrendSignal::Neutral => {}
        }
        match self.bollinger.position {
            BandPosition::Below => bullish += 1,
            BandPosition::Above => bearish += 1,
            BandPosition::Middle => {}
        }
        match self.moving_averages.trend {
            TrendSignal::Bullish => bullish += 1,
            TrendSignal::Bearish => bearish += 1,
            TrendSignal::Neutral => {}
        }
        match self.vwap_position {
            RelativePosition::Above => bullish += 1,
            RelativePosition::Below => bearish += 1,
        }
        match self.adx_trend {
            AdxTrend::Uptrend | AdxTrend::StrongUptrend => bullish += 1,
            AdxTrend::Downtrend | AdxTrend::StrongDowntrend => bearish += 1,
            AdxTrend::NoTrend => {}
        }

        if bullish >= 6 {
            OverallSignal::StrongBuy
        } else if bullish >= 4 {
            OverallSignal::Buy
        } else if bearish >= 6 {
            OverallSignal::StrongSell
        } else if bearish >= 4 {
            OverallSignal::Sell
        } else {
            OverallSignal::Neutral
        }
    }
}

/// Low threshold → oversold, high threshold → overbought, else neutral.
fn oscillator_signal(value: f64, low: f64, high: f64) -> IndicatorSignal {
    if value < low {
        IndicatorSignal::Oversold
    } else if value > high {
        IndicatorSignal::Overbought
    } else {
        IndicatorSignal::Neutral
    }
}

fn classify_adx(out: &AdxOutput) -> AdxTrend {
    if out.adx < 20.0 {
        AdxTrend::NoTrend
    } else if out.plus_di > out.minus_di {
        if out.adx > 40.0 {
            AdxTrend::StrongUptrend
        } else {
            AdxTrend::Uptrend
        }
    } else if out.adx > 40.0 {
        AdxTrend::StrongDowntrend
    } else {
        AdxTrend::Downtrend
    }
}
