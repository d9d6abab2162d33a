use super::init_err;
use crate::error::Result;
use crate::portfolio::ReturnSeries;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

pub const DAILY_MEAN_RETURN: f64 = 0.0003;
pub const DAILY_RETURN_STD: f64 = 0.012;

/// The last `n` weekdays on or before `end`, oldest first
pub fn business_days_ending(end: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(n);
    let mut day = end;
    while days.len() < n {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    days.reverse();
    days
}

/// Normal daily returns compounded from `base_value`
pub fn generate_market(rng: &mut StdRng, days: usize, base_value: f64, end: NaiveDate) -> Result<ReturnSeries> {
    let dist = Normal::new(DAILY_MEAN_RETURN, DAILY_RETURN_STD).map_err(|e| init_err("return distribution", e))?;
    let returns: Vec<f64> = (0..days).map(|_| dist.sample(rng)).collect();
    ReturnSeries::from_returns(base_value, returns, business_days_ending(end, days))
}
