use chrono::{Duration, NaiveDate};
use price_forecast::models::arima::{fit_and_forecast_with, FitOptions};
use price_forecast::models::{fit_and_forecast, Arima, ArimaOrder};
use price_forecast::preprocess::{scale, scale_values, smooth};
use price_forecast::{DifferencingOrder, ForecastError, ForecastModel, PriceSeries, TrainedForecastModel};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::rstest;

fn ar1_series(len: usize, phi: f64, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut values = vec![0.0; len];
    for t in 1..len {
        values[t] = phi * values[t - 1] + normal.sample(&mut rng);
    }
    values
}

fn random_walk_prices(len: usize, seed: u64) -> PriceSeries {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.1, 1.5).unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut price = 200.0;
    let mut dates = Vec::with_capacity(len);
    let mut prices = Vec::with_capacity(len);
    for i in 0..len {
        price += normal.sample(&mut rng);
        dates.push(start + Duration::days(i as i64));
        prices.push(price);
    }
    PriceSeries::from_parts(dates, prices).unwrap()
}

#[rstest]
#[case(0, 1)]
#[case(1, 7)]
#[case(2, 30)]
fn test_forecast_length_matches_horizon(#[case] d: u8, #[case] horizon: usize) {
    let series = random_walk_prices(150, 21);
    let smoothed = smooth(&series).unwrap();
    let (scaled, _) = scale(&smoothed).unwrap();

    let d = DifferencingOrder::new(d).unwrap();
    let forecast = fit_and_forecast(&scaled, d, horizon).unwrap();

    assert_eq!(forecast.len(), horizon);
    assert_eq!(forecast.horizons(), horizon);
    assert!(forecast.values().iter().all(|v| v.is_finite()));
    assert_eq!(forecast.intervals().unwrap().len(), horizon);
    assert_eq!(forecast.dates().unwrap().len(), horizon);
}

#[test]
fn test_forecast_dates_follow_last_date() {
    let series = random_walk_prices(120, 22);
    let last = series.last_date().unwrap();
    let (scaled, _) = scale(&smooth(&series).unwrap()).unwrap();

    let d = DifferencingOrder::new(1).unwrap();
    let forecast = fit_and_forecast(&scaled, d, 30).unwrap();
    let dates = forecast.dates().unwrap();

    for (i, date) in dates.iter().enumerate() {
        assert_eq!(*date, last + Duration::days(i as i64 + 1));
    }
    assert_eq!(dates[29], last + Duration::days(30));
}

#[test]
fn test_undated_input_has_no_dates() {
    let (scaled, _) = scale_values(&ar1_series(100, 0.5, 3)).unwrap();
    let forecast = fit_and_forecast(&scaled, DifferencingOrder::new(0).unwrap(), 5).unwrap();
    assert!(forecast.dates().is_none());
    assert_eq!(forecast.len(), 5);
}

#[test]
fn test_bounds_widen_with_horizon() {
    let (scaled, _) = scale_values(&ar1_series(200, 0.6, 4)).unwrap();
    let forecast = fit_and_forecast(&scaled, DifferencingOrder::new(1).unwrap(), 10).unwrap();

    let widths: Vec<f64> = forecast
        .intervals()
        .unwrap()
        .iter()
        .map(|(lo, hi)| hi - lo)
        .collect();
    assert!(widths[0] > 0.0);
    for pair in widths.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-12);
    }
    for (value, (lo, hi)) in forecast.values().iter().zip(forecast.intervals().unwrap()) {
        assert!(lo < value && value < hi);
    }
}

#[test]
fn test_ar1_fit_recovers_coefficient() {
    let values = ar1_series(600, 0.7, 5);
    let fitted = Arima::new(ArimaOrder::new(1, 0, 0)).fit(&values).unwrap();

    assert!((fitted.ar()[0] - 0.7).abs() < 0.1, "phi = {}", fitted.ar()[0]);
    assert!(fitted.sigma2() > 0.7 && fitted.sigma2() < 1.3);
    assert!(fitted.log_likelihood().is_finite());
    assert!(fitted.aic() > 0.0);
    assert_eq!(fitted.nobs(), 600);
}

#[test]
fn test_differenced_fit_has_no_constant() {
    let values = ar1_series(150, 0.9, 6);
    let fitted = Arima::new(ArimaOrder::new(5, 1, 1)).fit(&values).unwrap();
    assert_eq!(fitted.mean(), 0.0);
    assert_eq!(fitted.ar().len(), 5);
    assert_eq!(fitted.ma().len(), 1);
    assert_eq!(fitted.nobs(), 149);
    assert!(fitted.iterations() > 0);
}

#[test]
fn test_model_trait_seam() {
    let model = Arima::new(ArimaOrder::new(5, 0, 1));
    assert_eq!(ForecastModel::name(&model), "ARIMA(5, 0, 1)");

    let trained = model.train(&ar1_series(120, 0.3, 8)).unwrap();
    assert_eq!(TrainedForecastModel::name(&trained), "ARIMA(5, 0, 1)");
    assert_eq!(TrainedForecastModel::forecast(&trained, 4).unwrap().len(), 4);
}

#[test]
fn test_zero_horizon_is_invalid() {
    let (scaled, _) = scale_values(&ar1_series(80, 0.5, 9)).unwrap();
    let err = fit_and_forecast(&scaled, DifferencingOrder::new(0).unwrap(), 0).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidParameter(_)));
}

#[test]
fn test_iteration_cap_fails_the_fit() {
    let (scaled, _) = scale_values(&ar1_series(120, 0.5, 10)).unwrap();
    let options = FitOptions {
        max_iterations: 3,
        ..FitOptions::default()
    };
    let err = fit_and_forecast_with(&scaled, ArimaOrder::new(5, 0, 1), options, 5).unwrap_err();
    assert!(matches!(err, ForecastError::ModelFitFailure(_)));
    assert!(err.is_retryable());
}
