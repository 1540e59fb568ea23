use analytics::AnalyticsEngine;
use proptest::prelude::*;
use simulator::Simulator;

proptest! {
    #[test]
    fn annualized_return_round_trips_to_total_return(
        prices in prop::collection::vec(50.0f64..150.0, 2..40),
        leverage in -3.0f64..3.0,
        periods_per_year in prop::sample::select(vec![1u32, 12, 252]),
    ) {
        let path = Simulator::new().leveraged(&prices, leverage).unwrap();
        let engine = AnalyticsEngine::new(periods_per_year).unwrap();
        let metrics = engine.equity_metrics(&path).unwrap();

        // Near -100% per year the annualized figure no longer carries enough precision.
        if !metrics.busted && metrics.annualized_return > -0.999 {
            let years = (prices.len() - 1) as f64 / f64::from(periods_per_year);
            let compounded = (1.0 + metrics.annualized_return).powf(years);
            let growth = 1.0 + metrics.total_return;
            prop_assert!((compounded - growth).abs() <= 1e-9 * growth.abs().max(1.0));
        }
    }

    #[test]
    fn unit_leverage_matches_simple_price_return(
        prices in prop::collection::vec(1.0f64..1000.0, 2..60),
    ) {
        let path = Simulator::new().leveraged(&prices, 1.0).unwrap();
        let metrics = AnalyticsEngine::new(12).unwrap().equity_metrics(&path).unwrap();
        let simple = prices[prices.len() - 1] / prices[0] - 1.0;
        prop_assert!((metrics.total_return - simple).abs() <= 1e-9 * simple.abs().max(1.0));
    }
}
