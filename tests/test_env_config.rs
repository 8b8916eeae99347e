use food_search::providers::UsdaProvider;
use food_search::{load_config, FoodSearchAggregator, ProviderConfig};
use std::env;
use std::time::Duration;

#[test]
fn test_env_overrides_order_timeout_and_key() {
    env::set_var("FOOD_SEARCH__ORDER", "usda,themealdb");
    env::set_var("FOOD_SEARCH__TIMEOUT", "0");
    env::set_var("FOOD_SEARCH__PROVIDERS__USDA__API_KEY", "fdc-live-key");

    let config = load_config().unwrap();

    env::remove_var("FOOD_SEARCH__ORDER");
    env::remove_var("FOOD_SEARCH__TIMEOUT");
    env::remove_var("FOOD_SEARCH__PROVIDERS__USDA__API_KEY");

    assert_eq!(config.order, vec!["usda", "themealdb"]);
    assert_eq!(config.timeout, 0);
    assert_eq!(config.provider_timeout(), None);
    assert_eq!(
        config.provider("usda").api_key.as_deref(),
        Some("fdc-live-key")
    );

    let aggregator = FoodSearchAggregator::from_config(&config).unwrap();
    let names: Vec<_> = aggregator
        .providers()
        .iter()
        .map(|p| p.provider_name())
        .collect();
    assert_eq!(names, vec!["usda", "themealdb"]);
    assert!(aggregator.providers().iter().all(|p| p.timeout().is_none()));
}

#[test]
fn test_usda_key_falls_back_to_environment() {
    env::remove_var("USDA_API_KEY");
    let provider = UsdaProvider::new(&ProviderConfig::default(), None).unwrap();
    assert!(!provider.is_configured());

    env::set_var("USDA_API_KEY", "DEMO_KEY");
    let provider = UsdaProvider::new(&ProviderConfig::default(), None).unwrap();
    assert!(!provider.is_configured());

    env::set_var("USDA_API_KEY", "fdc-env-key");
    let provider =
        UsdaProvider::new(&ProviderConfig::default(), Some(Duration::from_secs(5))).unwrap();
    assert!(provider.is_configured());

    env::remove_var("USDA_API_KEY");
}
