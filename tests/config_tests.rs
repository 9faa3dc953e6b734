use symbios_neuroevolution::{
    EvolutionConfig, NeuroError, ParameterizedModel,
    network::{Activation, Architecture, FeedForwardNetwork},
};

#[test]
fn test_toml_overrides_defaults() {
    let config = EvolutionConfig::from_toml_str(
        r#"
        population_size = 4
        elite_fraction = 0.5
        "#,
    )
    .unwrap();
    let defaults = EvolutionConfig::default();
    assert_eq!(config.population_size, 4);
    assert_eq!(config.elite_fraction, 0.5);
    assert_eq!(config.mutation_rate, defaults.mutation_rate);
    assert_eq!(config.mutation_scale, defaults.mutation_scale);
    assert_eq!(config.elite_count(), 2);
}

#[test]
fn test_toml_with_unknown_key_fails_to_parse() {
    let result = EvolutionConfig::from_toml_str("population_size = 4\ncrossover_rate = 0.7\n");
    assert!(matches!(result, Err(NeuroError::ConfigParse(_))));
}

#[test]
fn test_toml_values_are_validated() {
    let result = EvolutionConfig::from_toml_str("mutation_rate = 2.0\n");
    assert!(matches!(result, Err(NeuroError::InvalidConfiguration(_))));
}

#[test]
fn test_elite_count_floors_fraction() {
    let config = EvolutionConfig::default()
        .with_population_size(7)
        .with_elite_fraction(0.3);
    assert_eq!(config.elite_count(), 2);
    assert_eq!(config.with_elite_fraction(0.0).elite_count(), 0);
    assert_eq!(config.with_elite_fraction(1.0).elite_count(), 7);
}

#[test]
fn test_toml_decimal_elite_fraction_counts_exactly() {
    let config =
        EvolutionConfig::from_toml_str("population_size = 10\nelite_fraction = 0.7\n").unwrap();
    assert_eq!(config.elite_count(), 7);

    let config = config.with_population_size(20).with_elite_fraction(0.35);
    assert_eq!(config.elite_count(), 7);
    assert_eq!(config.with_population_size(10).with_elite_fraction(0.9).elite_count(), 9);
}

#[test]
fn test_config_roundtrips_through_json() {
    let config = EvolutionConfig::default().with_mutation_scale(0.05);
    let json = serde_json::to_string(&config).unwrap();
    let back: EvolutionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_architecture_deserialization_is_validated() {
    let arch: Architecture = serde_json::from_str("[2, 4, 4, 1]").unwrap();
    assert_eq!(arch.parameter_count(), 37);
    assert!(serde_json::from_str::<Architecture>("[2]").is_err());
    assert!(serde_json::from_str::<Architecture>("[2, 0, 1]").is_err());
}

#[test]
fn test_network_deserialization_checks_layers_against_architecture() {
    let small = FeedForwardNetwork::zeros(Architecture::new(vec![2, 1]).unwrap(), Activation::Tanh);
    let wide = FeedForwardNetwork::zeros(Architecture::new(vec![3, 3]).unwrap(), Activation::Tanh);

    let json = serde_json::to_value(&small).unwrap();
    let back: FeedForwardNetwork = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(back.parameters().len(), back.parameter_count());

    // Architecture [2, 1] paired with a 3x3 layer.
    let mut mismatched = json;
    mismatched["layers"] = serde_json::to_value(wide.layers()).unwrap();
    let result = serde_json::from_value::<FeedForwardNetwork>(mismatched);
    assert!(result.is_err(), "layers disagreeing with the architecture must be rejected");
}
