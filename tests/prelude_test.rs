use querygen::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn test_prelude() {
    let g = Generator::builder(["red", "green", "blue"])
        .max_terms(3)
        .numeric_max(99)
        .operator_weights(OperatorWeights::uniform())
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let q = g.generate_structured(&mut rng);
    assert!(Query::is_well_formed(&q.to_string()));

    let q = Query::new(Term::Word("red".into()))
        .with_extension(Operator::AndNot, Term::Number(7));
    assert_eq!(q.to_string(), "red ANDNOT 7");
    assert_eq!(q.first(), &Term::Word("red".into()));
}

#[test]
fn test_malformed_query_error() {
    let e = "red AND".parse::<Query>().unwrap_err();
    assert!(matches!(e, GeneratorError::MalformedQuery(ref s) if s == "red AND"));
    assert!(!e.is_invalid_configuration());
}

#[test]
#[cfg(feature = "serde")]
fn test_serialisation() {
    let config = GeneratorConfig::new(["red", "green"])
        .with_max_terms(4)
        .with_operator_weights(OperatorWeights::new(2, 1, 0))
        .with_extension_range(ExtensionRange::BelowMax)
        .with_malformed_rate(0.25);

    let json = serde_json::to_string(&config).unwrap();
    println!("{}", json);
    let config2: GeneratorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, config2);

    // Same config, same seed, same queries.
    let g1 = Generator::from_config(config).unwrap();
    let g2 = Generator::from_config(config2).unwrap();
    let q1: Vec<String> = g1.queries(&mut StdRng::seed_from_u64(3)).take(50).collect();
    let q2: Vec<String> = g2.queries(&mut StdRng::seed_from_u64(3)).take(50).collect();
    assert_eq!(q1, q2);

    let q: Query = "red OR 3".parse().unwrap();
    let json = serde_json::to_string(&q).unwrap();
    assert_eq!(serde_json::from_str::<Query>(&json).unwrap(), q);

    let v = Vocabulary::new(vec!["a".into(), "b".into()]).unwrap();
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(serde_json::from_str::<Vocabulary>(&json).unwrap(), v);
}
