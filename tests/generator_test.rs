use approx::assert_abs_diff_eq;
use querygen::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use strum::IntoEnumIterator;

fn words() -> Vec<&'static str> {
    vec!["apple", "banana", "cherry", "date", "elderberry"]
}

fn is_operator(t: &str) -> bool {
    t.parse::<Operator>().is_ok()
}

#[test]
fn test_queries_shape() {
    let max_terms = 6;
    let numeric_max = 500;
    let g = Generator::builder(words())
        .max_terms(max_terms)
        .numeric_max(numeric_max)
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    for q in g.queries(&mut rng).take(5000) {
        assert!(!q.is_empty());
        assert!(!q.contains('\n'));
        assert!(!q.contains("  "));

        let tokens: Vec<&str> = q.split(' ').collect();
        assert!(!is_operator(tokens[0]), "{q}");
        assert_eq!(tokens.len() % 2, 1, "{q}");

        let n_ops = tokens.iter().filter(|t| is_operator(t)).count();
        assert!(n_ops < max_terms, "{q}");

        for (i, t) in tokens.iter().enumerate() {
            if i % 2 == 1 {
                assert!(is_operator(t), "{q}");
            } else {
                let is_word = words().iter().any(|w| w == t);
                let is_number = t
                    .parse::<i64>()
                    .is_ok_and(|n| (0..=numeric_max).contains(&n));
                assert!(is_word || is_number, "{t} in {q}");
            }
        }
    }
}

#[test]
fn test_term_count_reaches_bounds() {
    let g = Generator::builder(words()).max_terms(4).build().unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let counts: Vec<usize> = (0..2000)
        .map(|_| g.generate_structured(&mut rng).n_terms())
        .collect();
    assert_eq!(counts.iter().min(), Some(&1));
    assert_eq!(counts.iter().max(), Some(&4));

    let g = Generator::builder(words())
        .max_terms(4)
        .extension_range(ExtensionRange::BelowMax)
        .build()
        .unwrap();
    let counts: Vec<usize> = (0..2000)
        .map(|_| g.generate_structured(&mut rng).n_terms())
        .collect();
    assert_eq!(counts.iter().min(), Some(&1));
    assert_eq!(counts.iter().max(), Some(&3));
}

#[test]
fn test_max_terms_one() {
    for range in [ExtensionRange::UpToMax, ExtensionRange::BelowMax] {
        let g = Generator::builder(words())
            .max_terms(1)
            .extension_range(range)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for q in g.queries(&mut rng).take(500) {
            assert!(!q.contains(' '), "{q}");
            assert!(Query::is_well_formed(&q));
        }
    }
}

#[test]
fn test_determinism() {
    let g = Generator::builder(words()).max_terms(5).build().unwrap();

    let run = |seed: u64| -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(seed);
        g.queries(&mut rng).take(200).collect()
    };

    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn test_operator_frequencies() {
    let g = Generator::builder(words()).max_terms(5).build().unwrap();
    let mut rng = StdRng::seed_from_u64(77);
    let stats = g.write_batch(&mut rng, 100_000, std::io::sink()).unwrap();

    let or = stats.operator_frequency(Operator::Or);
    let and = stats.operator_frequency(Operator::And);
    let and_not = stats.operator_frequency(Operator::AndNot);
    assert!(or > and);
    assert!(or > and_not);

    let weights = OperatorWeights::default();
    for op in Operator::iter() {
        assert_abs_diff_eq!(
            stats.operator_frequency(op),
            weights.probability(op),
            epsilon = 0.01
        );
    }
}

#[test]
fn test_word_probability() {
    let g = Generator::builder(words())
        .word_probability(0.8)
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let stats = g.write_batch(&mut rng, 20_000, std::io::sink()).unwrap();
    let word_share = 1.0 - stats.n_numbers() as f64 / stats.n_terms() as f64;
    assert_abs_diff_eq!(word_share, 0.8, epsilon = 0.01);

    let g = Generator::builder(words())
        .word_probability(1.0)
        .build()
        .unwrap();
    let stats = g.write_batch(&mut rng, 1000, std::io::sink()).unwrap();
    assert_eq!(stats.n_numbers(), 0);
}

#[test]
fn test_no_malformation_by_default() {
    let g = Generator::builder(words()).max_terms(8).build().unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    assert!(g.queries(&mut rng).take(20_000).all(|q| Query::is_well_formed(&q)));
}

#[test]
fn test_malformed_rate() {
    let g = Generator::builder(words())
        .malformed_rate(0.01)
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(12);

    let mut n_malformed = 0;
    for _ in 0..100_000 {
        let generated = g.generate(&mut rng);
        let well_formed = Query::is_well_formed(generated.text());
        assert_eq!(well_formed, !generated.is_malformed(), "{generated:?}");
        if generated.is_malformed() {
            n_malformed += 1;
            assert!(!generated.text().contains('\n'));
        }
    }
    // Expect about 1000.
    assert!((800..1200).contains(&n_malformed), "{n_malformed}");
}

#[test]
fn test_structured_parses_back() {
    let g = Generator::builder(words())
        .max_terms(10)
        .malformed_rate(0.5)
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..1000 {
        let q = g.generate_structured(&mut rng);
        assert_eq!(q.to_string().parse::<Query>().unwrap(), q);
    }
}
