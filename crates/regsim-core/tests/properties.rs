//! Generator and CSV properties over random seeds, sizes and codings.

use proptest::prelude::*;
use regsim_core::{from_csv_str, generate, to_csv_string, GeneratorConfig, GroupSpec};

fn config(seed: u64, per_group: usize, a_is_one: bool) -> GeneratorConfig {
    let (a, b) = if a_is_one { (1, 0) } else { (0, 1) };
    GeneratorConfig::default()
        .with_seed(seed)
        .with_total_count(per_group * 2)
        .with_groups(vec![
            GroupSpec::new("A", a, 100.0, 10.0),
            GroupSpec::new("B", b, 80.0, 10.0),
        ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn same_seed_gives_identical_data(seed in any::<u64>(), per_group in 1usize..60) {
        let first = generate(&config(seed, per_group, true)).unwrap();
        let second = generate(&config(seed, per_group, true)).unwrap();
        for (x, y) in first.samples().iter().zip(second.samples()) {
            prop_assert_eq!(&x.category, &y.category);
            prop_assert_eq!(x.covariate.map(f64::to_bits), y.covariate.map(f64::to_bits));
            prop_assert_eq!(x.outcome.map(f64::to_bits), y.outcome.map(f64::to_bits));
        }
    }

    #[test]
    fn groups_are_equal_sized(seed in any::<u64>(), per_group in 1usize..60) {
        let data = generate(&config(seed, per_group, true)).unwrap();
        prop_assert_eq!(data.len(), per_group * 2);
        for (_, size) in data.group_sizes() {
            prop_assert_eq!(size, per_group);
        }
    }

    #[test]
    fn indicators_follow_the_coding(seed in any::<u64>(), a_is_one in any::<bool>()) {
        let data = generate(&config(seed, 10, a_is_one)).unwrap();
        let expected_a = if a_is_one { 1 } else { 0 };
        for sample in data.samples() {
            let expected = if sample.category == "A" { expected_a } else { 1 - expected_a };
            prop_assert_eq!(sample.category_indicator, expected);
            prop_assert_eq!(data.coding().indicator(&sample.category), Some(expected));
        }
    }

    #[test]
    fn csv_round_trip(seed in any::<u64>(), per_group in 1usize..40, a_is_one in any::<bool>()) {
        let data = generate(&config(seed, per_group, a_is_one)).unwrap();
        let text = to_csv_string(&data).unwrap();
        let back = from_csv_str(&text, data.coding()).unwrap();

        prop_assert_eq!(to_csv_string(&back).unwrap(), text);
        for (x, y) in data.samples().iter().zip(back.samples()) {
            prop_assert_eq!(&x.category, &y.category);
            prop_assert_eq!(x.category_indicator, y.category_indicator);
            for (u, v) in [(x.covariate, y.covariate), (x.outcome, y.outcome)] {
                let (u, v) = (u.unwrap(), v.unwrap());
                prop_assert!((u - v).abs() <= 1e-9 * u.abs().max(1.0));
            }
        }
    }
}
