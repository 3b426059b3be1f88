use proptest::prelude::*;
use pw_gen_core::{DEFAULT_CHARSET, Generator, SampleOptions, Seed, TransitionModel};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn seeds() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec("[a-z]{0,8}", 1..16)
}

/// Number of observations of context length `len` contributed by a token of
/// `chars` characters, over every order in `1..=order`.
fn observations_of_length(chars: usize, order: usize, len: usize) -> usize {
	(1..=order)
		.map(|o| (1..=chars).filter(|&p| p.min(o) == len).count())
		.sum()
}

proptest! {
	#[test]
	fn totals_match_observations(words in seeds(), order in 1usize..5) {
		let generator = Generator::new(words, order, DEFAULT_CHARSET).unwrap();
		let model = generator.model();

		for (_, entry) in model.contexts() {
			prop_assert_eq!(entry.total(), entry.counts().iter().sum::<usize>());
			prop_assert_eq!(entry.counts().len(), 28);
		}

		let tokens: Vec<usize> = generator.dictionary().iter().map(|t| t.chars().count()).collect();
		let start = model.entry("$").map_or(0, |e| e.total());
		prop_assert_eq!(start, order * tokens.len());

		for len in 1..=order {
			let observed: usize = model
				.contexts()
				.filter(|(context, _)| *context != "$" && context.chars().count() == len)
				.map(|(_, entry)| entry.total())
				.sum();
			let expected: usize = tokens.iter().map(|&n| observations_of_length(n, order, len)).sum();
			prop_assert_eq!(observed, expected);
		}

		let all: usize = model.contexts().map(|(_, e)| e.total()).sum();
		prop_assert_eq!(all, tokens.iter().map(|n| order * (n + 1)).sum::<usize>());
	}

	#[test]
	fn model_ignores_seed_order(
		(words, reordered) in seeds().prop_flat_map(|w| (Just(w.clone()), Just(w).prop_shuffle())),
		order in 1usize..4,
	) {
		let a = Generator::new(words, order, DEFAULT_CHARSET).unwrap();
		let b = Generator::new(reordered, order, DEFAULT_CHARSET).unwrap();
		prop_assert_eq!(a.model(), b.model());
		prop_assert_eq!(a.dictionary(), b.dictionary());
	}

	#[test]
	fn parallel_and_sequential_agree(words in seeds(), order in 1usize..4) {
		let generator = Generator::new(words, order, DEFAULT_CHARSET).unwrap();
		let charset = generator.charset();
		let dictionary = generator.dictionary();
		prop_assert_eq!(
			TransitionModel::build_parallel(dictionary, order, charset).unwrap(),
			TransitionModel::build_sequential(dictionary, order, charset).unwrap()
		);
	}

	#[test]
	fn words_stay_within_bounds(
		words in seeds(),
		order in 1usize..4,
		max_length in 0usize..20,
		seed in any::<u64>(),
	) {
		let generator = Generator::new(Seed::from(words), order, DEFAULT_CHARSET).unwrap();
		let options = SampleOptions::new(Some(max_length / 2), max_length);
		let mut rng = StdRng::seed_from_u64(seed);
		let word = generator.sample_with_rng(&options, &mut rng).unwrap();
		prop_assert!(word.chars().count() <= max_length);
		prop_assert!(word.chars().all(|c| generator.charset().contains(c)));
	}

	#[test]
	fn seeded_sampling_is_reproducible(words in seeds(), seed in any::<u64>()) {
		let generator = Generator::new(words, 2, DEFAULT_CHARSET).unwrap();
		let options = SampleOptions::default();
		let first = generator.sample_with_rng(&options, &mut StdRng::seed_from_u64(seed)).unwrap();
		let second = generator.sample_with_rng(&options, &mut StdRng::seed_from_u64(seed)).unwrap();
		prop_assert_eq!(first, second);
	}
}
