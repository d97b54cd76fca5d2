use std::collections::HashMap;

use kgram_core::LanguageModel;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Reference count of every context in `texts`, each text scanned on its own.
fn naive_counts(k: usize, texts: &[&str]) -> HashMap<String, u64> {
	let mut counts = HashMap::new();
	for text in texts {
		let chars: Vec<char> = text.chars().collect();
		if chars.len() <= k {
			continue;
		}
		for i in 0..chars.len() - k {
			*counts.entry(chars[i..i + k].iter().collect()).or_insert(0) += 1;
		}
	}
	counts
}

fn train_all(k: usize, texts: &[&str]) -> LanguageModel {
	let mut model = LanguageModel::new(k).unwrap();
	for text in texts {
		model.train(text);
	}
	model
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(200))]

	#[test]
	fn frequency_equals_transition_sum_and_positions(
		k in 1usize..4,
		first in "[abc]{0,30}",
		second in "[abc]{0,30}",
	) {
		let model = train_all(k, &[first.as_str(), second.as_str()]);
		let expected = naive_counts(k, &[first.as_str(), second.as_str()]);

		prop_assert_eq!(model.context_count(), expected.len());
		for (context, frequency) in model.contexts() {
			let sum: u64 = model.transitions(&context).iter().map(|(_, n)| n).sum();
			prop_assert_eq!(frequency, sum);
			prop_assert_eq!(Some(&frequency), expected.get(&context));
			prop_assert!(frequency >= 1);
		}
	}

	#[test]
	fn registry_follows_first_appearance(k in 1usize..4, text in "[abcd]{0,40}") {
		let model = train_all(k, &[text.as_str()]);
		let chars: Vec<char> = text.chars().collect();
		let mut expected: Vec<String> = Vec::new();
		if chars.len() > k {
			for i in 0..chars.len() - k {
				let context: String = chars[i..i + k].iter().collect();
				if !expected.contains(&context) {
					expected.push(context);
				}
			}
		}
		let registry: Vec<String> = model.contexts().map(|(context, _)| context).collect();
		prop_assert_eq!(registry, expected);
	}

	#[test]
	fn split_training_only_loses_the_boundary(
		k in 1usize..4,
		first in "[ab]{0,20}",
		second in "[ab]{0,20}",
	) {
		let alone = train_all(k, &[first.as_str()]);
		let split = train_all(k, &[first.as_str(), second.as_str()]);
		let joined_text = format!("{first}{second}");
		let joined = train_all(k, &[joined_text.as_str()]);

		for (context, _) in alone.contexts() {
			for (next_char, count) in alone.transitions(&context) {
				prop_assert!(split.transition_count(&context, next_char) >= count);
			}
		}
		for (context, _) in split.contexts() {
			for (next_char, count) in split.transitions(&context) {
				prop_assert!(joined.transition_count(&context, next_char) >= count);
			}
		}

		let boundary = first.chars().count();
		let total = joined_text.chars().count();
		let straddling = (0..total.saturating_sub(k))
			.filter(|i| i + k >= boundary && *i < boundary)
			.count() as u64;
		prop_assert!(straddling <= k as u64);
		prop_assert_eq!(joined.total_observations(), split.total_observations() + straddling);
	}

	#[test]
	fn short_text_leaves_model_unchanged(k in 1usize..6, corpus in "[abc]{0,30}", short in "[abcxyz]{0,5}") {
		let short: String = short.chars().take(k).collect();
		let mut model = train_all(k, &[corpus.as_str()]);
		let before = model.to_bytes().unwrap();
		model.train(&short);
		prop_assert_eq!(model.to_bytes().unwrap(), before);
	}

	#[test]
	fn training_is_structurally_deterministic(k in 1usize..4, text in "[a-e ]{0,60}") {
		let a = train_all(k, &[text.as_str()]);
		let b = train_all(k, &[text.as_str()]);
		prop_assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
	}

	#[test]
	fn output_never_exceeds_length(k in 1usize..4, text in "[abc]{2,30}", length in 0usize..200, seed in any::<u64>()) {
		let model = train_all(k, &[text.as_str()]);
		let mut rng = StdRng::seed_from_u64(seed);
		let output = model.generate_with(length, &mut rng).chars().count();
		prop_assert!(output <= length);
		if model.is_trained() && length <= k {
			prop_assert_eq!(output, length);
		}
		if !model.is_trained() {
			prop_assert_eq!(output, 0);
		}
	}

	#[test]
	fn periodic_corpus_never_stops_early(
		k in 1usize..4,
		period in "[abcd]{4,8}",
		length in 0usize..300,
		seed in any::<u64>(),
	) {
		// Every context of a repeated text also occurs with a successor.
		let model = train_all(k, &[period.repeat(3).as_str()]);
		let mut rng = StdRng::seed_from_u64(seed);
		let output = model.generate_with(length, &mut rng);
		prop_assert_eq!(output.chars().count(), length);
	}
}

#[test]
fn abc_scenario() {
	let model = train_all(2, &["abcabcabc"]);
	let registry: Vec<String> = model.contexts().map(|(context, _)| context).collect();
	assert_eq!(registry, ["ab", "bc", "ca"]);
	assert_eq!(model.context_frequency("ab"), 3);
	assert_eq!(model.context_frequency("bc"), 2);
	assert_eq!(model.context_frequency("ca"), 2);
	assert_eq!(model.transitions("ab"), vec![('c', 3)]);
	assert_eq!(model.transitions("bc"), vec![('a', 2)]);
	assert_eq!(model.transitions("ca"), vec![('b', 2)]);
}

#[test]
fn training_after_generation_is_observed() {
	let mut model = train_all(1, &["ab"]);
	let mut rng = StdRng::seed_from_u64(1);
	assert_eq!(model.generate_with(5, &mut rng), "ab");
	model.train("ba");
	assert_eq!(model.generate_with(5, &mut rng).chars().count(), 5);
}
