use kgram_core::{LanguageModel, ModelError, StartSeed};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

const CORPUS: &str = "To be, or not to be, that is the question: \
    Whether 'tis nobler in the mind to suffer \
    The slings and arrows of outrageous fortune, \
    Or to take arms against a sea of troubles \
    And by opposing end them. To die: to sleep; \
    No more; and by a sleep to say we end \
    The heart-ache and the thousand natural shocks \
    That flesh is heir to.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows training statistics
    env_logger::init();

    // The context length must be at least 1
    match LanguageModel::new(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("k = 0 is invalid: {e}"),
    }

    // Train a model on 4-character contexts.
    // Calls accumulate; text shorter than k + 1 is ignored.
    let mut model = LanguageModel::new(4)?;
    model.train(CORPUS);
    model.train("abc");
    info!("{} contexts, {} observations", model.context_count(), model.total_observations());

    // The most frequent contexts, with their successors
    let mut contexts: Vec<(String, u64)> = model.contexts().collect();
    contexts.sort_by(|a, b| b.1.cmp(&a.1));
    for (context, frequency) in contexts.iter().take(3) {
        println!("{context:?} seen {frequency} times, followed by {:?}", model.transitions(context));
    }

    // Thread-local randomness
    println!("Generated: {}", model.generate(120));

    // Reproducible output with a seeded generator
    let mut rng = StdRng::seed_from_u64(2024);
    println!("Seeded: {}", model.generate_with(120, &mut rng));

    // Start from a chosen context; it must have exactly k characters
    let seed = StartSeed::custom("The ");
    println!("From 'The ': {}", model.generate_seeded(120, &seed, &mut rng)?);
    match model.generate_from("The", 120, &mut rng) {
        Ok(_) => println!("Should not happen"),
        Err(ModelError::InvalidSeed { expected, found }) => {
            println!("Seed of {found} characters is invalid, expected {expected}")
        }
        Err(e) => return Err(e.into()),
    }

    // Snapshots restore the same counts
    let restored = LanguageModel::from_bytes(&model.to_bytes()?)?;
    println!("Restored {} contexts", restored.context_count());

    Ok(())
}
