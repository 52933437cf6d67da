use super::Model;
use super::ModelConfig;
use rand::Rng;
use rand::rngs::SmallRng;

/// Deterministic offline model. Recognizes the prompt families the
/// agents emit and fabricates well-formed labeled-section responses from
/// a stream seeded by (run seed, prompt), so a seeded run is exactly
/// reproducible without any transport. Stands in wherever a remote
/// implementation of [`Model`] would be plugged.
#[derive(Debug, Clone)]
pub struct Scripted {
    config: ModelConfig,
    seed: u64,
}

impl Scripted {
    pub fn new(config: ModelConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    fn rng(&self, prompt: &str) -> SmallRng {
        use rand::SeedableRng;
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hash;
        use std::hash::Hasher;
        let ref mut hasher = DefaultHasher::new();
        self.seed.hash(hasher);
        self.config.name.hash(hasher);
        prompt.hash(hasher);
        SmallRng::seed_from_u64(hasher.finish())
    }

    fn respond(&self, prompt: &str) -> String {
        let mut rng = self.rng(prompt);
        if prompt.contains("HYPOTHESIS A:") {
            self.verdict(&mut rng)
        } else if prompt.contains("initial focus areas") {
            self.focus_areas(&mut rng)
        } else if prompt.contains("Perform an initial review") {
            self.review(&mut rng, &["CORRECTNESS", "QUALITY", "NOVELTY", "SAFETY"])
        } else if prompt.contains("Perform a full review") {
            self.review(&mut rng, &["CORRECTNESS", "QUALITY", "NOVELTY"])
        } else if prompt.contains("Perform a deep verification") {
            self.review(&mut rng, &["ASSUMPTIONS"])
        } else if prompt.contains("existing observations") {
            self.review(&mut rng, &["OBSERVATIONS"])
        } else if prompt.contains("research overview") {
            self.overview(&mut rng)
        } else if prompt.contains("Parse the following research goal") {
            self.plan(&mut rng)
        } else if prompt.contains("Generate 2 novel research hypotheses") {
            [self.hypothesis(&mut rng), self.hypothesis(&mut rng)].join("\n\n")
        } else {
            self.hypothesis(&mut rng)
        }
    }

    fn hypothesis(&self, rng: &mut SmallRng) -> String {
        let noun = Self::pick(rng, Self::NOUNS);
        let angle = Self::pick(rng, Self::ANGLES);
        let nonce: u32 = rng.random();
        format!(
            "TITLE: {} of {} ({:08x})\n\
             STATEMENT: {} modulates the target system through {}.\n\
             RATIONALE: Prior observations of {} are consistent with a {} mechanism.\n\
             TESTABILITY: Perturb {} and measure the downstream response longitudinally.",
            angle, noun, nonce, noun, angle, noun, angle, noun,
        )
    }

    fn focus_areas(&self, rng: &mut SmallRng) -> String {
        (0..3)
            .map(|i| {
                let noun = Self::pick(rng, Self::NOUNS);
                format!(
                    "FOCUS AREA: {} {}\nDESCRIPTION: How {} shapes the research goal.",
                    noun,
                    i + 1,
                    noun,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn review(&self, rng: &mut SmallRng, criteria: &[&str]) -> String {
        let mut lines = criteria
            .iter()
            .map(|name| {
                format!(
                    "{}: {} - {}",
                    name,
                    rng.random_range(3..=5),
                    "no substantive concerns identified",
                )
            })
            .collect::<Vec<_>>();
        lines.push("OVERALL: The hypothesis holds up under this stage.".to_string());
        lines.push("PASSED: yes".to_string());
        lines.join("\n")
    }

    fn verdict(&self, rng: &mut SmallRng) -> String {
        let winner = match rng.random_bool(0.5) {
            true => "A",
            false => "B",
        };
        format!(
            "WINNER: {}\nREASONING: Stronger testability and tighter alignment with the goal.",
            winner,
        )
    }

    fn overview(&self, rng: &mut SmallRng) -> String {
        let noun = Self::pick(rng, Self::NOUNS);
        format!(
            "SUMMARY: The strongest hypotheses converge on {} as the decisive factor.\n\
             THEMES: mechanism, intervention, measurement\n\
             NEXT EXPERIMENTS: Run the highest-ranked testability plans first.",
            noun,
        )
    }

    fn plan(&self, rng: &mut SmallRng) -> String {
        format!(
            "Objectives: clarify the stated goal. Constraints: standard lab resources. \
             Evaluation: novelty, correctness, testability. Emphasis: {}.",
            Self::pick(rng, Self::NOUNS),
        )
    }

    fn pick<'a>(rng: &mut SmallRng, options: &[&'a str]) -> &'a str {
        use rand::prelude::IndexedRandom;
        options.choose(rng).expect("non-empty")
    }

    const NOUNS: &'static [&'static str] = &[
        "microbial signaling",
        "protein misfolding",
        "metabolic flux",
        "epigenetic drift",
        "synaptic pruning",
        "immune tolerance",
    ];
    const ANGLES: &'static [&'static str] = &[
        "dose-dependent inhibition",
        "feedback amplification",
        "competitive binding",
        "phase separation",
        "selective degradation",
    ];
}

#[async_trait::async_trait]
impl Model for Scripted {
    async fn call(&self, prompt: &str) -> anyhow::Result<String> {
        Ok(self.respond(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(seed: u64) -> Scripted {
        Scripted::new(ModelConfig::default(), seed)
    }

    #[tokio::test]
    async fn same_seed_same_prompt_same_response() {
        let prompt = "Generate a hypothesis about anything.";
        let a = scripted(7).call(prompt).await.unwrap();
        let b = scripted(7).call(prompt).await.unwrap();
        assert!(a == b);
    }

    #[tokio::test]
    async fn different_seeds_diverge() {
        let prompt = "Generate a hypothesis about anything.";
        let a = scripted(7).call(prompt).await.unwrap();
        let b = scripted(8).call(prompt).await.unwrap();
        assert!(a != b);
    }

    #[tokio::test]
    async fn verdict_names_a_winner() {
        let prompt = "Compare...\nHYPOTHESIS A:\nfoo\nHYPOTHESIS B:\nbar";
        let response = scripted(1).call(prompt).await.unwrap();
        assert!(response.starts_with("WINNER: A") || response.starts_with("WINNER: B"));
    }

    #[tokio::test]
    async fn review_response_carries_verdict_line() {
        let response = scripted(1)
            .call("Perform an initial review of the following hypothesis: ...")
            .await
            .unwrap();
        assert!(response.contains("PASSED: yes"));
        assert!(response.contains("CORRECTNESS:"));
    }
}
