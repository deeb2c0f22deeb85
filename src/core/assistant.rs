//! Flashcard assistant.
//!
//! Stands in for the model call: the response is rendered from a fixed template so the
//! same notes always produce the same five question/answer pairs.

use crate::core::error::ServiceResult;
use async_trait::async_trait;
use di::{inject, injectable};
use log::debug;
use minijinja::{Environment, context};

const FLASHCARDS_TEMPLATE_NAME: &str = "flashcards";

const FLASHCARDS_TEMPLATE: &str = "\
Q1: What is the main topic of these notes?
A1: {{ topic }}
Q2: What are the key concepts mentioned?
A2: The main concepts include studying and learning principles.
Q3: How can this information be applied?
A3: This can be applied through consistent practice and review.
Q4: What is the most important takeaway?
A4: Understanding the fundamentals is crucial for mastery.
Q5: What should be remembered for future reference?
A5: Regular review and practice are essential for retention.";

/// Number of leading words of the notes echoed back as the topic.
const TOPIC_WORDS: usize = 5;

#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Produces the raw Q/A response text for the given notes.
    async fn generate(&self, user_input: &str) -> ServiceResult<String>;
}

pub struct TemplateResponseGenerator {
    environment: Environment<'static>,
}

#[injectable(ResponseGenerator)]
impl TemplateResponseGenerator {
    #[inject]
    pub fn create() -> TemplateResponseGenerator {
        let mut environment = Environment::new();
        environment.set_trim_blocks(true);

        TemplateResponseGenerator { environment }
    }
}

#[async_trait]
impl ResponseGenerator for TemplateResponseGenerator {
    async fn generate(&self, user_input: &str) -> ServiceResult<String> {
        let topic = topic_of(user_input);
        debug!("rendering flashcards for topic {topic:?}");

        let response = self.environment.render_named_str(
            FLASHCARDS_TEMPLATE_NAME,
            FLASHCARDS_TEMPLATE,
            context! { topic => topic },
        )?;

        Ok(response)
    }
}

/// First words of the notes, split on single spaces.
pub fn topic_of(user_input: &str) -> String {
    user_input
        .split(' ')
        .take(TOPIC_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_flashcards;

    #[test]
    fn test_topic_takes_first_five_words() {
        assert_eq!(
            topic_of("Photosynthesis converts light energy into chemical energy"),
            "Photosynthesis converts light energy into"
        );
        assert_eq!(topic_of("Short notes"), "Short notes");
    }

    #[test]
    fn test_topic_splits_on_single_spaces() {
        assert_eq!(topic_of("a  b c d e f"), "a  b c d");
    }

    #[tokio::test]
    async fn test_generated_response_parses_into_five_cards() {
        let generator = TemplateResponseGenerator::create();
        let response = generator
            .generate("Mitochondria are the powerhouse of the cell")
            .await
            .unwrap();

        let cards = parse_flashcards(&response);
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].question, "What is the main topic of these notes?");
        assert_eq!(cards[0].answer, "Mitochondria are the powerhouse of");
        assert_eq!(
            cards[4].answer,
            "Regular review and practice are essential for retention."
        );
    }

    #[tokio::test]
    async fn test_generation_is_deterministic() {
        let generator = TemplateResponseGenerator::create();
        let first = generator.generate("same notes").await.unwrap();
        let second = generator.generate("same notes").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_markup_in_notes_is_not_escaped() {
        let generator = TemplateResponseGenerator::create();
        let response = generator.generate("<b>bold</b> & more").await.unwrap();
        assert!(response.contains("A1: <b>bold</b> & more"));
    }
}
