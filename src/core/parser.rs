//! Line-oriented Q/A parser for generated responses.
//!
//! Grammar, applied to each line as-is (no leading trim):
//!
//! - a line starting with `Q` that contains `:` starts a new question. The text after the
//!   first colon, trimmed, becomes the question and the pending answer is cleared. The
//!   previous pair is emitted first if both its parts are non-empty.
//! - a line starting with `A` that contains `:` sets the pending answer to the text after
//!   the first colon, trimmed. A later answer line replaces an earlier one.
//! - every other line is ignored.
//!
//! At the end of input the pending pair is emitted if both parts are non-empty, so a
//! question without an answer is dropped.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

pub fn parse_flashcards(response: &str) -> Vec<QuestionAnswer> {
    let mut flashcards = Vec::new();
    let mut question = String::new();
    let mut answer = String::new();

    for line in response.split('\n') {
        if line.starts_with('Q') {
            if let Some((_, rest)) = line.split_once(':') {
                flush(&mut flashcards, &question, &answer);
                question = rest.trim().to_owned();
                answer.clear();
            }
        } else if line.starts_with('A') {
            if let Some((_, rest)) = line.split_once(':') {
                answer = rest.trim().to_owned();
            }
        }
    }

    flush(&mut flashcards, &question, &answer);
    flashcards
}

fn flush(flashcards: &mut Vec<QuestionAnswer>, question: &str, answer: &str) {
    if !question.is_empty() && !answer.is_empty() {
        flashcards.push(QuestionAnswer {
            question: question.to_owned(),
            answer: answer.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(question: &str, answer: &str) -> QuestionAnswer {
        QuestionAnswer {
            question: question.to_owned(),
            answer: answer.to_owned(),
        }
    }

    #[test]
    fn test_well_formed_pairs_in_source_order() {
        let response = "Q1: First?\nA1: One.\nQ2: Second?\nA2: Two.\nQ3: Third?\nA3: Three.";
        assert_eq!(
            parse_flashcards(response),
            vec![
                pair("First?", "One."),
                pair("Second?", "Two."),
                pair("Third?", "Three."),
            ]
        );
    }

    #[test]
    fn test_dangling_question_is_dropped() {
        let response = "Q1: Topic?\nA1: Studying.\nQ2: dangling?";
        assert_eq!(parse_flashcards(response), vec![pair("Topic?", "Studying.")]);
    }

    #[test]
    fn test_text_after_first_colon_keeps_later_colons() {
        let response = "Q: Ratio of 1:2?\nA: It is 1:2 exactly";
        assert_eq!(
            parse_flashcards(response),
            vec![pair("Ratio of 1:2?", "It is 1:2 exactly")]
        );
    }

    #[test]
    fn test_unrelated_lines_are_ignored() {
        let response = "Here are your cards\n\nQ1: What?\nnoise line\nA1: That.\n- done";
        assert_eq!(parse_flashcards(response), vec![pair("What?", "That.")]);
    }

    #[test]
    fn test_lines_without_colon_do_not_count() {
        let response = "Q1 What?\nA1 That.\nQuestion: Real?\nAnswer: Yes.";
        assert_eq!(parse_flashcards(response), vec![pair("Real?", "Yes.")]);
    }

    #[test]
    fn test_indented_lines_are_ignored() {
        let response = "  Q1: Hidden?\n  A1: Hidden.";
        assert!(parse_flashcards(response).is_empty());
    }

    #[test]
    fn test_last_answer_wins() {
        let response = "Q1: Which?\nA1: first\nA1: second";
        assert_eq!(parse_flashcards(response), vec![pair("Which?", "second")]);
    }

    #[test]
    fn test_question_and_answer_on_one_line_is_a_question_only() {
        let response = "Q1: What is the topic? A1: Notes";
        assert!(parse_flashcards(response).is_empty());
    }

    #[test]
    fn test_answer_before_any_question_is_discarded_by_next_question() {
        let response = "A0: orphan\nQ1: Real?\nA1: Yes.";
        assert_eq!(parse_flashcards(response), vec![pair("Real?", "Yes.")]);
    }

    #[test]
    fn test_empty_question_text_is_dropped() {
        let response = "Q1:   \nA1: answer";
        assert!(parse_flashcards(response).is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let response = "Q1: First?\r\nA1: One.\r\n";
        assert_eq!(parse_flashcards(response), vec![pair("First?", "One.")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_flashcards("").is_empty());
    }
}
