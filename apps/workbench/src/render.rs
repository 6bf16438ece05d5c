//! Result rendering — a pure mapping from a generation outcome to a view
//! model, plus the terminal presentation of it.
//!
//! All number formatting is decided in the view model, so the presentation
//! layer only places strings. Quality is a one-decimal percentage, time a
//! two-decimal seconds figure, and a missing word count becomes "N/A".

use colored::Colorize;

use crate::api::types::GenerationResult;

/// What the results container shows after a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    Success {
        cover_letter: String,
        quality: String,
        keywords_found: u32,
        generation_time: String,
        word_count: String,
        fallback_used: bool,
    },
    Error {
        message: String,
    },
}

impl ResultPanel {
    pub fn success(result: &GenerationResult) -> Self {
        ResultPanel::Success {
            cover_letter: result.cover_letter.clone(),
            quality: format!("{:.1}%", result.quality_score * 100.0),
            keywords_found: result.keywords_found,
            generation_time: format!("{:.2}s", result.generation_time),
            word_count: match result.metadata.word_count {
                Some(count) => count.to_string(),
                None => "N/A".to_string(),
            },
            fallback_used: result.metadata.fallback_used,
        }
    }

    pub fn error(message: String) -> Self {
        ResultPanel::Error { message }
    }

    /// The one-line summary under a successful letter. `None` for errors.
    pub fn metadata_line(&self) -> Option<String> {
        match self {
            ResultPanel::Success {
                quality,
                keywords_found,
                generation_time,
                word_count,
                fallback_used,
                ..
            } => {
                let mut line = format!(
                    "Quality Score: {quality} | Keywords Found: {keywords_found} | \
                     Generation Time: {generation_time} | Word Count: {word_count}"
                );
                if *fallback_used {
                    line.push_str(" | Fallback Used: Yes");
                }
                Some(line)
            }
            ResultPanel::Error { .. } => None,
        }
    }
}

/// Prints a panel to the terminal. The letter body is reproduced verbatim,
/// whitespace included.
pub fn print_panel(panel: &ResultPanel) {
    match panel {
        ResultPanel::Success { cover_letter, .. } => {
            println!();
            println!("{}", "✅ Generated Cover Letter".green().bold());
            println!("{}", "─".repeat(72).dimmed());
            println!("{cover_letter}");
            println!("{}", "─".repeat(72).dimmed());
            if let Some(line) = panel.metadata_line() {
                println!("{}", line.dimmed());
            }
            println!();
        }
        ResultPanel::Error { message } => {
            println!();
            println!("{}", "❌ Error".red().bold());
            println!("{message}");
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ResultMetadata;

    fn result_fixture() -> GenerationResult {
        GenerationResult {
            cover_letter: "Dear Jane,\n\nI would love to join TechCorp.".to_string(),
            quality_score: 0.873,
            keywords_found: 7,
            generation_time: 2.145,
            metadata: ResultMetadata {
                word_count: Some(312),
                fallback_used: false,
            },
        }
    }

    #[test]
    fn test_success_panel_formats_quality_time_and_word_count() {
        let panel = ResultPanel::success(&result_fixture());
        match panel {
            ResultPanel::Success {
                quality,
                keywords_found,
                generation_time,
                word_count,
                fallback_used,
                ..
            } => {
                assert_eq!(quality, "87.3%");
                assert_eq!(keywords_found, 7);
                // 2.145's nearest double sits just above it, so two decimals
                // round up
                assert_eq!(generation_time, "2.15s");
                assert_eq!(word_count, "312");
                assert!(!fallback_used);
            }
            ResultPanel::Error { .. } => panic!("expected a success panel"),
        }
    }

    #[test]
    fn test_success_panel_placeholder_for_missing_word_count() {
        let mut result = result_fixture();
        result.metadata.word_count = None;
        let panel = ResultPanel::success(&result);
        match panel {
            ResultPanel::Success { word_count, .. } => assert_eq!(word_count, "N/A"),
            ResultPanel::Error { .. } => panic!("expected a success panel"),
        }
    }

    #[test]
    fn test_success_panel_keeps_a_zero_word_count() {
        let mut result = result_fixture();
        result.metadata.word_count = Some(0);
        let panel = ResultPanel::success(&result);
        match panel {
            ResultPanel::Success { word_count, .. } => assert_eq!(word_count, "0"),
            ResultPanel::Error { .. } => panic!("expected a success panel"),
        }
    }

    #[test]
    fn test_metadata_line_without_fallback() {
        let panel = ResultPanel::success(&result_fixture());
        assert_eq!(
            panel.metadata_line().unwrap(),
            "Quality Score: 87.3% | Keywords Found: 7 | \
             Generation Time: 2.15s | Word Count: 312"
        );
    }

    #[test]
    fn test_metadata_line_appends_fallback_indicator() {
        let mut result = result_fixture();
        result.metadata.fallback_used = true;
        let panel = ResultPanel::success(&result);
        let line = panel.metadata_line().unwrap();
        assert!(line.ends_with(" | Fallback Used: Yes"));
    }

    #[test]
    fn test_whole_percentage_keeps_one_decimal() {
        let mut result = result_fixture();
        result.quality_score = 1.0;
        let panel = ResultPanel::success(&result);
        match panel {
            ResultPanel::Success { quality, .. } => assert_eq!(quality, "100.0%"),
            ResultPanel::Error { .. } => panic!("expected a success panel"),
        }
    }

    #[test]
    fn test_error_panel_carries_the_message_and_no_metadata() {
        let panel = ResultPanel::error("model unavailable".to_string());
        assert_eq!(
            panel,
            ResultPanel::Error {
                message: "model unavailable".to_string()
            }
        );
        assert_eq!(panel.metadata_line(), None);
    }
}
