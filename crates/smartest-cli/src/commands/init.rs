//! The `smartest init` command.

use std::path::Path;

use anyhow::Result;

use smartest_core::sheet::{render_answer_sheet, render_question_sheet, QuestionEntry};
use smartest_core::Topic;

pub fn execute() -> Result<()> {
    write_if_absent(Path::new("smartest.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("sheets")?;
    write_if_absent(
        Path::new("sheets/example-questions.txt"),
        &render_question_sheet(&example_questions()),
    )?;
    write_if_absent(
        Path::new("sheets/example-key.txt"),
        &render_answer_sheet(EXAMPLE_KEY),
    )?;
    write_if_absent(
        Path::new("sheets/example-responses.txt"),
        &render_answer_sheet(EXAMPLE_RESPONSES),
    )?;

    println!("\nNext steps:");
    println!("  1. Tune the weights and keyword lists in smartest.toml");
    println!(
        "  2. Run: smartest validate --questions sheets/example-questions.txt --key sheets/example-key.txt"
    );
    println!(
        "  3. Run: smartest grade --questions sheets/example-questions.txt --key sheets/example-key.txt --responses sheets/example-responses.txt --format all"
    );

    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

fn example_questions() -> Vec<QuestionEntry> {
    vec![
        QuestionEntry::new(
            1,
            Some(Topic::NQueens),
            "What is the most suitable strategy for solving 12-Queens?",
        ),
        QuestionEntry::new(
            2,
            Some(Topic::GraphColoring),
            "Can the graph with edges A-B, A-C, A-D, B-C, B-D, C-D be colored with 3 colors?",
        ),
        QuestionEntry::new(
            3,
            Some(Topic::NashEquilibrium),
            "Player A chooses Up or Down, player B chooses Left or Right.\n\
             Payoffs: (Up, Left) = (1, 1), (Up, Right) = (0, 2), (Down, Left) = (3, 3), (Down, Right) = (2, 0).\n\
             Is there a pure Nash equilibrium? If so, name it.",
        ),
        QuestionEntry::new(
            4,
            Some(Topic::GeneralisedHanoi),
            "What is the minimum number of moves for 4 disks on 3 pegs?",
        ),
        QuestionEntry::new(
            5,
            Some(Topic::NQueens),
            "Give a solution for 8-Queens as the list of column indices per row.",
        ),
    ]
}

const EXAMPLE_KEY: &[&str] = &[
    "Backtracking with Forward Checking and MRV",
    "No. The graph needs at least 4 colors (chromatic number 4).",
    "Yes, there is a pure Nash equilibrium: (Down, Left).",
    "The minimum number of moves is 15",
    "[0, 4, 7, 5, 2, 6, 1, 3]",
];

const EXAMPLE_RESPONSES: &[&str] = &[
    "backtracking with fc",
    "no, it needs 4 colors",
    "Yes, (Left, Down)",
    "16 moves",
    "[0, 4, 7, 5, 2, 6, 1, 3]",
];

const SAMPLE_CONFIG: &str = r#"# smartest configuration
#
# Every value below is the built-in default; delete what you do not change.

[scoring.yes_no]
yes_no = 0.5
number = 0.4
text = 0.1
number_mismatch_credit = 50.0

[scoring.structured]
key_element = 0.8
text = 0.2
tuple_mismatch_score = 20.0

[scoring.numeric]
key_element = 0.8
text = 0.2

[scoring.keywords]
keyword = 0.65
text = 0.35
miss_weight = 25.0
wrong_weight_each = 10.0
wrong_weight_cap = 30.0

[scoring.feedback]
fuzzy_threshold = 0.8
mostly_present_ratio = 0.7
partially_present_ratio = 0.4

# Replace the built-in keyword list of a topic (see `smartest topics`).
[keywords]
# minimax = ["minimax", "alfa-beta", "pruning", "leaf nodes", "root value"]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses_to_defaults() {
        let config =
            smartest_core::config::parse_config_str(SAMPLE_CONFIG, Path::new("smartest.toml"))
                .unwrap();
        assert_eq!(config.scoring, smartest_core::ScoringConfig::default());
        assert!(config.keywords.is_empty());
    }

    #[test]
    fn example_sheets_line_up() {
        assert_eq!(example_questions().len(), EXAMPLE_KEY.len());
        assert_eq!(EXAMPLE_KEY.len(), EXAMPLE_RESPONSES.len());
    }
}
