// Unit tests for argument parsing and action selection

use crate::args::{Action, Args};
use crate::error::ConsultError;

use clap::Parser;

/// **VALUE**: Verifies the trailing question words are joined into one query.
///
/// **WHY THIS MATTERS**: Users type questions unquoted on the command line.
///
/// **BUG THIS CATCHES**: Would catch only the first word being sent to the model.
#[test]
fn given_unquoted_question_when_parsed_then_words_joined() {
    // GIVEN: A persona and a multi-word question
    let args = Args::try_parse_from([
        "consult",
        "--persona",
        "career-coach",
        "Should",
        "I",
        "change",
        "jobs?",
    ])
    .unwrap();

    // WHEN: Selecting the action
    let action = args.action().unwrap();

    // THEN: One joined question
    assert_eq!(
        action,
        Action::Ask {
            persona: "career-coach".to_string(),
            question: "Should I change jobs?".to_string(),
        }
    );
}

/// **VALUE**: Verifies `--persona` without a question still dispatches.
///
/// **WHY THIS MATTERS**: The empty-query rejection belongs to the service, so the user
/// gets the same category and hint as any other front end would show.
///
/// **BUG THIS CATCHES**: Would catch clap requiring the positional argument.
#[test]
fn given_persona_without_question_when_parsed_then_empty_question() {
    let args = Args::try_parse_from(["consult", "-p", "it-consultant"]).unwrap();

    assert_eq!(
        args.action().unwrap(),
        Action::Ask {
            persona: "it-consultant".to_string(),
            question: String::new(),
        }
    );
}

/// **VALUE**: Verifies no action is a usage error and conflicting actions are rejected.
///
/// **BUG THIS CATCHES**: Would catch `--list --persona x` silently ignoring one flag.
#[test]
fn given_no_or_conflicting_actions_when_parsed_then_rejected() {
    let args = Args::try_parse_from(["consult", "--verbose"]).unwrap();
    assert!(matches!(args.action(), Err(ConsultError::Usage { .. })));

    assert!(Args::try_parse_from(["consult", "--list", "--persona", "career-coach"]).is_err());
    assert!(Args::try_parse_from(["consult", "--status", "--persona", "career-coach"]).is_err());
}

#[test]
fn given_list_or_status_when_parsed_then_matching_action() {
    let list = Args::try_parse_from(["consult", "--list"]).unwrap();
    let status = Args::try_parse_from(["consult", "--status", "--config", "/tmp/g.toml"]).unwrap();

    assert_eq!(list.action().unwrap(), Action::List);
    assert_eq!(status.action().unwrap(), Action::Status);
    assert_eq!(
        status.config.as_deref(),
        Some(std::path::Path::new("/tmp/g.toml"))
    );
}
