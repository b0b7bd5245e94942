//! Property-based tests for the turn dispatcher
//!
//! These verify the dispatcher's invariants across generated dialogs and
//! input sequences.

use super::descriptor::{DialogDescriptor, PromptStep, Step, Validator};
use super::interpreter::run_turn;
use super::stack::ConversationState;
use super::turn::{TurnInput, TurnStatus};
use crate::interruption::InterruptionPolicy;
use crate::registry::DialogRegistry;
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// A waterfall of `n` unconstrained prompts.
fn waterfall(n: usize) -> DialogRegistry {
    let steps = (0..n)
        .map(|i| Step::Prompt(PromptStep::new(format!("slot{i}"), format!("Question {i}?"))))
        .collect();
    DialogRegistry::builder()
        .register(DialogDescriptor::new("root", steps))
        .build()
        .expect("registry")
}

/// A chain of dialogs `d0 -> d1 -> ... -> d{depth-1}`, where each dialog
/// begins the next and the innermost one prompts. After the kickoff turn
/// the stack holds `depth` frames.
fn nested(depth: usize) -> DialogRegistry {
    let mut builder = DialogRegistry::builder();
    for i in 0..depth {
        let steps = if i + 1 < depth {
            vec![Step::begin(format!("d{}", i + 1), Some("inner"))]
        } else {
            vec![Step::Prompt(PromptStep::new("leaf", "Deepest question?"))]
        };
        builder = builder.register(DialogDescriptor::new(format!("d{i}"), steps));
    }
    builder.build().expect("registry")
}

fn arb_valid_input() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,20}".prop_filter("interruption keywords are not plain answers", |s| {
        let t = s.trim().to_lowercase();
        t != "cancel" && t != "quit" && t != "help" && t != "?"
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    // A waterfall of n prompts completes after exactly n input turns.
    #[test]
    fn prop_waterfall_completes_in_len_steps_turns(
        n in 1usize..6,
        inputs in proptest::collection::vec(arb_valid_input(), 6),
    ) {
        let registry = waterfall(n);
        let policy = InterruptionPolicy::default();
        let mut state = ConversationState::default();

        let kickoff = run_turn(&registry, &policy, "root", &state, &TurnInput::message("hi"))
            .expect("kickoff");
        prop_assert_eq!(kickoff.result.status, TurnStatus::Waiting);
        state = kickoff.state;

        for (i, input) in inputs.iter().take(n).enumerate() {
            let outcome = run_turn(&registry, &policy, "root", &state, &TurnInput::message(input))
                .expect("turn");
            state = outcome.state;
            if i + 1 < n {
                prop_assert_eq!(outcome.result.status, TurnStatus::Waiting);
            } else {
                prop_assert_eq!(outcome.result.status, TurnStatus::Complete);
                prop_assert!(state.stack.is_empty());
            }
        }
    }

    // Cancel empties the stack regardless of prior depth.
    #[test]
    fn prop_cancel_always_empties_stack(depth in 1usize..6) {
        let registry = nested(depth);
        let policy = InterruptionPolicy::default();

        let kickoff = run_turn(
            &registry,
            &policy,
            "d0",
            &ConversationState::default(),
            &TurnInput::message("hi"),
        )
        .expect("kickoff");
        prop_assert_eq!(kickoff.state.stack.depth(), depth);

        let cancelled = run_turn(
            &registry,
            &policy,
            "d0",
            &kickoff.state,
            &TurnInput::message("cancel"),
        )
        .expect("cancel");
        prop_assert_eq!(cancelled.result.status, TurnStatus::Cancelled);
        prop_assert!(cancelled.state.stack.is_empty());
    }

    // Invalid input never advances the step index, and each invalid
    // attempt produces exactly one retry message.
    #[test]
    fn prop_invalid_input_never_advances(attempts in 1usize..5) {
        let registry = DialogRegistry::builder()
            .register(DialogDescriptor::new(
                "root",
                vec![Step::Prompt(
                    PromptStep::new("age", "How old are you?")
                        .with_validator(Validator::Number { min: Some(0.0), max: None }),
                )],
            ))
            .build()
            .expect("registry");
        let policy = InterruptionPolicy::default();

        let mut state = run_turn(
            &registry,
            &policy,
            "root",
            &ConversationState::default(),
            &TurnInput::message("hi"),
        )
        .expect("kickoff")
        .state;

        for attempt in 1..=attempts {
            let outcome = run_turn(
                &registry,
                &policy,
                "root",
                &state,
                &TurnInput::message("not a number"),
            )
            .expect("turn");
            prop_assert_eq!(outcome.replies.len(), 1);
            prop_assert_eq!(outcome.state.stack.top().map(|f| f.step_index), Some(0));
            prop_assert_eq!(outcome.state.stack.top().map(|f| f.retries), Some(attempt as u32));
            state = outcome.state;
        }

        // A valid reply still completes the dialog afterwards.
        let outcome = run_turn(&registry, &policy, "root", &state, &TurnInput::message("30"))
            .expect("turn");
        prop_assert_eq!(outcome.result.status, TurnStatus::Complete);
    }

    // Help never mutates the waterfall position.
    #[test]
    fn prop_help_preserves_position(n in 1usize..6, helps in 1usize..4) {
        let registry = waterfall(n);
        let policy = InterruptionPolicy::default();

        let mut state = run_turn(
            &registry,
            &policy,
            "root",
            &ConversationState::default(),
            &TurnInput::message("hi"),
        )
        .expect("kickoff")
        .state;
        let before = state.clone();

        for _ in 0..helps {
            let outcome = run_turn(&registry, &policy, "root", &state, &TurnInput::message("help"))
                .expect("help");
            prop_assert_eq!(outcome.result.status, TurnStatus::Waiting);
            state = outcome.state;
        }
        prop_assert_eq!(state, before);
    }
}
