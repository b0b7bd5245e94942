//! The turn dispatcher
//!
//! `run_turn` is pure: given the registry, the interruption policy, the
//! prior conversation state, and one inbound turn, it produces the next
//! state, the replies to send, and the turn's result. All I/O (delivery,
//! persistence, intent recognition) lives in the runtime shell.
//!
//! Suspension is explicit state: a conversation waiting for input is a
//! stack whose top frame is parked on a prompt step. There are no
//! continuations and nothing blocks between turns.

use crate::dialog::descriptor::Step;
use crate::dialog::stack::{ConversationState, StackFrame};
use crate::dialog::turn::{TurnInput, TurnOutcome, TurnResult};
use crate::error::DialogError;
use crate::interruption::{Interruption, InterruptionPolicy};
use crate::registry::DialogRegistry;
use serde_json::{Map, Value};

/// Bag key under which the root dialog's completion payload is recorded.
pub const LAST_RESULT_KEY: &str = "last_result";

/// Process one inbound turn to completion: run the interruption filter,
/// resume the active prompt if one is waiting, then execute every ready
/// step until the conversation suspends, completes, or is cancelled.
pub fn run_turn(
    registry: &DialogRegistry,
    policy: &InterruptionPolicy,
    root: &str,
    state: &ConversationState,
    input: &TurnInput,
) -> Result<TurnOutcome, DialogError> {
    let mut state = state.clone();
    let mut replies = Vec::new();

    // Interruptions are checked before any step-specific validation and
    // always short-circuit.
    if let Some(kind) = policy.check(input) {
        return interrupt(registry, policy, state, replies, kind);
    }

    if state.stack.is_empty() {
        state.stack.push(StackFrame::new(root));
    } else {
        match resume_prompt(registry, policy, &mut state, &mut replies, input)? {
            Resumed::Advanced => {}
            Resumed::Suspended(result) => {
                return Ok(TurnOutcome {
                    state,
                    replies,
                    result,
                })
            }
        }
    }

    let result = run_ready_steps(registry, &mut state, &mut replies)?;
    Ok(TurnOutcome {
        state,
        replies,
        result,
    })
}

fn interrupt(
    registry: &DialogRegistry,
    policy: &InterruptionPolicy,
    mut state: ConversationState,
    mut replies: Vec<String>,
    kind: Interruption,
) -> Result<TurnOutcome, DialogError> {
    let result = match kind {
        Interruption::Cancel => {
            if state.stack.is_empty() {
                replies.push(policy.nothing_to_cancel_message.clone());
                TurnResult::waiting()
            } else {
                state.stack.cancel_all();
                replies.push(policy.cancel_message.clone());
                TurnResult::cancelled()
            }
        }
        Interruption::Help => {
            replies.push(policy.help_message.clone());
            // Re-emit the active prompt so the interrupted dialog resumes
            // exactly where it left off.
            if let Some(frame) = state.stack.top() {
                let descriptor = registry
                    .get(&frame.dialog_id)
                    .ok_or_else(|| DialogError::UnknownDialog(frame.dialog_id.clone()))?;
                if let Some(Step::Prompt(prompt)) = descriptor.step(frame.step_index) {
                    replies.push(render(&prompt.prompt, &frame.locals)?);
                }
            }
            TurnResult::waiting()
        }
    };
    Ok(TurnOutcome {
        state,
        replies,
        result,
    })
}

enum Resumed {
    /// Input validated; the frame advanced and ready steps may run.
    Advanced,
    /// The turn ended inside the prompt (retry or retry exhaustion).
    Suspended(TurnResult),
}

/// Feed the turn's text to the prompt the conversation is parked on.
fn resume_prompt(
    registry: &DialogRegistry,
    policy: &InterruptionPolicy,
    state: &mut ConversationState,
    replies: &mut Vec<String>,
    input: &TurnInput,
) -> Result<Resumed, DialogError> {
    let (dialog_id, step_index) = match state.stack.top() {
        Some(frame) => (frame.dialog_id.clone(), frame.step_index),
        None => return Ok(Resumed::Advanced),
    };
    let descriptor = registry
        .get(&dialog_id)
        .ok_or_else(|| DialogError::UnknownDialog(dialog_id.clone()))?;
    let Some(Step::Prompt(prompt)) = descriptor.step(step_index) else {
        return Err(DialogError::CorruptFrame {
            dialog: dialog_id,
            step: step_index,
        });
    };

    match prompt.validator.validate(&input.text) {
        Some(value) => {
            if let Some(frame) = state.stack.top_mut() {
                frame.locals.insert(prompt.slot.clone(), value);
                frame.retries = 0;
                frame.step_index += 1;
            }
            Ok(Resumed::Advanced)
        }
        None => {
            let attempts = match state.stack.top_mut() {
                Some(frame) => {
                    frame.retries += 1;
                    frame.retries
                }
                None => 0,
            };
            if prompt.max_retries.is_some_and(|max| attempts > max) {
                // Repeated failure becomes a cancelled result; the whole
                // stack unwinds, matching keyword cancellation.
                state.stack.cancel_all();
                replies.push(policy.retries_exhausted_message.clone());
                return Ok(Resumed::Suspended(TurnResult::cancelled()));
            }
            let locals = state.stack.top().map(|f| &f.locals);
            let retry_text = prompt.retry_prompt.as_deref().unwrap_or(&prompt.prompt);
            replies.push(render_with(retry_text, locals)?);
            Ok(Resumed::Suspended(TurnResult::waiting()))
        }
    }
}

/// Execute non-suspending steps until the conversation suspends on a
/// prompt or the stack drains.
fn run_ready_steps(
    registry: &DialogRegistry,
    state: &mut ConversationState,
    replies: &mut Vec<String>,
) -> Result<TurnResult, DialogError> {
    loop {
        let (dialog_id, step_index) = match state.stack.top() {
            Some(frame) => (frame.dialog_id.clone(), frame.step_index),
            None => return Ok(TurnResult::complete(None)),
        };
        let descriptor = registry
            .get(&dialog_id)
            .ok_or_else(|| DialogError::UnknownDialog(dialog_id.clone()))?;

        match descriptor.step(step_index) {
            // Running past the last step is an implicit End.
            None | Some(Step::End) => {
                let Some(frame) = state.stack.pop() else {
                    return Ok(TurnResult::complete(None));
                };
                let payload = Value::Object(frame.locals);
                match deliver_to_parent(registry, state, payload)? {
                    Some(result) => return Ok(result),
                    None => continue,
                }
            }
            Some(Step::Say(text)) => {
                if let Some(frame) = state.stack.top_mut() {
                    replies.push(render(text, &frame.locals)?);
                    frame.step_index += 1;
                }
            }
            Some(Step::Prompt(prompt)) => {
                if let Some(frame) = state.stack.top() {
                    replies.push(render(&prompt.prompt, &frame.locals)?);
                }
                return Ok(TurnResult::waiting());
            }
            Some(Step::Begin { dialog, .. }) => {
                if !registry.contains(dialog) {
                    return Err(DialogError::UnknownDialog(dialog.clone()));
                }
                // The parent stays parked on this Begin step; it advances
                // when the child pops and delivers its payload.
                state.stack.push(StackFrame::new(dialog.clone()));
            }
        }
    }
}

/// Hand a finished frame's payload to its parent, or complete the
/// conversation if the root just ended.
fn deliver_to_parent(
    registry: &DialogRegistry,
    state: &mut ConversationState,
    payload: Value,
) -> Result<Option<TurnResult>, DialogError> {
    let (dialog_id, step_index) = match state.stack.top() {
        Some(parent) => (parent.dialog_id.clone(), parent.step_index),
        None => {
            state.bag.insert(LAST_RESULT_KEY.to_string(), payload.clone());
            return Ok(Some(TurnResult::complete(Some(payload))));
        }
    };
    let descriptor = registry
        .get(&dialog_id)
        .ok_or_else(|| DialogError::UnknownDialog(dialog_id.clone()))?;
    let Some(Step::Begin { result_slot, .. }) = descriptor.step(step_index) else {
        // A child can only have been pushed by a Begin step.
        return Err(DialogError::CorruptFrame {
            dialog: dialog_id,
            step: step_index,
        });
    };
    let result_slot = result_slot.clone();
    if let Some(parent) = state.stack.top_mut() {
        if let Some(slot) = result_slot {
            parent.locals.insert(slot, payload);
        }
        parent.step_index += 1;
    }
    Ok(None)
}

/// Interpolate `{slot}` references from the frame's collected values.
fn render(template: &str, locals: &Map<String, Value>) -> Result<String, DialogError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let slot = &after[..end];
                let value = locals.get(slot).ok_or_else(|| DialogError::MissingSlot {
                    slot: slot.to_string(),
                })?;
                out.push_str(&value_text(value));
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn render_with(
    template: &str,
    locals: Option<&Map<String, Value>>,
) -> Result<String, DialogError> {
    match locals {
        Some(locals) => render(template, locals),
        None => render(template, &Map::new()),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
