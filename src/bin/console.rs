//! Console onboarding bot
//!
//! A stdin/stdout host around the dialog engine: one line is one turn.
//! Say "cancel" or "help" mid-dialog to exercise the interruption filter;
//! EOF (ctrl-d) exits.

use cascade::dialog::{DialogDescriptor, PromptStep, Step, Validator};
use cascade::recognizer::KeywordRecognizer;
use cascade::registry::DialogRegistry;
use cascade::runtime::{DialogService, MemoryStore};
use cascade::Activity;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn onboarding() -> Result<DialogRegistry, cascade::RegistryError> {
    let onboarding = DialogDescriptor::new(
        "onboarding",
        vec![
            Step::Prompt(
                PromptStep::new("name", "What's your name?")
                    .with_validator(Validator::MinLength(2))
                    .with_retry_prompt("Names need at least two characters. What's your name?")
                    .with_max_retries(3),
            ),
            Step::Prompt(
                PromptStep::new("email", "Thanks {name}. What's your email?")
                    .with_validator(Validator::pattern(r"^\S+@\S+\.\S+$")?)
                    .with_retry_prompt("That doesn't look like an email address. Try again?")
                    .with_max_retries(3),
            ),
            Step::Prompt(PromptStep::new("location", "And where are you located?")),
            Step::say("All set, {name}! I'll reach you at {email} with updates for {location}."),
        ],
    );
    DialogRegistry::builder().register(onboarding).build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cascade=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = onboarding()?;
    let recognizer = Arc::new(
        KeywordRecognizer::new()
            .map("never mind", "Cancel")
            .map("start over", "Cancel"),
    );
    let service = DialogService::new(Arc::new(registry), "onboarding", MemoryStore::new())
        .with_recognizer(recognizer)
        .with_welcome("Hi! I can get you onboarded. Say anything to begin.");

    let conv_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conv_id = %conv_id, "console conversation started");

    for reply in service
        .process(&conv_id, &Activity::conversation_update(vec!["you".to_string()]))
        .await?
    {
        if let Some(text) = reply.text() {
            println!("bot> {text}");
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        for reply in service.process(&conv_id, &Activity::message(line)).await? {
            if let Some(text) = reply.text() {
                println!("bot> {text}");
            }
        }
    }

    Ok(())
}
