use crate::stage::Stage;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

pub type NarrationFuture<'a> = Pin<Box<dyn Future<Output = String> + 'a>>;

/// Source of the short paragraph shown for a stage.
///
/// Implementations must always resolve with non-empty text: any failure is
/// handled inside the provider (see [`or_fallback`]). The session performs no
/// retries.
pub trait Narrator {
    fn narrate(&self, stage: Stage) -> NarrationFuture<'_>;
}

/// Why a generated paragraph could not be used.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("no narration API key configured")]
    Unconfigured,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("narration service returned HTTP {0}")]
    Status(u16),
    #[error("malformed narration response: {0}")]
    Malformed(String),
    #[error("narration service returned no text")]
    Empty,
}

/// Shared system prompt for every scene.
pub const BASE_PROMPT: &str = "You are the narrator of a cinematic, mysterious, and emotional \
interactive story akin to the show 'Dark' or '1899'. The user is a female protagonist named \
\"The Guardian\". She is traveling through broken timelines to restore reality before the New \
Year begins. Write a short, poetic, deeply emotional, and mysterious paragraph (max 60 words) \
setting the scene. Style: Glassy, Neon, Time-bending, Ethereal.";

/// Scene direction per stage; the intro has none and always uses its fixed line.
pub fn scene_prompt(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Intro => None,
        Stage::Chapter1 => Some(
            "Scene: She arrives at a frozen clock tower floating in a purple void. Time has \
             stopped. She needs to solve a riddle to restart the gears.",
        ),
        Stage::Chapter2 => Some(
            "Scene: The clock ticks, but the path ahead is twisted. She enters a neon labyrinth \
             of light and shadow. She must navigate the confusion to find clarity.",
        ),
        Stage::Chapter3 => Some(
            "Scene: The labyrinth dissolves. Now she sees floating shards of memories: stickers, \
             emojis, moments. She must match them to make the timeline whole again.",
        ),
        Stage::Finale => Some(
            "Scene: She has succeeded. The universe is whole. The sky explodes into fireworks. \
             It is a moment of pure joy, love, and a fresh start for the New Year.",
        ),
    }
}

/// Full prompt sent to the text generator, if the stage has a scene.
pub fn prompt_for(stage: Stage) -> Option<String> {
    scene_prompt(stage).map(|scene| format!("{BASE_PROMPT}\n\n{scene}"))
}

/// Fixed text used whenever generation is unavailable.
pub fn fallback_text(stage: Stage) -> &'static str {
    match stage {
        Stage::Intro => "Time waits for no one...",
        Stage::Chapter1 => {
            "The Grand Clock stands frozen in a sea of violet stars. The gears screech in \
             silence. Only logic can oil these rusted mechanisms of destiny."
        }
        Stage::Chapter2 => {
            "The path fractures into neon splinters. A labyrinth of light emerges from the \
             darkness. Trust your intuition to find the way through the chaos."
        }
        Stage::Chapter3 => {
            "Reality is putting itself back together, piece by piece. But the memories are \
             scattered like stardust. Find the pairs to bind the timeline."
        }
        Stage::Finale => {
            "The gears align. The timeline heals. A brilliant light consumes the darkness, \
             heralding a beginning full of hope and magic."
        }
    }
}

/// Collapse a generation attempt into displayable text.
pub fn or_fallback(stage: Stage, result: Result<String, NarrationError>) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            log::warn!("[narration] {}: {}", stage, NarrationError::Empty);
            fallback_text(stage).to_string()
        }
        Err(NarrationError::Unconfigured) => fallback_text(stage).to_string(),
        Err(e) => {
            log::warn!("[narration] {}: {}", stage, e);
            fallback_text(stage).to_string()
        }
    }
}

/// Offline narrator: resolves immediately with the fixed text.
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackNarrator;

impl Narrator for FallbackNarrator {
    fn narrate(&self, stage: Stage) -> NarrationFuture<'_> {
        Box::pin(std::future::ready(fallback_text(stage).to_string()))
    }
}
