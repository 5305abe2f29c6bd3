//! Prompt templates for the debate flow

use crate::session::value_objects::GenerationRequest;

/// Templates for generating prompts sent to the response generator
pub struct DebatePrompt;

impl DebatePrompt {
    /// System instruction that keeps the generator in character
    ///
    /// Everything persona-specific comes from the request, which the engine
    /// fills from the persona record.
    pub fn system_instruction(request: &GenerationRequest) -> String {
        let mut prompt = format!(
            r#"You are {name}. You must strictly maintain this identity and respond as if you are actually {name}.
You are engaged in a formal debate about "{topic}".
This is round {round} of {round_count}.

Your style: {style}.
{behavior}

You must respond in character, using the appropriate style, terminology, and perspective of {name}.
Never break character or acknowledge that you are an AI model."#,
            name = request.persona_name,
            topic = request.topic,
            round = request.round,
            round_count = request.round_count,
            style = request.style_descriptor,
            behavior = request.behavioral_prompt,
        );

        prompt.push_str("\n\n");
        prompt.push_str(&Self::pacing(request));
        prompt
    }

    /// Opening line sent as the first user message when the transcript
    /// starts with the agent's greeting
    pub fn opening_primer(topic: &str) -> String {
        format!(r#"Let us debate the proposition: "{}"."#, topic)
    }

    fn pacing(request: &GenerationRequest) -> String {
        match request.rounds_remaining() {
            0 => "This is the final round. Answer the last argument and deliver your closing statement."
                .to_string(),
            1 => "One round remains after this one. Start drawing your strongest points together."
                .to_string(),
            n => format!(
                "{} rounds remain after this one. Respond to the latest argument and keep the debate moving.",
                n
            ),
        }
    }
}
