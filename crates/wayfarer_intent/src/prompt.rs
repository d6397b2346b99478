use wayfarer_core::route_params::ROAD_CLASSES;

use crate::{intent::IntentContext, reply::LlmIntentReply};

fn reply_schema() -> String {
    let schema = schemars::schema_for!(LlmIntentReply);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// System prompt for the primary (OpenAI-compatible) tier.
pub fn openai_system_prompt() -> String {
    format!(
        "You are the route assistant of a car navigation system. The driver asks, in their own \
words, to change the current route. Translate the request into routing constraints.\n\n\
Rules:\n\
- \"avoid\" may only contain these road classes: {}.\n\
- \"profile\" is one of: driving, walking, cycling, driving-traffic. Use driving-traffic when \
the driver wants the fastest route, driving for the shortest.\n\
- \"waypoints\" are [longitude, latitude] pairs between origin and destination, only when the \
driver names a place to pass through and you know its position.\n\
- Return the complete set of constraints that should apply after the change, starting from the \
current ones.\n\
- \"explanation\" is one short, friendly sentence for the driver.\n\n\
Reply with a single JSON object matching this schema:\n{}",
        ROAD_CLASSES.join(", "),
        reply_schema()
    )
}

/// System prompt for the secondary (Anthropic-compatible) tier.
pub fn anthropic_system_prompt() -> String {
    format!(
        "You convert a driver's spoken request about their route into parameters for a routing \
engine.\n\n\
Available road classes to avoid: {}. Never invent other classes.\n\
Available travel profiles: driving (shortest), driving-traffic (fastest, uses live traffic), \
walking, cycling.\n\
Coordinates are always written longitude first.\n\
Keep constraints that are already active unless the driver asks to drop them. Leave a field out \
when the request does not touch it.\n\n\
Output a JSON object with this schema:\n{}",
        ROAD_CLASSES.join(", "),
        reply_schema()
    )
}

pub fn user_prompt(utterance: &str, context: &IntentContext) -> String {
    let current = serde_json::to_string(&context.base_params()).unwrap_or_default();

    format!(
        "Driver request: \"{}\"\n\
Origin [lon, lat]: [{}, {}]\n\
Destination [lon, lat]: [{}, {}]\n\
Current constraints: {}",
        utterance.trim(),
        context.origin.lon(),
        context.origin.lat(),
        context.destination.lon(),
        context.destination.lat(),
        current
    )
}
