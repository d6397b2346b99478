use std::sync::Arc;

use wayfarer_intent::{IntentParser, IntentSource};

pub struct AppState {
    pub intent: Arc<dyn IntentSource>,
    pub tiers: Vec<String>,
}

impl AppState {
    pub fn new(parser: IntentParser) -> Self {
        let tiers = parser.tiers().into_iter().map(str::to_string).collect();

        Self {
            intent: Arc::new(parser),
            tiers,
        }
    }
}
