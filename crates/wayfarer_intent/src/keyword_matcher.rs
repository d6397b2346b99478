use async_trait::async_trait;
use wayfarer_core::{
    RoutingProfile,
    route_params::{ROAD_CLASS_HIGHWAY, ROAD_CLASS_TOLL},
};

use crate::{
    error::IntentError,
    intent::{IntentContext, RouteIntent},
    strategy::IntentStrategy,
};

pub const GENERIC_EXPLANATION: &str =
    "Looking for alternative routes based on your request";

#[derive(Debug, Clone, Copy)]
enum RuleEffect {
    Avoid(&'static str),
    Profile(RoutingProfile),
    NoChange,
}

struct KeywordRule {
    phrases: &'static [&'static str],
    effect: RuleEffect,
    explanation: &'static str,
}

/// Checked in order, the first rule with a matching phrase wins.
const RULES: [KeywordRule; 6] = [
    KeywordRule {
        phrases: &["scenic", "scenery"],
        effect: RuleEffect::Avoid(ROAD_CLASS_HIGHWAY),
        explanation: "Scenic backroads, avoiding highways",
    },
    KeywordRule {
        phrases: &["avoid highway", "no highway"],
        effect: RuleEffect::Avoid(ROAD_CLASS_HIGHWAY),
        explanation: "Avoiding highways",
    },
    KeywordRule {
        phrases: &["avoid toll"],
        effect: RuleEffect::Avoid(ROAD_CLASS_TOLL),
        explanation: "Avoiding toll roads",
    },
    KeywordRule {
        phrases: &["fastest", "quickest"],
        effect: RuleEffect::Profile(RoutingProfile::DrivingTraffic),
        explanation: "Using live traffic to find the fastest route",
    },
    KeywordRule {
        phrases: &["shortest"],
        effect: RuleEffect::Profile(RoutingProfile::Driving),
        explanation: "Finding the shortest driving route",
    },
    KeywordRule {
        phrases: &["alternative", "different"],
        effect: RuleEffect::NoChange,
        explanation: "Looking for alternative routes",
    },
];

/// Rule-based tier. Needs no network and never fails, so it is always the
/// last tier of the chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    pub fn matches(&self, utterance: &str, context: &IntentContext) -> RouteIntent {
        let utterance = utterance.to_lowercase();
        let mut params = context.base_params();

        let rule = RULES
            .iter()
            .find(|rule| rule.phrases.iter().any(|phrase| utterance.contains(phrase)));

        let Some(rule) = rule else {
            return RouteIntent {
                params,
                explanation: GENERIC_EXPLANATION.to_string(),
            };
        };

        match rule.effect {
            RuleEffect::Avoid(road_class) => {
                params.avoid.insert(road_class.to_string());
            }
            RuleEffect::Profile(profile) => params.profile = profile,
            RuleEffect::NoChange => {}
        }

        RouteIntent {
            params,
            explanation: rule.explanation.to_string(),
        }
    }
}

#[async_trait]
impl IntentStrategy for KeywordMatcher {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn parse(
        &self,
        utterance: &str,
        context: &IntentContext,
    ) -> Result<RouteIntent, IntentError> {
        Ok(self.matches(utterance, context))
    }
}
