//! Keyword response rules for the support assistant.
//!
//! The assistant is a static responder: each rule carries a set of lowercase
//! keywords and a canned reply. Rules are checked in table order and the
//! first rule with any keyword contained in the lower-cased input wins, so a
//! question mentioning both recording and pricing gets the recording answer.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Topic a canned reply belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    /// Starting and running a screen recording.
    Recording,
    /// What the AI pipeline does to a recording.
    AiEnhancement,
    /// Plans and prices.
    Pricing,
    /// Export formats and sharing.
    Export,
}

/// One entry in the ordered rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRule {
    category: ResponseCategory,
    keywords: Vec<&'static str>,
    response: &'static str,
}

impl ResponseRule {
    /// Creates a rule. Keywords are expected in lowercase.
    pub fn new(
        category: ResponseCategory,
        keywords: impl IntoIterator<Item = &'static str>,
        response: &'static str,
    ) -> Self {
        Self {
            category,
            keywords: keywords.into_iter().collect(),
            response,
        }
    }

    pub fn category(&self) -> ResponseCategory {
        self.category
    }

    pub fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }

    pub fn response(&self) -> &'static str {
        self.response
    }

    /// Returns true if any keyword occurs in the already lower-cased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Ordered rule table plus the reply used when nothing matches.
#[derive(Debug, Clone)]
pub struct RuleBook {
    rules: Vec<ResponseRule>,
    fallback: &'static str,
}

const RECORDING_REPLY: &str = "Starting a recording is easy! 🎬\n\n\
1. Click 'Start Recording' from your dashboard\n\
2. Choose what to capture: full screen, window, or browser tab\n\
3. Toggle webcam and microphone as needed\n\
4. Hit the record button and you're live!\n\n\
Would you like me to guide you to the recording page?";

const AI_ENHANCEMENT_REPLY: &str = "Our AI enhancement is where the magic happens! ✨\n\n\
• **Script Cleanup**: Removes filler words (um, ah, like)\n\
• **Voice Generation**: Creates professional voiceovers\n\
• **Smart Chapters**: Auto-generates video chapters\n\
• **Guide Creation**: Transforms recordings into step-by-step docs\n\n\
All of this happens automatically after you finish recording!";

const PRICING_REPLY: &str = "We have flexible pricing for everyone! 💰\n\n\
**Starter (Free)**\n\
• 3 videos/month\n\
• 5 min max length\n\n\
**Pro ($29/mo)**\n\
• Unlimited videos\n\
• 30 min max length\n\
• Premium AI voices\n\n\
**Enterprise (Custom)**\n\
• Everything in Pro\n\
• Custom AI training\n\
• Dedicated support\n\n\
Want to start with our free plan?";

const EXPORT_REPLY: &str = "You have lots of export options! 📤\n\n\
**Video Formats**\n\
• MP4 (1080p, 720p, 480p)\n\
• GIF snippets\n\
• Social media formats (9:16, 1:1, 16:9)\n\n\
**Guide Formats**\n\
• Interactive HTML\n\
• PDF with branding\n\
• Markdown\n\
• Confluence-compatible\n\n\
You can also share with password-protected links!";

const FALLBACK_REPLY: &str = "Great question! 🤔 I'd be happy to help with that. \
For more specific assistance, you can:\n\n\
• Visit our Help Center for detailed guides\n\
• Contact support@creanva.com for personalized help\n\
• Join our community Discord\n\n\
Is there anything else I can help you with?";

static STANDARD_RULES: Lazy<RuleBook> = Lazy::new(|| {
    RuleBook::new(
        vec![
            ResponseRule::new(ResponseCategory::Recording, ["record", "start"], RECORDING_REPLY),
            ResponseRule::new(ResponseCategory::AiEnhancement, ["ai", "enhance"], AI_ENHANCEMENT_REPLY),
            ResponseRule::new(ResponseCategory::Pricing, ["price", "cost", "plan"], PRICING_REPLY),
            ResponseRule::new(ResponseCategory::Export, ["export", "download", "share"], EXPORT_REPLY),
        ],
        FALLBACK_REPLY,
    )
});

impl RuleBook {
    /// Creates a rule book. Rule order is match priority.
    pub fn new(rules: Vec<ResponseRule>, fallback: &'static str) -> Self {
        Self { rules, fallback }
    }

    /// The assistant's built-in rule table.
    pub fn standard() -> &'static RuleBook {
        &STANDARD_RULES
    }

    pub fn rules(&self) -> &[ResponseRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    /// Returns the first rule matching the text, if any.
    pub fn find(&self, user_text: &str) -> Option<&ResponseRule> {
        let lowered = user_text.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    /// Returns the category of the first matching rule.
    pub fn classify(&self, user_text: &str) -> Option<ResponseCategory> {
        self.find(user_text).map(ResponseRule::category)
    }

    /// Maps free text to a canned reply. Total and deterministic.
    pub fn respond(&self, user_text: &str) -> &'static str {
        self.find(user_text)
            .map(ResponseRule::response)
            .unwrap_or(self.fallback)
    }
}

/// Replies to `user_text` using the standard rule table.
///
/// Blank input is not special-cased here; callers reject it first.
pub fn respond(user_text: &str) -> String {
    RuleBook::standard().respond(user_text).to_string()
}

/// Returns which standard rule category `user_text` falls into.
pub fn classify(user_text: &str) -> Option<ResponseCategory> {
    RuleBook::standard().classify(user_text)
}
