//! The external classifier boundary.
//!
//! The classifier is an opaque collaborator: it receives an encoded frame
//! and either produces a [`Classification`] or fails. Failures of any kind
//! (missing credentials, transport errors, garbage output) surface as
//! `None` and never propagate further; the next poll tick is the retry.
//!
//! Transport is deliberately not implemented here. A concrete classifier
//! sends [`CLASSIFY_PROMPT`] alongside the JPEG to a vision model and runs
//! the raw response through [`decode_classification`].

use crate::state::Mode;
use serde::Deserialize;
use std::sync::atomic::{AtomicU32, Ordering};

/// Instruction sent with each captured frame. Requests strict JSON so the
/// response can be decoded without scraping.
pub const CLASSIFY_PROMPT: &str = "\
Analyze this image from a camera facing the user.
Focus on the user's hand.
1. If the hand is OPEN (fingers splayed) or the user is making an expansive \
gesture, the state is 'CHAOS'.
2. If the hand is CLOSED (fist) or fingers are together, or no hand is \
visible, the state is 'FORMED'.
3. Estimate the center of the hand relative to the frame center: \
x (-1 left to 1 right), y (-1 bottom to 1 top).

Return purely valid JSON with no markdown formatting:
{
  \"state\": \"CHAOS\" | \"FORMED\",
  \"handX\": number,
  \"handY\": number,
  \"confidence\": number
}";

/// One classification result. Transient: consumed immediately, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub mode: Mode,
    /// Horizontal hand position, -1 (left) to 1 (right).
    pub hand_x: f32,
    /// Vertical hand position, -1 (bottom) to 1 (top).
    pub hand_y: f32,
    /// Model confidence, 0 to 1.
    pub confidence: f32,
}

/// Classifies an encoded JPEG frame.
///
/// Implementations may take unbounded time and must return `None` on any
/// failure. `Send + Sync` because classification runs off the render loop.
pub trait Classifier: Send + Sync {
    fn classify(&self, jpeg: &[u8]) -> Option<Classification>;
}

/// Wire format of the classifier response.
#[derive(Deserialize)]
struct WireClassification {
    state: String,
    #[serde(rename = "handX")]
    hand_x: f32,
    #[serde(rename = "handY")]
    hand_y: f32,
    confidence: f32,
}

/// Decode a raw classifier response defensively.
///
/// Tolerates surrounding whitespace and a markdown code fence (models add
/// one despite the prompt). Unknown states, missing fields, and non-JSON
/// all yield `None`; numeric fields are clamped to their documented ranges.
pub fn decode_classification(text: &str) -> Option<Classification> {
    let body = strip_code_fence(text.trim());

    let wire: WireClassification = serde_json::from_str(body).ok()?;
    let mode = match wire.state.as_str() {
        "CHAOS" => Mode::Chaos,
        "FORMED" => Mode::Formed,
        _ => return None,
    };

    Some(Classification {
        mode,
        hand_x: wire.hand_x.clamp(-1.0, 1.0),
        hand_y: wire.hand_y.clamp(-1.0, 1.0),
        confidence: wire.confidence.clamp(0.0, 1.0),
    })
}

/// Strip a ```...``` fence (with optional "json" tag) if the whole text is
/// wrapped in one.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Canned classifier for demos and tests: alternates FORMED and CHAOS every
/// `period` calls while sweeping the hand position in a slow circle.
pub struct ScriptedClassifier {
    period: u32,
    calls: AtomicU32,
}

impl ScriptedClassifier {
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            calls: AtomicU32::new(0),
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(&self, _jpeg: &[u8]) -> Option<Classification> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        let mode = if (n / self.period) % 2 == 0 {
            Mode::Formed
        } else {
            Mode::Chaos
        };
        let angle = n as f32 * 0.4;
        Some(Classification {
            mode,
            hand_x: angle.cos() * 0.6,
            hand_y: angle.sin() * 0.4,
            confidence: 1.0,
        })
    }
}
