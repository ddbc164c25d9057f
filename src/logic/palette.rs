//! Shared color palette for the view model and the exported report.

use serde::Serialize;

use super::analysis::ContentKind;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to 0.0-1.0 (PDF color operators)
    pub fn unit(&self) -> [f32; 3] {
        [self.0 as f32 / 255.0, self.1 as f32 / 255.0, self.2 as f32 / 255.0]
    }
}

pub const WARNING: Rgb = Rgb(239, 68, 68);
pub const SUCCESS: Rgb = Rgb(34, 197, 94);
pub const ACCENT: Rgb = Rgb(251, 146, 60);
pub const NEUTRAL: Rgb = Rgb(100, 116, 139);

pub const ORANGE: Rgb = Rgb(234, 88, 12);
pub const YELLOW: Rgb = Rgb(202, 138, 4);

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const TEXT_MUTED: Rgb = Rgb(80, 80, 80);
pub const FOOTER_TEXT: Rgb = Rgb(100, 100, 100);
pub const RULE: Rgb = Rgb(200, 200, 200);
pub const GRID: Rgb = Rgb(220, 220, 220);
pub const CARD_FILL: Rgb = Rgb(245, 247, 250);
pub const STRIPE_FILL: Rgb = Rgb(248, 250, 252);
pub const RECOMMENDATION_FILL: Rgb = Rgb(254, 249, 195);

/// Report theme color per content type
pub fn theme(kind: ContentKind) -> Rgb {
    match kind {
        ContentKind::Email => Rgb(37, 99, 235),
        ContentKind::Sms => Rgb(147, 51, 234),
        ContentKind::Url => ORANGE,
    }
}

/// Verdict color: warning for phishing, success otherwise
pub fn verdict(is_phishing: bool) -> Rgb {
    if is_phishing { WARNING } else { SUCCESS }
}
