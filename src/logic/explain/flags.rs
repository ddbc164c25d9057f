//! Catalog of the named email indicators carried in `red_flags_summary`.

/// Grouping shown in the indicator tag column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagCategory {
    Sender,
    Content,
    Link,
    Attachment,
}

impl FlagCategory {
    pub fn tag(&self) -> &'static str {
        match self {
            FlagCategory::Sender => "SENDER",
            FlagCategory::Content => "CONTENT",
            FlagCategory::Link => "LINK",
            FlagCategory::Attachment => "ATTACHMENT",
        }
    }
}

pub struct FlagDef {
    pub key: &'static str,
    pub description: &'static str,
    pub category: FlagCategory,
}

const fn flag(key: &'static str, description: &'static str, category: FlagCategory) -> FlagDef {
    FlagDef { key, description, category }
}

/// Key holding matched urgency phrases instead of a boolean
pub const URGENCY_PHRASES_KEY: &str = "urgency_phrases";

/// Flag the urgency phrases attach to
pub const URGENCY_FLAG_KEY: &str = "urgency_detected";

use FlagCategory::{Attachment, Content, Link, Sender};

/// The 40 known flags, in display order
pub static EMAIL_RED_FLAGS: [FlagDef; 40] = [
    // Sender
    flag("misspelled_domain", "Sender domain misspells a known brand", Sender),
    flag("free_email_provider", "Sent from a free email provider", Sender),
    flag("suspicious_tld", "Sender domain uses a suspicious top-level domain", Sender),
    flag("random_email_pattern", "Sender address looks randomly generated", Sender),
    flag("display_name_mismatch", "Display name does not match sender address", Sender),
    flag("email_spoofing", "Sender address appears to be spoofed", Sender),
    flag("domain_mismatch", "Links point to a different domain than the sender", Sender),
    flag("reply_to_mismatch", "Reply-To address differs from the sender", Sender),
    flag("brand_impersonation", "Impersonates a well-known brand", Sender),
    flag("new_sender_domain", "Sender domain was registered recently", Sender),
    // Content
    flag(URGENCY_FLAG_KEY, "Urgent or time-pressure language", Content),
    flag("generic_greeting", "Generic greeting instead of your name", Content),
    flag("grammar_issues", "Spelling or grammar mistakes", Content),
    flag("sensitive_info_request", "Requests sensitive personal information", Content),
    flag("pressure_tactics", "Threatens consequences to force quick action", Content),
    flag("financial_request", "Asks for a payment or money transfer", Content),
    flag("prize_or_lottery", "Claims you won a prize or lottery", Content),
    flag("account_suspension", "Claims your account is suspended or locked", Content),
    flag("credential_request", "Asks you to confirm a password or login", Content),
    flag("excessive_capitalization", "Excessive use of capital letters", Content),
    flag("excessive_punctuation", "Excessive punctuation or exclamation marks", Content),
    flag("special_chars", "Unusual special characters in the text", Content),
    flag("threatening_language", "Threatening or alarming language", Content),
    flag("too_good_to_be_true", "Offer that is too good to be true", Content),
    flag("unusual_request", "Unusual or unexpected request", Content),
    flag("crypto_payment", "Requests payment in cryptocurrency", Content),
    flag("gift_card_request", "Requests gift cards as payment", Content),
    flag("invoice_scam", "Unexpected invoice or billing notice", Content),
    flag("delivery_scam", "Fake delivery or parcel notification", Content),
    flag("tax_refund_scam", "Fake tax refund or government notice", Content),
    // Links
    flag("shortened_url", "Uses a URL shortener to hide the destination", Link),
    flag("ip_based_url", "Link uses an IP address instead of a domain", Link),
    flag("mismatched_link_text", "Link text does not match its destination", Link),
    flag("suspicious_url", "Contains a link flagged as suspicious", Link),
    flag("http_only_link", "Link does not use HTTPS", Link),
    flag("login_page_link", "Links to a login or verification page", Link),
    // Attachments
    flag("suspicious_attachments", "Mentions or includes risky attachments", Attachment),
    flag("executable_attachment", "Executable file attachment", Attachment),
    flag("macro_document", "Office document that may contain macros", Attachment),
    flag("password_protected_archive", "Password-protected archive attachment", Attachment),
];

/// Sender flags summarized on screen, with their short labels
pub const SENDER_ALERT_FLAGS: [(&str, &str); 6] = [
    ("misspelled_domain", "Misspelled"),
    ("free_email_provider", "Free Provider"),
    ("suspicious_tld", "Suspicious TLD"),
    ("random_email_pattern", "Random Pattern"),
    ("display_name_mismatch", "Name Mismatch"),
    ("email_spoofing", "Spoofed"),
];

/// Total size of each flag family as advertised to the user
pub const FLAG_FAMILY_SIZE: usize = EMAIL_RED_FLAGS.len();
