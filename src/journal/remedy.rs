//! Remedy cards pulled out of assistant replies.
//!
//! The reply is free text; only lines shaped exactly like
//! `Remedy: <name> - Reason: <reason>` become cards. The system prompt does
//! not spell that shape out, so many replies legitimately produce no cards.

use serde::Serialize;

pub const REMEDY_MARKER: &str = "Remedy:";
pub const REASON_MARKER: &str = " - Reason:";

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x300?text=No+Image+Found";

const REMEDY_IMAGES: [(&str, &str); 8] = [
    (
        "Ginger",
        "https://images.unsplash.com/photo-1607451915261-7e0c4e8b2a4c?auto=format&fit=crop&w=800&q=80",
    ),
    (
        "Peppermint",
        "https://images.unsplash.com/photo-1559591935-5d4a2de6a0ed?auto=format&fit=crop&w=800&q=80",
    ),
    (
        "Fennel",
        "https://images.unsplash.com/photo-1624372513586-0d5f7e5f0b6b?auto=format&fit=crop&w=800&q=80",
    ),
    (
        "Turmeric",
        "https://images.unsplash.com/photo-1615485290694-2e80e45e9c0c?auto=format&fit=crop&w=800&q=80",
    ),
    (
        "Chamomile",
        "https://images.unsplash.com/photo-1622045634657-9d2b6b9f3c1d?auto=format&fit=crop&w=800&q=80",
    ),
    (
        "Aloe Vera",
        "https://images.unsplash.com/photo-1546552729-9f0b4e9e8e8e?auto=format&fit=crop&w=800&q=80",
    ),
    (
        "Slippery Elm",
        "https://images.unsplash.com/photo-1583258292670-5e5e3b3f2f3e?auto=format&fit=crop&w=800&q=80",
    ),
    (
        "Dandelion",
        "https://images.unsplash.com/photo-1583258292670-5e5e3b3f2f3e?auto=format&fit=crop&w=800&q=80",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remedy {
    pub name: String,
    pub reason: String,
}

impl Remedy {
    pub fn image(&self) -> &'static str {
        remedy_image(&self.name)
    }
}

/// Exact, case-sensitive name match; anything else gets the placeholder.
pub fn remedy_image(name: &str) -> &'static str {
    REMEDY_IMAGES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, url)| *url)
        .unwrap_or(PLACEHOLDER_IMAGE)
}

fn parse_remedy_line(line: &str) -> Option<Remedy> {
    if !line.trim().starts_with(REMEDY_MARKER) {
        return None;
    }
    let (head, reason) = line.split_once(REASON_MARKER)?;
    Some(Remedy {
        name: head.replace(REMEDY_MARKER, "").trim().to_string(),
        reason: reason.trim().to_string(),
    })
}

pub fn extract_remedies(response_text: &str) -> Vec<Remedy> {
    response_text.split('\n').filter_map(parse_remedy_line).collect()
}
