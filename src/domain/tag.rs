//! Gift ("특전") tags that events hand out, with their URL labels and server codes.
//!
//! The URL carries tag labels joined by `|`; the event search endpoint expects
//! the numeric codes joined by `,`. Both directions go through the static table
//! below so unknown tokens are caught at decode time.

use serde::{Deserialize, Serialize};

/// Identifier of a gift tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagId {
    #[serde(rename = "컵홀더")]
    CupHolder,
    #[serde(rename = "포토카드")]
    PhotoCard,
    #[serde(rename = "엽서")]
    Postcard,
    #[serde(rename = "스티커")]
    Sticker,
    #[serde(rename = "티켓")]
    Ticket,
    #[serde(rename = "포스터")]
    Poster,
    #[serde(rename = "슬로건")]
    Slogan,
    #[serde(rename = "키링")]
    Keyring,
    #[serde(rename = "럭키드로우")]
    LuckyDraw,
    #[serde(rename = "기타")]
    Other,
}

/// Bidirectional label/code table.
const TAG_TABLE: &[(TagId, &str, &str)] = &[
    (TagId::CupHolder, "컵홀더", "1"),
    (TagId::PhotoCard, "포토카드", "2"),
    (TagId::Postcard, "엽서", "3"),
    (TagId::Sticker, "스티커", "4"),
    (TagId::Ticket, "티켓", "5"),
    (TagId::Poster, "포스터", "6"),
    (TagId::Slogan, "슬로건", "7"),
    (TagId::Keyring, "키링", "8"),
    (TagId::LuckyDraw, "럭키드로우", "9"),
    (TagId::Other, "기타", "10"),
];

impl TagId {
    /// Every tag in display order.
    pub const ALL: &'static [Self] = &[
        Self::CupHolder,
        Self::PhotoCard,
        Self::Postcard,
        Self::Sticker,
        Self::Ticket,
        Self::Poster,
        Self::Slogan,
        Self::Keyring,
        Self::LuckyDraw,
        Self::Other,
    ];

    fn entry(self) -> (TagId, &'static str, &'static str) {
        TAG_TABLE
            .iter()
            .copied()
            .find(|(tag, _, _)| *tag == self)
            .unwrap_or((self, "", ""))
    }

    /// Display label, also used as the URL token.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.entry().1
    }

    /// Code understood by the event search endpoint.
    #[must_use]
    pub fn code(self) -> &'static str {
        self.entry().2
    }

    /// Looks up a tag by its label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        TAG_TABLE
            .iter()
            .find(|(_, l, _)| *l == label)
            .map(|(tag, _, _)| *tag)
    }

    /// Looks up a tag by its server code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        TAG_TABLE
            .iter()
            .find(|(_, _, c)| *c == code)
            .map(|(tag, _, _)| *tag)
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_tag_once() {
        assert_eq!(TAG_TABLE.len(), TagId::ALL.len());
        for tag in TagId::ALL {
            assert_eq!(TagId::from_label(tag.label()), Some(*tag));
            assert_eq!(TagId::from_code(tag.code()), Some(*tag));
        }
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert_eq!(TagId::from_label("응원봉"), None);
        assert_eq!(TagId::from_code("99"), None);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&TagId::PhotoCard).unwrap();
        assert_eq!(json, "\"포토카드\"");
        let back: TagId = serde_json::from_str("\"럭키드로우\"").unwrap();
        assert_eq!(back, TagId::LuckyDraw);
    }
}
