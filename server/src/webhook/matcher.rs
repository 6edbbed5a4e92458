//! Command Matcher
//!
//! Ordered, first-match-wins classification of an inbound text message into
//! exactly one [`ReplyIntent`]. Total over its rule set: every text
//! terminates in `Fallback`.

use qb_line::Mentionee;

use super::types::{ReplyIntent, ReplyUrls};

/// Queue booking trigger (substring, case-sensitive).
pub const BOOKING_KEYWORD: &str = "จองคิว";
/// Booking history trigger (substring, case-sensitive).
pub const HISTORY_KEYWORD: &str = "ประวัติการจอง";
/// FAQ trigger (substring, case-sensitive).
pub const FAQ_KEYWORD: &str = "คำถามพบบ่อย";
/// Clinic location trigger (substring, case-sensitive).
pub const LOCATION_KEYWORD: &str = "ตรงไหน";

/// Decide the reply intent for one text message.
///
/// Precedence: bot mention, exact case-insensitive "hi", booking, history,
/// FAQ, location, fallback. A message carrying several keywords resolves to
/// the earliest rule. Mention detection is disabled while `bot_user_id` is
/// empty (identity lookup failed or pending).
#[must_use]
pub fn match_command(
    text: &str,
    mentions: &[Mentionee],
    bot_user_id: &str,
    user_id: &str,
    urls: &ReplyUrls,
) -> ReplyIntent {
    if !bot_user_id.is_empty()
        && mentions
            .iter()
            .any(|m| m.user_id.as_deref() == Some(bot_user_id))
    {
        return ReplyIntent::MentionAck;
    }

    if text.to_lowercase() == "hi" {
        return ReplyIntent::Greeting;
    }

    if text.contains(BOOKING_KEYWORD) {
        return ReplyIntent::Booking {
            url: link_with_user(&urls.booking, user_id),
        };
    }

    if text.contains(HISTORY_KEYWORD) {
        return ReplyIntent::History {
            url: link_with_user(&urls.history, user_id),
        };
    }

    if text.contains(FAQ_KEYWORD) {
        return ReplyIntent::Faq {
            url: link_with_user(&urls.faq, user_id),
        };
    }

    if text.contains(LOCATION_KEYWORD) {
        return ReplyIntent::Location;
    }

    ReplyIntent::Fallback {
        text: text.to_string(),
    }
}

/// Append the sender's id so the destination page can identify them.
fn link_with_user(base: &str, user_id: &str) -> String {
    format!("{base}?userid={user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> ReplyUrls {
        ReplyUrls {
            booking: "https://x/b".into(),
            history: "https://x/h".into(),
            faq: "https://x/f".into(),
        }
    }

    fn matched(text: &str) -> ReplyIntent {
        match_command(text, &[], "Ubot", "U1", &urls())
    }

    #[test]
    fn greeting_is_exact_and_case_insensitive() {
        assert_eq!(matched("hi"), ReplyIntent::Greeting);
        assert_eq!(matched("Hi"), ReplyIntent::Greeting);
        assert_eq!(matched("HI"), ReplyIntent::Greeting);
        assert_eq!(
            matched("hI there"),
            ReplyIntent::Fallback {
                text: "hI there".into()
            }
        );
    }

    #[test]
    fn booking_keyword_builds_user_link() {
        assert_eq!(
            matched("ขอจองคิวหน่อยครับ"),
            ReplyIntent::Booking {
                url: "https://x/b?userid=U1".into()
            }
        );
    }

    #[test]
    fn booking_wins_over_history() {
        // Contains both keywords; booking is checked first.
        assert_eq!(
            matched("จองคิว และ ประวัติการจอง"),
            ReplyIntent::Booking {
                url: "https://x/b?userid=U1".into()
            }
        );
    }

    #[test]
    fn history_faq_and_location_match_as_substrings() {
        assert_eq!(
            matched("ดูประวัติการจองของฉัน"),
            ReplyIntent::History {
                url: "https://x/h?userid=U1".into()
            }
        );
        assert_eq!(
            matched("คำถามพบบ่อย"),
            ReplyIntent::Faq {
                url: "https://x/f?userid=U1".into()
            }
        );
        assert_eq!(matched("คลินิกอยู่ตรงไหนคะ"), ReplyIntent::Location);
    }

    #[test]
    fn mention_outranks_every_keyword() {
        let mentions = [Mentionee {
            user_id: Some("Ubot".into()),
        }];
        let intent = match_command("@bot จองคิว", &mentions, "Ubot", "U1", &urls());
        assert_eq!(intent, ReplyIntent::MentionAck);
    }

    #[test]
    fn mention_of_someone_else_is_ignored() {
        let mentions = [Mentionee {
            user_id: Some("Uother".into()),
        }];
        let intent = match_command("@friend จองคิว", &mentions, "Ubot", "U1", &urls());
        assert!(matches!(intent, ReplyIntent::Booking { .. }));
    }

    #[test]
    fn empty_bot_id_disables_mention_detection() {
        let mentions = [Mentionee { user_id: None }];
        let intent = match_command("hello @all", &mentions, "", "U1", &urls());
        assert_eq!(
            intent,
            ReplyIntent::Fallback {
                text: "hello @all".into()
            }
        );
    }

    #[test]
    fn unmatched_text_always_falls_back() {
        assert_eq!(
            matched("random text"),
            ReplyIntent::Fallback {
                text: "random text".into()
            }
        );
        assert_eq!(matched(""), ReplyIntent::Fallback { text: String::new() });
    }
}
