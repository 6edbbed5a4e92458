//! Reply Composition
//!
//! Renders a [`ReplyIntent`] into concrete LINE message payloads. Pure: no
//! lookups, no failure paths, and no validation of configured URLs.

use serde_json::{json, Value};

use super::types::ReplyIntent;

/// Render an intent into the message array for the reply endpoint.
/// `NoReply` renders to an empty array. `display_name` personalizes the
/// booking and history cards when non-empty.
#[must_use]
pub fn compose(intent: &ReplyIntent, display_name: &str) -> Vec<Value> {
    match intent {
        ReplyIntent::NoReply => Vec::new(),
        ReplyIntent::EchoSticker {
            package_id,
            sticker_id,
        } => vec![sticker_message(package_id, sticker_id)],
        ReplyIntent::MentionAck => vec![text_message("รับทราบค่ะ เรียกบอทได้เลย 🙌")],
        ReplyIntent::Greeting => vec![year_of_horse_message()],
        ReplyIntent::Booking { url } => vec![booking_message(url, display_name)],
        ReplyIntent::History { url } => vec![history_message(url, display_name)],
        ReplyIntent::Faq { url } => vec![faq_message(url)],
        ReplyIntent::Location => vec![location_message()],
        ReplyIntent::Fallback { .. } => vec![text_message("🌈✨ สวัสดีค่ะ! 😊🌸")],
    }
}

fn text_message(text: &str) -> Value {
    json!({ "type": "text", "text": text })
}

fn sticker_message(package_id: &str, sticker_id: &str) -> Value {
    json!({
        "type": "sticker",
        "packageId": package_id,
        "stickerId": sticker_id,
    })
}

/// Happy New Year 2026 (Year of the Horse) flex card sent for "hi".
fn year_of_horse_message() -> Value {
    json!({
        "type": "flex",
        "altText": "สวัสดีปีม้าทอง 2569! 🐴🎉",
        "contents": {
            "type": "bubble",
            "hero": {
                "type": "image",
                "url": "https://images.unsplash.com/photo-1553284965-83fd3e82fa5a?q=80&w=1080&auto=format&fit=crop",
                "size": "full",
                "aspectRatio": "20:13",
                "aspectMode": "cover",
                "action": { "type": "uri", "uri": "https://line.me" },
            },
            "body": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    {
                        "type": "text",
                        "text": "Happy Year of the Horse",
                        "weight": "bold",
                        "size": "xl",
                        "color": "#D4AF37",
                        "align": "center",
                    },
                    {
                        "type": "text",
                        "text": "2026",
                        "weight": "bold",
                        "size": "5xl",
                        "color": "#FFD700",
                        "align": "center",
                        "margin": "md",
                    },
                    {
                        "type": "text",
                        "text": "🐴 ขอให้ปีม้านี้ นำพาความสำเร็จและความก้าวหน้ามาสู่คุณอย่างรวดเร็ว",
                        "size": "sm",
                        "color": "#CCCCCC",
                        "wrap": true,
                        "align": "center",
                        "margin": "lg",
                    },
                ],
                "backgroundColor": "#1A1A1A",
            },
            "styles": { "body": { "backgroundColor": "#1A1A1A" } },
        },
    })
}

/// Booking card with a green URI button.
fn booking_message(url: &str, display_name: &str) -> Value {
    let body_text = if display_name.is_empty() {
        "กรุณากดปุ่มด้านล่างเพื่อจองคิวของคุณ".to_string()
    } else {
        format!("คุณ{display_name} กรุณากดปุ่มด้านล่างเพื่อจองคิวของคุณ")
    };

    json!({
        "type": "flex",
        "altText": "จองคิว - กดปุ่มด้านล่างเพื่อจองคิว",
        "contents": {
            "type": "bubble",
            "body": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    {
                        "type": "text",
                        "text": "🗓️ จองคิว",
                        "weight": "bold",
                        "size": "xl",
                        "align": "center",
                    },
                    {
                        "type": "text",
                        "text": body_text,
                        "size": "sm",
                        "color": "#666666",
                        "align": "center",
                        "margin": "md",
                    },
                ],
            },
            "footer": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    {
                        "type": "button",
                        "action": { "type": "uri", "label": "📅 จองคิวเลย", "uri": url },
                        "style": "primary",
                        "color": "#22C55E",
                    },
                ],
            },
        },
    })
}

/// Booking-history card with an orange URI button.
fn history_message(url: &str, display_name: &str) -> Value {
    let body_text = if display_name.is_empty() {
        "กรุณากดปุ่มด้านล่างเพื่อดูประวัติการจองของคุณ".to_string()
    } else {
        format!("คุณ{display_name} กรุณากดปุ่มด้านล่างเพื่อดูประวัติการจองของคุณ")
    };

    json!({
        "type": "flex",
        "altText": "ประวัติการจอง - กดปุ่มด้านล่างเพื่อดูประวัติ",
        "contents": {
            "type": "bubble",
            "body": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    {
                        "type": "text",
                        "text": "📋 ประวัติการจอง",
                        "weight": "bold",
                        "size": "xl",
                        "align": "center",
                    },
                    {
                        "type": "text",
                        "text": body_text,
                        "size": "sm",
                        "color": "#666666",
                        "align": "center",
                        "margin": "md",
                    },
                ],
            },
            "footer": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    {
                        "type": "button",
                        "action": { "type": "uri", "label": "📜 ดูประวัติการจอง", "uri": url },
                        "style": "primary",
                        "color": "#F97316",
                    },
                ],
            },
        },
    })
}

/// FAQ buttons template.
fn faq_message(url: &str) -> Value {
    json!({
        "type": "template",
        "altText": "คำถามพบบ่อย - กดปุ่มด้านล่างเพื่อดูคำถามที่พบบ่อย",
        "template": {
            "type": "buttons",
            "title": "❓ คำถามพบบ่อย",
            "text": "กรุณากดปุ่มด้านล่างเพื่อดูคำตอบที่พบบ่อย",
            "actions": [
                { "type": "uri", "label": "📖 ดูคำถามพบบ่อย", "uri": url },
            ],
        },
    })
}

/// Static clinic location message.
fn location_message() -> Value {
    json!({
        "type": "location",
        "title": "คลินิกแพทย์แผนไทย",
        "address": "ถนนพุทธบูชา ตำบลในเมือง อำเภอเมือง พิษณุโลก 65000",
        "latitude": 16.8211,
        "longitude": 100.2659,
    })
}
