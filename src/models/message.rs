//! Message payloads and the received/sent merge.

use serde::Deserialize;

/// One page of `v1/messages/received` or `v1/messages/sent`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Whether a message was received or sent. Not present in the wire payload;
/// tagged locally when the two pages are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    In,
    Out,
}

/// A single message, either received or sent.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(rename = "sentDate", default)]
    pub sent_date: Option<String>,
    #[serde(default)]
    pub sender: Option<PersonRef>,
    #[serde(rename = "senderName", default)]
    pub sender_name: Option<String>,
    #[serde(rename = "recipientName", default)]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(skip)]
    pub direction: Direction,
}

/// Person reference embedded in received messages.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRef {
    #[serde(default)]
    pub name: String,
}

impl Message {
    /// Sort key: the raw `sentDate` string. The service emits fixed-width
    /// ISO-8601 timestamps, so lexical order is chronological order.
    pub fn sent_date_key(&self) -> &str {
        self.sent_date.as_deref().unwrap_or("")
    }

    /// Display name of the other party: sender for received messages,
    /// recipient for sent ones.
    pub fn person(&self) -> String {
        match self.direction {
            Direction::In => self
                .sender
                .as_ref()
                .map(|s| s.name.clone())
                .filter(|name| !name.is_empty())
                .or_else(|| self.sender_name.clone())
                .unwrap_or_else(|| "?".to_string()),
            Direction::Out => self
                .recipient_name
                .clone()
                .unwrap_or_else(|| "...".to_string()),
        }
    }

    /// Raw body text; `text` takes precedence over `body`.
    pub fn body_text(&self) -> Option<&str> {
        self.text.as_deref().or(self.body.as_deref())
    }
}

/// Tag both pages with their direction, concatenate them and sort the merged
/// set by send timestamp, newest first.
pub fn merge_messages(received: Vec<Message>, sent: Vec<Message>) -> Vec<Message> {
    let mut merged = Vec::with_capacity(received.len() + sent.len());
    for mut message in received {
        message.direction = Direction::In;
        merged.push(message);
    }
    for mut message in sent {
        message.direction = Direction::Out;
        merged.push(message);
    }
    merged.sort_by(|a, b| b.sent_date_key().cmp(a.sent_date_key()));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sent_date: &str) -> Message {
        Message {
            sent_date: Some(sent_date.to_string()),
            sender: None,
            sender_name: None,
            recipient_name: None,
            subject: None,
            text: None,
            body: None,
            direction: Direction::In,
        }
    }

    #[test]
    fn merge_tags_and_sorts_descending() {
        let received = vec![
            message("2026-03-01T08:00:00"),
            message("2026-03-05T12:30:00"),
            message("2026-02-20T07:15:00"),
        ];
        let sent = vec![
            message("2026-03-03T09:00:00"),
            message("2026-03-06T18:00:00"),
        ];

        let merged = merge_messages(received, sent);
        assert_eq!(merged.len(), 5);

        for pair in merged.windows(2) {
            assert!(pair[0].sent_date_key() >= pair[1].sent_date_key());
        }

        let directions: Vec<Direction> = merged.iter().map(|m| m.direction).collect();
        assert_eq!(
            directions,
            vec![
                Direction::Out,
                Direction::In,
                Direction::Out,
                Direction::In,
                Direction::In,
            ]
        );
    }

    #[test]
    fn messages_without_sent_date_sort_last() {
        let mut no_date = message("2026-01-01T00:00:00");
        no_date.sent_date = None;
        let merged = merge_messages(vec![no_date], vec![message("2026-01-02T00:00:00")]);
        assert_eq!(merged[0].sent_date_key(), "2026-01-02T00:00:00");
        assert_eq!(merged[1].sent_date_key(), "");
    }

    #[test]
    fn person_falls_back_per_direction() {
        let mut incoming = message("2026-01-01T00:00:00");
        incoming.sender = Some(PersonRef {
            name: "Novák".to_string(),
        });
        assert_eq!(incoming.person(), "Novák");

        let mut outgoing = message("2026-01-01T00:00:00");
        outgoing.direction = Direction::Out;
        assert_eq!(outgoing.person(), "...");
        outgoing.recipient_name = Some("Dvořák".to_string());
        assert_eq!(outgoing.person(), "Dvořák");
    }
}
