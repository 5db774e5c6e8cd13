//! # Generated Content
//!
//! Shapes for the secondary generators: pitch decks, content calendars,
//! email drip sequences, and social posts. Model output is parsed into the
//! inner types; the `*Envelope` types add totals and provenance.
//!
//! Inner fields default when absent so that a partially filled model
//! response still parses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// -- Pitch deck ---------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Slide {
    pub slide_number: u32,
    pub title: String,
    pub content: Vec<String>,
    pub speaker_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PitchDeck {
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PitchDeckEnvelope {
    pub pitch_deck: PitchDeck,
    pub total_slides: usize,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl PitchDeckEnvelope {
    pub fn new(pitch_deck: PitchDeck, data_source: Option<String>) -> Self {
        Self {
            total_slides: pitch_deck.slides.len(),
            pitch_deck,
            generated_at: Utc::now(),
            data_source,
        }
    }
}

// -- Content calendar ---------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CalendarPost {
    pub channel: String,
    pub content_type: String,
    pub topic: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CalendarDay {
    pub day: String,
    pub date: String,
    pub posts: Vec<CalendarPost>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CalendarWeek {
    pub week_number: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContentCalendar {
    pub weeks: Vec<CalendarWeek>,
}

impl ContentCalendar {
    /// Number of posts across every week and day.
    pub fn total_posts(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .map(|d| d.posts.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContentCalendarEnvelope {
    pub content_calendar: ContentCalendar,
    pub duration_weeks: u32,
    pub total_posts: usize,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl ContentCalendarEnvelope {
    pub fn new(content_calendar: ContentCalendar, duration_weeks: u32, data_source: Option<String>) -> Self {
        Self {
            total_posts: content_calendar.total_posts(),
            content_calendar,
            duration_weeks,
            generated_at: Utc::now(),
            data_source,
        }
    }
}

// -- Email sequence -----------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Email {
    pub email_number: u32,
    pub send_delay_days: u32,
    pub subject_line: String,
    pub preview_text: String,
    pub body: String,
    pub cta: String,
    pub cta_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EmailSequence {
    pub sequence_name: String,
    pub emails: Vec<Email>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmailSequenceEnvelope {
    pub email_sequence: EmailSequence,
    pub total_emails: usize,
    pub sequence_type: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl EmailSequenceEnvelope {
    pub fn new(email_sequence: EmailSequence, sequence_type: &str, data_source: Option<String>) -> Self {
        Self {
            total_emails: email_sequence.emails.len(),
            email_sequence,
            sequence_type: sequence_type.to_string(),
            generated_at: Utc::now(),
            data_source,
        }
    }
}

// -- Social posts -------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SocialPost {
    pub post_number: u32,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub best_time: String,
    pub content_type: String,
    pub image_description: String,
}

/// Model response wrapper for social posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialPostBatch {
    pub posts: Vec<SocialPost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SocialPostsEnvelope {
    pub channel: String,
    pub posts: Vec<SocialPost>,
    pub total_posts: usize,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl SocialPostsEnvelope {
    pub fn new(channel: &str, posts: Vec<SocialPost>, data_source: Option<String>) -> Self {
        Self {
            channel: channel.to_string(),
            total_posts: posts.len(),
            posts,
            generated_at: Utc::now(),
            data_source,
        }
    }
}

/// Capitalize the first letter of each whitespace- or underscore-separated word.
///
/// `"re_engagement"` becomes `"Re_Engagement"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_counts_posts_across_days() {
        let post = CalendarPost::default();
        let calendar = ContentCalendar {
            weeks: vec![
                CalendarWeek {
                    week_number: 1,
                    days: vec![
                        CalendarDay {
                            posts: vec![post.clone(), post.clone()],
                            ..Default::default()
                        },
                        CalendarDay {
                            posts: vec![post.clone()],
                            ..Default::default()
                        },
                    ],
                },
                CalendarWeek {
                    week_number: 2,
                    days: vec![CalendarDay {
                        posts: vec![post],
                        ..Default::default()
                    }],
                },
            ],
        };
        let envelope = ContentCalendarEnvelope::new(calendar, 2, None);
        assert_eq!(envelope.total_posts, 4);
    }

    #[test]
    fn partial_slide_parses() {
        let deck: PitchDeck = serde_json::from_value(serde_json::json!({
            "slides": [{"slide_number": 1, "title": "Problem"}]
        }))
        .unwrap();
        assert_eq!(deck.slides[0].title, "Problem");
        assert!(deck.slides[0].content.is_empty());
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("onboarding"), "Onboarding");
        assert_eq!(title_case("win back"), "Win Back");
        assert_eq!(title_case("re_engagement"), "Re_Engagement");
        assert_eq!(title_case("LAUNCH"), "Launch");
    }
}
