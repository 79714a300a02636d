// Spoken summary of the newest record.
//
// Playback is exclusive: starting a new utterance cancels the one in
// flight. There is no queue.
use async_trait::async_trait;
use crate::fields::{resolve, CanonicalKey, Resolved};
use crate::labels::Locale;
use crate::types::PerformanceRecord;
use crate::util::value_text;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A speech engine. Implementations must yield while an utterance plays so
/// that an aborted task stops mid-utterance.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str, lang_tag: &str);
}

/// Writes utterances to stdout, one per line, tagged with the language.
pub struct ConsoleSpeaker;

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str, lang_tag: &str) {
        println!("🔊 [{}] {}", lang_tag, text);
    }
}

fn text_of(record: &PerformanceRecord, key: CanonicalKey) -> Option<String> {
    match resolve(record, key) {
        Resolved::Value(v) => Some(value_text(&v)),
        Resolved::Unavailable => None,
    }
}

pub fn summary_text(record: &PerformanceRecord, locale: Locale, fallback_district: &str) -> String {
    let district = text_of(record, CanonicalKey::DistrictName).unwrap_or_else(|| fallback_district.to_string());
    let month = text_of(record, CanonicalKey::Month).unwrap_or_default();
    let year = text_of(record, CanonicalKey::FinYear).unwrap_or_default();
    let households = text_of(record, CanonicalKey::HouseholdsWorked);
    let persondays = text_of(record, CanonicalKey::PersondaysGenerated);

    match locale {
        Locale::En => {
            let state = text_of(record, CanonicalKey::StateName).unwrap_or_else(|| "Maharashtra".to_string());
            let mut text = format!("District {} in {}. Month {} of {}. ", district, state, month, year);
            if let Some(h) = households {
                text.push_str(&format!("{} households worked. ", h));
            }
            if let Some(p) = persondays {
                text.push_str(&format!("{} person days generated. ", p));
            }
            text
        }
        Locale::Hi => {
            let state = text_of(record, CanonicalKey::StateName).unwrap_or_else(|| "महाराष्ट्र".to_string());
            let mut text = format!("{} के {} ज़िले में, {} के {} महीने का प्रदर्शन। ", state, district, year, month);
            if let Some(h) = households {
                text.push_str(&format!("{} परिवारों ने काम किया। ", h));
            }
            if let Some(p) = persondays {
                text.push_str(&format!("{} मानव-दिवस बने। ", p));
            }
            text
        }
    }
}

pub struct Narrator {
    speaker: Arc<dyn Speaker>,
    current: Option<JoinHandle<()>>,
}

impl Narrator {
    pub fn new(speaker: Arc<dyn Speaker>) -> Self {
        Self { speaker, current: None }
    }

    pub fn is_speaking(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.abort();
        }
    }

    /// Cancel whatever is playing, then start `text`.
    pub fn play(&mut self, text: String, locale: Locale) {
        self.cancel();
        let speaker = Arc::clone(&self.speaker);
        let tag = locale.speech_tag();
        self.current = Some(tokio::spawn(async move { speaker.speak(&text, tag).await }));
    }

    /// Wait for the current utterance, if any, to finish.
    pub async fn finish(&mut self) {
        if let Some(handle) = self.current.take() {
            let _ = handle.await;
        }
    }
}
