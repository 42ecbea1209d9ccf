use serde::{Deserialize, Serialize};

pub const SURAH_COUNT: u32 = 114;

/// Entry in the surah index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surah {
    pub number: u32,
    /// Arabic name
    pub name: String,
    pub english_name: String,
    pub english_name_translation: String,
    pub number_of_ayahs: u32,
    pub revelation_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ayah {
    /// Global verse number, 1..=6236
    pub number: u32,
    pub number_in_surah: u32,
    pub text: String,
    pub translation: Option<String>,
    pub audio: Option<String>,
    pub juz: u32,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurahDetail {
    pub surah: Surah,
    pub ayahs: Vec<Ayah>,
}

impl SurahDetail {
    /// Mushaf pages this surah spans, counted inclusively.
    pub fn page_span(&self) -> u32 {
        let first = self.ayahs.iter().map(|a| a.page).min();
        let last = self.ayahs.iter().map(|a| a.page).max();
        match (first, last) {
            (Some(f), Some(l)) => l - f + 1,
            _ => 0,
        }
    }
}
