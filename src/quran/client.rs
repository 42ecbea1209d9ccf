//! Adapter for the alquran.cloud content API.
//!
//! A surah is assembled from two editions of the same text: the Arabic
//! script and a translation. Verses are paired by position.

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ContentFetchError;
use crate::models::{Ayah, Surah, SurahDetail, SURAH_COUNT};

pub const BASE_URL: &str = "https://api.alquran.cloud/v1";
pub const ARABIC_EDITION: &str = "quran-uthmani";
const AUDIO_CDN: &str = "https://cdn.islamic.network/quran/audio/128";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// One surah in a single edition, as returned upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionSurah {
    #[serde(flatten)]
    pub surah: Surah,
    pub ayahs: Vec<EditionAyah>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionAyah {
    pub number: u32,
    pub number_in_surah: u32,
    pub text: String,
    #[serde(default)]
    pub juz: u32,
    #[serde(default)]
    pub page: u32,
}

pub trait ContentSource {
    fn surah_list(&self) -> Result<Vec<Surah>, ContentFetchError>;

    fn edition(&self, number: u32, edition: &str) -> Result<EditionSurah, ContentFetchError>;
}

pub struct AlQuranCloud {
    client: Client,
    base_url: String,
}

impl AlQuranCloud {
    pub fn new() -> Result<Self, ContentFetchError> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ContentFetchError> {
        let client = Client::builder()
            .user_agent(concat!("imsakiyah/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ContentFetchError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentFetchError::Status(status.as_u16()));
        }
        let body: Envelope<T> = response
            .json()
            .map_err(|e| ContentFetchError::Decode(e.to_string()))?;
        Ok(body.data)
    }
}

impl ContentSource for AlQuranCloud {
    fn surah_list(&self) -> Result<Vec<Surah>, ContentFetchError> {
        self.get("surah")
    }

    fn edition(&self, number: u32, edition: &str) -> Result<EditionSurah, ContentFetchError> {
        self.get(&format!("surah/{}/{}", number, edition))
    }
}

pub fn audio_url(reciter: &str, global_number: u32) -> String {
    format!("{}/{}/{}.mp3", AUDIO_CDN, reciter, global_number)
}

/// Pair the Arabic edition with a translation by verse index. A shorter
/// translation leaves the trailing verses untranslated.
pub fn merge_editions(arabic: EditionSurah, translation: Option<EditionSurah>, reciter: &str) -> SurahDetail {
    let mut translated = translation
        .map(|t| t.ayahs.into_iter().map(|a| a.text).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter();

    let ayahs = arabic
        .ayahs
        .into_iter()
        .map(|a| Ayah {
            number: a.number,
            number_in_surah: a.number_in_surah,
            translation: translated.next(),
            audio: Some(audio_url(reciter, a.number)),
            text: a.text,
            juz: a.juz,
            page: a.page,
        })
        .collect();

    SurahDetail {
        surah: arabic.surah,
        ayahs,
    }
}

/// Fetch one surah with its translation and audio links.
///
/// The Arabic text is required; a failed translation fetch degrades to
/// untranslated verses.
pub fn load_surah(
    source: &dyn ContentSource,
    number: u32,
    translation: &str,
    reciter: &str,
) -> Result<SurahDetail, ContentFetchError> {
    if !(1..=SURAH_COUNT).contains(&number) {
        return Err(ContentFetchError::UnknownSurah(number));
    }
    let arabic = source.edition(number, ARABIC_EDITION)?;
    let translated = match source.edition(number, translation) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("translation {} unavailable for surah {}: {}", translation, number, e);
            None
        }
    };
    Ok(merge_editions(arabic, translated, reciter))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARABIC: &str = r#"{
        "number": 1, "name": "سُورَةُ ٱلْفَاتِحَةِ", "englishName": "Al-Faatiha",
        "englishNameTranslation": "The Opening", "numberOfAyahs": 3,
        "revelationType": "Meccan",
        "ayahs": [
            {"number": 1, "numberInSurah": 1, "text": "a1", "juz": 1, "page": 1},
            {"number": 2, "numberInSurah": 2, "text": "a2", "juz": 1, "page": 1},
            {"number": 3, "numberInSurah": 3, "text": "a3", "juz": 1, "page": 2}
        ]
    }"#;

    const INDONESIAN: &str = r#"{
        "number": 1, "name": "سُورَةُ ٱلْفَاتِحَةِ", "englishName": "Al-Faatiha",
        "englishNameTranslation": "The Opening", "numberOfAyahs": 3,
        "revelationType": "Meccan",
        "ayahs": [
            {"number": 1, "numberInSurah": 1, "text": "t1"},
            {"number": 2, "numberInSurah": 2, "text": "t2"}
        ]
    }"#;

    fn edition(json: &str) -> EditionSurah {
        serde_json::from_str(json).unwrap()
    }

    struct Fixture {
        translation_ok: bool,
    }

    impl ContentSource for Fixture {
        fn surah_list(&self) -> Result<Vec<Surah>, ContentFetchError> {
            Ok(vec![edition(ARABIC).surah])
        }

        fn edition(&self, _number: u32, edition_id: &str) -> Result<EditionSurah, ContentFetchError> {
            match edition_id {
                ARABIC_EDITION => Ok(edition(ARABIC)),
                _ if self.translation_ok => Ok(edition(INDONESIAN)),
                _ => Err(ContentFetchError::Status(503)),
            }
        }
    }

    #[test]
    fn parses_edition_with_flattened_header() {
        let e = edition(ARABIC);
        assert_eq!(e.surah.english_name, "Al-Faatiha");
        assert_eq!(e.surah.number_of_ayahs, 3);
        assert_eq!(e.ayahs[2].page, 2);
    }

    #[test]
    fn audio_url_uses_global_number() {
        assert_eq!(
            audio_url("ar.husary", 262),
            "https://cdn.islamic.network/quran/audio/128/ar.husary/262.mp3"
        );
    }

    #[test]
    fn merge_pairs_by_index() {
        let detail = merge_editions(edition(ARABIC), Some(edition(INDONESIAN)), "ar.husary");
        assert_eq!(detail.ayahs.len(), 3);
        assert_eq!(detail.ayahs[0].text, "a1");
        assert_eq!(detail.ayahs[0].translation.as_deref(), Some("t1"));
        assert_eq!(detail.ayahs[2].translation, None);
        assert!(detail.ayahs[2].audio.as_deref().unwrap().ends_with("/3.mp3"));
        assert_eq!(detail.page_span(), 2);
    }

    #[test]
    fn load_surah_tolerates_missing_translation() {
        let detail = load_surah(&Fixture { translation_ok: false }, 1, "id.indonesian", "ar.husary").unwrap();
        assert!(detail.ayahs.iter().all(|a| a.translation.is_none()));

        let detail = load_surah(&Fixture { translation_ok: true }, 1, "id.indonesian", "ar.husary").unwrap();
        assert_eq!(detail.ayahs[1].translation.as_deref(), Some("t2"));
    }

    #[test]
    fn rejects_out_of_range_surah() {
        let fixture = Fixture { translation_ok: true };
        assert!(matches!(load_surah(&fixture, 0, "id.indonesian", "ar.husary"), Err(ContentFetchError::UnknownSurah(0))));
        assert!(matches!(load_surah(&fixture, 115, "id.indonesian", "ar.husary"), Err(ContentFetchError::UnknownSurah(115))));
    }
}
