/// Upstream (English transliteration) Hijri month name → local label.
/// Includes the diacritic spellings the calendar service sometimes returns.
const HIJRI_MONTHS: &[(&str, &str)] = &[
    ("Muharram", "Muharram"),
    ("Safar", "Safar"),
    ("Rabi' al-awwal", "Rabiulawal"),
    ("Rabi' al-thani", "Rabiulakhir"),
    ("Jumada al-awwal", "Jumadilula"),
    ("Jumada al-thani", "Jumadilakhir"),
    ("Rajab", "Rajab"),
    ("Sha'ban", "Syaban"),
    ("Ramadan", "Ramadhan"),
    ("Shawwal", "Syawal"),
    ("Dhu al-Qi'dah", "Dzulkaidah"),
    ("Dhu al-Hijjah", "Dzulhijjah"),
    // Alternate spellings
    ("Shaʿbān", "Syaban"),
    ("Ramaḍān", "Ramadhan"),
    ("Shawwāl", "Syawal"),
];

/// Translate a Hijri month name, falling back to the upstream name verbatim.
pub fn local_month_name(upstream: &str) -> &str {
    HIJRI_MONTHS
        .iter()
        .find(|(en, _)| *en == upstream)
        .map(|(_, local)| *local)
        .unwrap_or(upstream)
}

/// "1 Ramadhan 1447"
pub fn hijri_label(day: &str, upstream_month: &str, year: &str) -> String {
    format!("{} {} {}", day, local_month_name(upstream_month), year)
}
