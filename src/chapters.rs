//! Chapter name resolution
//!
//! Maps a surah display name, in Arabic or a romanized spelling, to its
//! canonical ordinal 1..=114. Resolution never fails: 0 means unresolved.

use crate::core::text_normalizer::{normalize, strip_leading_word};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Surah names in canonical order; position + 1 is the ordinal
const ARABIC_NAMES: [&str; 114] = [
    "الفاتحة", "البقرة", "آل عمران", "النساء", "المائدة", "الأنعام", "الأعراف",
    "الأنفال", "التوبة", "يونس", "هود", "يوسف", "الرعد", "إبراهيم", "الحجر",
    "النحل", "الإسراء", "الكهف", "مريم", "طه", "الأنبياء", "الحج", "المؤمنون",
    "النور", "الفرقان", "الشعراء", "النمل", "القصص", "العنكبوت", "الروم",
    "لقمان", "السجدة", "الأحزاب", "سبأ", "فاطر", "يس", "الصافات", "ص", "الزمر",
    "غافر", "فصلت", "الشورى", "الزخرف", "الدخان", "الجاثية", "الأحقاف", "محمد",
    "الفتح", "الحجرات", "ق", "الذاريات", "الطور", "النجم", "القمر", "الرحمن",
    "الواقعة", "الحديد", "المجادلة", "الحشر", "الممتحنة", "الصف", "الجمعة",
    "المنافقون", "التغابن", "الطلاق", "التحريم", "الملك", "القلم", "الحاقة",
    "المعارج", "نوح", "الجن", "المزمل", "المدثر", "القيامة", "الإنسان",
    "المرسلات", "النبأ", "النازعات", "عبس", "التكوير", "الانفطار", "المطففين",
    "الانشقاق", "البروج", "الطارق", "الأعلى", "الغاشية", "الفجر", "البلد",
    "الشمس", "الليل", "الضحى", "الشرح", "التين", "العلق", "القدر", "البينة",
    "الزلزلة", "العاديات", "القارعة", "التكاثر", "العصر", "الهمزة", "الفيل",
    "قريش", "الماعون", "الكوثر", "الكافرون", "النصر", "المسد", "الإخلاص",
    "الفلق", "الناس",
];

/// Romanized spellings (lowercase) and their ordinals, scanned in order
const ROMANIZED_NAMES: &[(&str, u32)] = &[
    ("al-faatiha", 1), ("al-fatiha", 1), ("al-fatihah", 1),
    ("al-baqara", 2), ("al-baqarah", 2),
    ("aal-i-imraan", 3), ("al-imran", 3), ("ali imran", 3),
    ("an-nisaa", 4), ("an-nisa", 4),
    ("al-maaida", 5), ("al-maidah", 5),
    ("al-an'aam", 6), ("al-anam", 6),
    ("al-a'raaf", 7), ("al-araf", 7),
    ("al-anfaal", 8), ("al-anfal", 8),
    ("at-tawba", 9), ("at-tawbah", 9),
    ("yunus", 10), ("hud", 11), ("yusuf", 12),
    ("ar-ra'd", 13), ("ar-rad", 13),
    ("ibrahim", 14), ("al-hijr", 15), ("an-nahl", 16),
    ("al-israa", 17), ("al-isra", 17),
    ("al-kahf", 18), ("maryam", 19),
    ("taa-haa", 20), ("taha", 20), ("ta-ha", 20),
    ("al-anbiyaa", 21), ("al-anbiya", 21),
    ("al-hajj", 22),
    ("al-muminoon", 23), ("al-muminun", 23),
    ("an-noor", 24), ("an-nur", 24),
    ("al-furqaan", 25), ("al-furqan", 25),
    ("ash-shu'araa", 26), ("ash-shuara", 26),
    ("an-naml", 27), ("al-qasas", 28),
    ("al-ankaboot", 29), ("al-ankabut", 29),
    ("ar-room", 30), ("ar-rum", 30),
    ("luqman", 31),
    ("as-sajda", 32), ("as-sajdah", 32),
    ("al-ahzaab", 33), ("al-ahzab", 33),
    ("saba", 34),
    ("faatir", 35), ("fatir", 35),
    ("yaseen", 36), ("ya-sin", 36), ("yasin", 36),
    ("as-saaffaat", 37), ("as-saffat", 37),
    ("saad", 38), ("sad", 38),
    ("az-zumar", 39), ("ghafir", 40), ("fussilat", 41),
    ("ash-shura", 42), ("az-zukhruf", 43),
    ("ad-dukhaan", 44), ("ad-dukhan", 44),
    ("al-jaathiya", 45), ("al-jathiyah", 45),
    ("al-ahqaf", 46), ("muhammad", 47), ("al-fath", 48),
    ("al-hujuraat", 49), ("al-hujurat", 49),
    ("qaaf", 50), ("qaf", 50),
    ("adh-dhaariyat", 51), ("adh-dhariyat", 51),
    ("at-tur", 52), ("an-najm", 53), ("al-qamar", 54),
    ("ar-rahmaan", 55), ("ar-rahman", 55),
    ("al-waaqia", 56), ("al-waqiah", 56),
    ("al-hadid", 57),
    ("al-mujaadila", 58), ("al-mujadila", 58),
    ("al-hashr", 59),
    ("al-mumtahana", 60), ("al-mumtahanah", 60),
    ("as-saff", 61),
    ("al-jumu'a", 62), ("al-jumuah", 62),
    ("al-munaafiqoon", 63), ("al-munafiqun", 63),
    ("at-taghaabun", 64), ("at-taghabun", 64),
    ("at-talaaq", 65), ("at-talaq", 65),
    ("at-tahrim", 66), ("al-mulk", 67), ("al-qalam", 68),
    ("al-haaqqa", 69), ("al-haqqah", 69),
    ("al-ma'aarij", 70), ("al-maarij", 70),
    ("nooh", 71), ("nuh", 71),
    ("al-jinn", 72), ("al-muzzammil", 73), ("al-muddaththir", 74),
    ("al-qiyaama", 75), ("al-qiyamah", 75),
    ("al-insaan", 76), ("al-insan", 76),
    ("al-mursalaat", 77), ("al-mursalat", 77),
    ("an-naba", 78),
    ("an-naazi'aat", 79), ("an-naziat", 79),
    ("abasa", 80), ("at-takwir", 81),
    ("al-infitaar", 82), ("al-infitar", 82),
    ("al-mutaffifin", 83),
    ("al-inshiqaaq", 84), ("al-inshiqaq", 84),
    ("al-burooj", 85), ("al-buruj", 85),
    ("at-taariq", 86), ("at-tariq", 86),
    ("al-a'laa", 87), ("al-ala", 87),
    ("al-ghaashiya", 88), ("al-ghashiyah", 88),
    ("al-fajr", 89), ("al-balad", 90), ("ash-shams", 91),
    ("al-lail", 92), ("al-layl", 92),
    ("ad-dhuhaa", 93), ("ad-duha", 93),
    ("ash-sharh", 94), ("at-tin", 95), ("al-alaq", 96), ("al-qadr", 97),
    ("al-bayyina", 98), ("al-bayyinah", 98),
    ("az-zalzala", 99), ("az-zalzalah", 99),
    ("al-aadiyaat", 100), ("al-adiyat", 100),
    ("al-qaari'a", 101), ("al-qariah", 101),
    ("at-takaathur", 102), ("at-takathur", 102),
    ("al-asr", 103),
    ("al-humaza", 104), ("al-humazah", 104),
    ("al-fil", 105),
    ("quraish", 106), ("quraysh", 106),
    ("al-maa'un", 107), ("al-maun", 107),
    ("al-kawthar", 108), ("al-kauthar", 108),
    ("al-kaafiroon", 109), ("al-kafirun", 109),
    ("an-nasr", 110), ("al-masad", 111),
    ("al-ikhlaas", 112), ("al-ikhlas", 112),
    ("al-falaq", 113),
    ("an-naas", 114), ("an-nas", 114),
];

/// Leading word dropped before lookup ("surah", after normalization)
const HONORIFIC: &str = "سوره";

/// Romanized prefixes dropped before lookup
const ROMANIZED_PREFIXES: &[&str] = &["surah ", "surat ", "sura "];

lazy_static! {
    static ref NORMALIZED_NAMES: Vec<(String, u32)> = ARABIC_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (normalize(name), i as u32 + 1))
        .collect();
    static ref NAME_LOOKUP: HashMap<String, u32> = NORMALIZED_NAMES.iter().cloned().collect();
}

/// Resolve a chapter display name to its ordinal, or 0 when unknown.
///
/// Substring fallbacks take the first table entry contained in the input, so
/// short names (e.g. `ق`, `ص`) can shadow longer ones that appear later.
pub fn resolve_chapter_number(name: &str) -> u32 {
    let normalized = normalize(name);
    let arabic = strip_leading_word(&normalized, HONORIFIC);

    if !arabic.is_empty() {
        if let Some(&ordinal) = NAME_LOOKUP.get(arabic) {
            return ordinal;
        }

        if let Some((_, ordinal)) = NORMALIZED_NAMES
            .iter()
            .find(|(entry, _)| arabic.contains(entry.as_str()))
        {
            return *ordinal;
        }
    }

    let lower = name.trim().to_lowercase();
    let romanized = ROMANIZED_PREFIXES
        .iter()
        .find_map(|p| lower.strip_prefix(p))
        .unwrap_or(&lower)
        .trim();

    if romanized.is_empty() {
        return 0;
    }

    if let Some((_, ordinal)) = ROMANIZED_NAMES.iter().find(|(entry, _)| *entry == romanized) {
        return *ordinal;
    }

    ROMANIZED_NAMES
        .iter()
        .find(|(entry, _)| romanized.contains(entry))
        .map(|(_, ordinal)| *ordinal)
        .unwrap_or(0)
}

/// Canonical Arabic name for an ordinal
pub fn chapter_name(ordinal: u32) -> Option<&'static str> {
    ordinal
        .checked_sub(1)
        .and_then(|i| ARABIC_NAMES.get(i as usize))
        .copied()
}
