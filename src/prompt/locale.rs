//! Languages the generated message can be written in.

use std::fmt;

/// Supported message locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    FrFr,
    EsEs,
    DeDe,
    ItIt,
    KoKr,
    JaJp,
    ZhCn,
    ZhTw,
    PtBr,
    RuRu,
    ArSa,
    HiIn,
}

impl Locale {
    pub const ALL: [Locale; 14] = [
        Locale::EnUs,
        Locale::EnGb,
        Locale::FrFr,
        Locale::EsEs,
        Locale::DeDe,
        Locale::ItIt,
        Locale::KoKr,
        Locale::JaJp,
        Locale::ZhCn,
        Locale::ZhTw,
        Locale::PtBr,
        Locale::RuRu,
        Locale::ArSa,
        Locale::HiIn,
    ];

    /// BCP 47 tag, as written in the config file and the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::FrFr => "fr-FR",
            Locale::EsEs => "es-ES",
            Locale::DeDe => "de-DE",
            Locale::ItIt => "it-IT",
            Locale::KoKr => "ko-KR",
            Locale::JaJp => "ja-JP",
            Locale::ZhCn => "zh-CN",
            Locale::ZhTw => "zh-TW",
            Locale::PtBr => "pt-BR",
            Locale::RuRu => "ru-RU",
            Locale::ArSa => "ar-SA",
            Locale::HiIn => "hi-IN",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    /// Tags match case-insensitively, so `en-us` and `EN-US` both work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Locale::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| format!("Unknown locale: {}", s))
    }
}
