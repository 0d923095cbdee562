use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("unknown voice style: {0}")]
pub struct UnknownVoiceStyle(pub String);

/// Speaker voice. `F*` are female voices, `M*` male voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoiceStyle {
    #[default]
    F1,
    F2,
    F3,
    F4,
    F5,
    M1,
    M2,
    M3,
    M4,
    M5,
}

impl VoiceStyle {
    pub const ALL: [VoiceStyle; 10] = [
        VoiceStyle::F1,
        VoiceStyle::F2,
        VoiceStyle::F3,
        VoiceStyle::F4,
        VoiceStyle::F5,
        VoiceStyle::M1,
        VoiceStyle::M2,
        VoiceStyle::M3,
        VoiceStyle::M4,
        VoiceStyle::M5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceStyle::F1 => "F1",
            VoiceStyle::F2 => "F2",
            VoiceStyle::F3 => "F3",
            VoiceStyle::F4 => "F4",
            VoiceStyle::F5 => "F5",
            VoiceStyle::M1 => "M1",
            VoiceStyle::M2 => "M2",
            VoiceStyle::M3 => "M3",
            VoiceStyle::M4 => "M4",
            VoiceStyle::M5 => "M5",
        }
    }
}

impl fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceStyle {
    type Err = UnknownVoiceStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoiceStyle::ALL
            .into_iter()
            .find(|voice| voice.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVoiceStyle(s.to_string()))
    }
}

/// Spoken language of a session.
///
/// The published SDKs disagree on which codes the server accepts, so the known codes are listed
/// and anything else passes through as `Custom` for the server to judge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Korean,
    Custom(String),
}

impl Language {
    pub fn code(&self) -> &str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Korean => "ko",
            Language::Custom(code) => code,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "en" => Language::English,
            "es" => Language::Spanish,
            "fr" => Language::French,
            "de" => Language::German,
            "it" => Language::Italian,
            "pt" => Language::Portuguese,
            "ko" => Language::Korean,
            _ => Language::Custom(s.to_string()),
        })
    }
}

impl Serialize for Language {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Language::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct VoiceConsts {
        #[serde(skip_serializing_if = "Option::is_none")]
        voice: Option<VoiceStyle>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<Language>,
    }

    #[test]
    fn test_serialize() {
        let consts = VoiceConsts {
            voice: Some(VoiceStyle::M3),
            lang: Some(Language::Korean),
        };
        let json = serde_json::to_string(&consts).unwrap();
        assert_eq!(json, r#"{"voice":"M3","lang":"ko"}"#);

        let consts = VoiceConsts {
            voice: None,
            lang: Some(Language::Custom("ja".to_string())),
        };
        let json = serde_json::to_string(&consts).unwrap();
        assert_eq!(json, r#"{"lang":"ja"}"#);
    }

    #[test]
    fn test_deserialize() {
        let consts: VoiceConsts = serde_json::from_str(r#"{"voice":"F5","lang":"pt"}"#).unwrap();
        assert_eq!(consts.voice, Some(VoiceStyle::F5));
        assert_eq!(consts.lang, Some(Language::Portuguese));

        let consts: VoiceConsts = serde_json::from_str(r#"{"lang":"nl"}"#).unwrap();
        assert_eq!(consts.lang, Some(Language::Custom("nl".to_string())));

        assert!(serde_json::from_str::<VoiceConsts>(r#"{"voice":"X9"}"#).is_err());
    }

    #[test]
    fn test_voice_from_str() {
        assert_eq!("m2".parse::<VoiceStyle>().unwrap(), VoiceStyle::M2);
        assert_eq!(VoiceStyle::ALL.len(), 10);
        for voice in VoiceStyle::ALL {
            assert_eq!(voice.to_string().parse::<VoiceStyle>().unwrap(), voice);
        }
        assert!("F6".parse::<VoiceStyle>().is_err());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::default().code(), "en");
        assert_eq!(Language::Spanish.code(), "es");
        assert_eq!(Language::French.code(), "fr");
        assert_eq!(Language::German.code(), "de");
        assert_eq!(Language::Italian.code(), "it");
        assert_eq!(Language::Portuguese.code(), "pt");
        assert_eq!(Language::Korean.code(), "ko");
    }
}
