use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Original-language filter for the trending list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  En,
  Te,
  Hi,
  Ta,
  Kn,
  Ml,
}

impl Language {
  /// Selector order, matching the language picker.
  pub const ALL: [Language; 6] =
    [Language::En, Language::Te, Language::Hi, Language::Ta, Language::Ml, Language::Kn];

  /// ISO 639-1 code sent to the metadata service.
  pub fn code(self) -> &'static str {
    match self {
      Language::En => "en",
      Language::Te => "te",
      Language::Hi => "hi",
      Language::Ta => "ta",
      Language::Kn => "kn",
      Language::Ml => "ml",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Language::En => "English",
      Language::Te => "Telugu",
      Language::Hi => "Hindi",
      Language::Ta => "Tamil",
      Language::Kn => "Kannada",
      Language::Ml => "Malayalam",
    }
  }

  /// Next language in selector order, wrapping around.
  pub fn next(self) -> Self {
    // Safety: every variant is in ALL, so position() always finds it.
    let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  pub fn prev(self) -> Self {
    let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
    Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}
