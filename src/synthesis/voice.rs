//! Fixed voice and emotion choices.

use clap::ValueEnum;
use std::fmt;

/// Prebuilt voices offered by the speech model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Voice {
    #[default]
    Kore,
    Puck,
    Charon,
    Leda,
    Fenrir,
}

impl Voice {
    pub const ALL: [Voice; 5] = [
        Voice::Kore,
        Voice::Puck,
        Voice::Charon,
        Voice::Leda,
        Voice::Fenrir,
    ];

    /// Identifier sent as `voiceName`
    pub fn id(self) -> &'static str {
        match self {
            Voice::Kore => "Kore",
            Voice::Puck => "Puck",
            Voice::Charon => "Charon",
            Voice::Leda => "Leda",
            Voice::Fenrir => "Fenrir",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Voice::Kore => "কাকন (মেয়ে)",
            Voice::Puck => "পার্থ (ছেলে)",
            Voice::Charon => "জয় (ছেলে)",
            Voice::Leda => "হেমা (মেয়ে)",
            Voice::Fenrir => "বাধন (ছেলে)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Voice::Kore => "Balanced and clear voice",
            Voice::Puck => "Youthful and energetic",
            Voice::Charon => "Deep and authoritative",
            Voice::Leda => "Soft and soothing",
            Voice::Fenrir => "Strong and resonant",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Speaking style requested in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Excited,
    Calm,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Excited,
        Emotion::Calm,
    ];

    /// Bengali word used in the prompt
    pub fn label(self) -> &'static str {
        match self {
            Emotion::Neutral => "সাধারণ",
            Emotion::Happy => "খুশি",
            Emotion::Sad => "দুঃখিত",
            Emotion::Excited => "উত্তেজিত",
            Emotion::Calm => "শান্ত",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Emotion::Neutral => "Neutral",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Excited => "Excited",
            Emotion::Calm => "Calm",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.english_name())
    }
}

/// Sample sentences for quick testing
pub const EXAMPLE_PHRASES: [&str; 4] = [
    "শুভ সকাল! আজ দিনটি আপনার জন্য কেমন কাটছে?",
    "বাংলার সংস্কৃতি ও ঐতিহ্য অত্যন্ত সমৃদ্ধ এবং বৈচিত্র্যময়।",
    "বই পড়া মানুষের মনকে আলোকিত করে এবং জ্ঞানের পরিধি বাড়ায়।",
    "প্রকৃতির সৌন্দর্য উপভোগ করা মনের শান্তির জন্য অপরিহার্য।",
];
