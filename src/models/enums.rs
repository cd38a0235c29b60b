use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Category {
    Macro => "MACRO",
    Radar => "RADAR",
});

str_enum!(Bias {
    Bullish => "Bullish",
    Bearish => "Bearish",
    Neutral => "Neutral",
});

impl Category {
    /// Tabular collection this category routes to.
    pub fn collection(&self) -> &'static str {
        match self {
            Category::Macro => "macro_stream",
            Category::Radar => "radar_data",
        }
    }

    /// Vault folder holding this category's analysis cards.
    pub fn card_folder(&self) -> &'static str {
        match self {
            Category::Macro => "01_Macro_Research",
            Category::Radar => "02_Radar_Ticker",
        }
    }

    /// Classify a category string from model output.
    /// The model is untrusted: anything outside the closed enum routes to
    /// the macro stream rather than being used verbatim as a routing key.
    pub fn parse_lenient(raw: &str) -> Category {
        match raw.trim().to_uppercase().as_str() {
            "MACRO" | "宏观" => Category::Macro,
            "RADAR" | "TICKER" | "雷达" | "个股" => Category::Radar,
            other => {
                if !other.is_empty() {
                    tracing::warn!(category = other, "Unknown category, routing to macro stream");
                }
                Category::Macro
            }
        }
    }
}

impl Bias {
    /// Classify a directional stance from model output.
    /// Handles English and Chinese stance names.
    pub fn parse_lenient(raw: &str) -> Bias {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "bullish" | "bull" | "long" | "看多" | "看涨" | "利多" | "偏多" | "多" => {
                return Bias::Bullish
            }
            "bearish" | "bear" | "short" | "看空" | "看跌" | "利空" | "偏空" | "空" => {
                return Bias::Bearish
            }
            "neutral" | "中性" | "中立" | "观望" => return Bias::Neutral,
            _ => {}
        }
        if lower.contains("bull") || lower.contains("看多") || lower.contains("看涨") {
            Bias::Bullish
        } else if lower.contains("bear") || lower.contains("看空") || lower.contains("看跌") {
            Bias::Bearish
        } else {
            Bias::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_round_trip() {
        assert_eq!(Category::from_str("MACRO").unwrap(), Category::Macro);
        assert_eq!(Category::Radar.as_str(), "RADAR");
    }

    #[test]
    fn category_rejects_unknown_strict() {
        assert!(Category::from_str("CRYPTO").is_err());
    }

    #[test]
    fn unknown_category_routes_to_macro() {
        assert_eq!(Category::parse_lenient("CRYPTO"), Category::Macro);
        assert_eq!(Category::parse_lenient(""), Category::Macro);
    }

    #[test]
    fn category_lenient_accepts_case_and_chinese() {
        assert_eq!(Category::parse_lenient("radar"), Category::Radar);
        assert_eq!(Category::parse_lenient(" 宏观 "), Category::Macro);
        assert_eq!(Category::parse_lenient("个股"), Category::Radar);
    }

    #[test]
    fn category_routing_targets() {
        assert_eq!(Category::Macro.collection(), "macro_stream");
        assert_eq!(Category::Radar.collection(), "radar_data");
        assert_eq!(Category::Macro.card_folder(), "01_Macro_Research");
        assert_eq!(Category::Radar.card_folder(), "02_Radar_Ticker");
    }

    #[test]
    fn bias_lenient_chinese() {
        assert_eq!(Bias::parse_lenient("看多"), Bias::Bullish);
        assert_eq!(Bias::parse_lenient("看空"), Bias::Bearish);
        assert_eq!(Bias::parse_lenient("中性"), Bias::Neutral);
    }

    #[test]
    fn bias_lenient_english_variants() {
        assert_eq!(Bias::parse_lenient("Bullish"), Bias::Bullish);
        assert_eq!(Bias::parse_lenient("slightly bearish"), Bias::Bearish);
        assert_eq!(Bias::parse_lenient("no idea"), Bias::Neutral);
    }
}
