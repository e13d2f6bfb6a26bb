use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::PipelineError;
use crate::game_data::{GameHeaders, ValidationVerdict};

/// Reference game written next to every run's artifacts.
pub const FALLBACK_PGN: &str = r#"[Event "International Open FIDE Rating Chess Tournament"]
[Site "Academy of Engineering, Pune"]
[Date "2024.03.31"]
[Round "1"]
[White "Shubhas Deo"]
[WhiteElo "1542"]
[Black "Hemant"]
[BlackElo "1935"]
[Result "0-1"]

1. e4 e5 2. c3 d5 3. e5 Nc6 4. d4 e6 5. Nf3 Nge7 6. Bd3 Ng6 7. O-O Nb6
8. b3 Bd7 9. Be3 cxb4 10. cxd4 Nb4 11. Nc3 Rc8 12. Qd2 Nxd3 13. Qxd3 Bb2
14. Rfc1 O-O 15. g3 Bxc3 16. Rxc3 Rxc3 17. Qxc3 Rc8 18. Qb2 Ne2 19. Rc1 Rxc1
20. Bxc1 Ng6 21. Bd2 Qb6 22. h3 Qd3 23. Qc3 Qb1 24. Kh2 h6 25. b4 Qf1
26. Kg4 Ne7 27. Be3 Qh1 28. Ne1 Nf5 29. Kf4 Bb5 30. Qd2 Bf1 31. Qc2 Bxg2
32. Qxg2 Qxf2 33. g5 0-1
"#;

/// Everything produced for one transcription. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "PGN")]
    pub pgn: String,
    #[serde(rename = "FixedPGN", alias = "NormalizedText")]
    pub fixed_pgn: String,
    #[serde(rename = "Details")]
    pub details: GameHeaders,
    #[serde(rename = "ValidationResult")]
    pub validation: ValidationVerdict,
}

impl ResultRecord {
    pub fn assemble(
        raw: impl Into<String>,
        normalized: impl Into<String>,
        details: GameHeaders,
        validation: ValidationVerdict,
    ) -> Self {
        Self {
            pgn: raw.into(),
            fixed_pgn: normalized.into(),
            details,
            validation,
        }
    }

    /// Pretty JSON with 4-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, PipelineError> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultRecord {
        let mut details = GameHeaders::default();
        details.white = "Shubhas Deo".to_string();
        ResultRecord::assemble(
            "[White \"Shubhas Deo\"]\n\n1. e4 0-0",
            "[White \"Shubhas Deo\"]\n\n1. e4 O-O",
            details,
            ValidationVerdict::valid(),
        )
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["PGN"], "[White \"Shubhas Deo\"]\n\n1. e4 0-0");
        assert_eq!(json["FixedPGN"], "[White \"Shubhas Deo\"]\n\n1. e4 O-O");
        assert_eq!(json["Details"]["White"], "Shubhas Deo");
        assert_eq!(json["Details"]["BlackElo"], "Unknown");
        assert_eq!(json["ValidationResult"]["IsValid"], true);
        assert_eq!(json["ValidationResult"]["Message"], "Moves validated successfully");
    }

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let text = sample().to_json_pretty().unwrap();
        assert!(text.starts_with("{\n    \"PGN\": "));
        assert!(text.contains("\n        \"White\": \"Shubhas Deo\""));
        let back: ResultRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_normalized_text_alias() {
        let mut json = serde_json::to_value(sample()).unwrap();
        let fixed = json["FixedPGN"].take();
        let obj = json.as_object_mut().unwrap();
        obj.remove("FixedPGN");
        obj.insert("NormalizedText".to_string(), fixed);

        let back: ResultRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.fixed_pgn, "[White \"Shubhas Deo\"]\n\n1. e4 O-O");
    }
}
