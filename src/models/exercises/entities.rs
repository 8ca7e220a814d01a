use serde::{Deserialize, Serialize};

/// 批改状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionStatus {
    Uncorrected,
    Pending,
    Corrected,
}

impl CorrectionStatus {
    pub const UNCORRECTED: &'static str = "uncorrected";
    pub const PENDING: &'static str = "pending";
    pub const CORRECTED: &'static str = "corrected";

    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionStatus::Uncorrected => Self::UNCORRECTED,
            CorrectionStatus::Pending => Self::PENDING,
            CorrectionStatus::Corrected => Self::CORRECTED,
        }
    }
}

impl std::fmt::Display for CorrectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CorrectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::UNCORRECTED => Ok(CorrectionStatus::Uncorrected),
            Self::PENDING => Ok(CorrectionStatus::Pending),
            Self::CORRECTED => Ok(CorrectionStatus::Corrected),
            _ => Err(format!("Invalid correction status: {s}")),
        }
    }
}

impl Serialize for CorrectionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CorrectionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 练习中可下载的媒体位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSlot {
    Statement,
    Answer,
    Correction,
    Audio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    // 提交者
    pub user_id: i64,
    pub title: String,
    pub text: Option<String>,
    // 题目照片（媒体目录下的相对路径）
    pub statement_image: String,
    pub answer_image: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub status: CorrectionStatus,
    pub correction_text: Option<String>,
    pub correction_image: Option<String>,
    pub correction_audio: Option<String>,
    // 首次标记为已批改的时间，之后不再变化
    pub corrected_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Exercise {
    pub fn media_path(&self, slot: MediaSlot) -> Option<&str> {
        match slot {
            MediaSlot::Statement => Some(self.statement_image.as_str()),
            MediaSlot::Answer => self.answer_image.as_deref(),
            MediaSlot::Correction => self.correction_image.as_deref(),
            MediaSlot::Audio => self.correction_audio.as_deref(),
        }
    }

    /// 练习关联的全部媒体文件
    pub fn media_paths(&self) -> Vec<&str> {
        [
            MediaSlot::Statement,
            MediaSlot::Answer,
            MediaSlot::Correction,
            MediaSlot::Audio,
        ]
        .into_iter()
        .filter_map(|slot| self.media_path(slot))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_exercise() -> Exercise {
        Exercise {
            id: 1,
            user_id: 7,
            title: "Untitled".to_string(),
            text: None,
            statement_image: "statements/a.jpg".to_string(),
            answer_image: Some("answers/b.jpg".to_string()),
            submitted_at: chrono::Utc::now(),
            status: CorrectionStatus::Uncorrected,
            correction_text: None,
            correction_image: None,
            correction_audio: Some("audio_corrections/c.mp3".to_string()),
            corrected_at: None,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            CorrectionStatus::Uncorrected,
            CorrectionStatus::Pending,
            CorrectionStatus::Corrected,
        ] {
            assert_eq!(status.as_str().parse::<CorrectionStatus>(), Ok(status));
        }
        assert!("done".parse::<CorrectionStatus>().is_err());
        assert!(serde_json::from_str::<CorrectionStatus>("\"Corrected\"").is_err());
    }

    #[test]
    fn test_media_paths() {
        let exercise = sample_exercise();
        assert_eq!(exercise.media_path(MediaSlot::Correction), None);
        assert_eq!(
            exercise.media_paths(),
            vec!["statements/a.jpg", "answers/b.jpg", "audio_corrections/c.mp3"]
        );
    }

    #[test]
    fn test_media_slot_deserialize() {
        let slot: MediaSlot = serde_json::from_str("\"audio\"").unwrap();
        assert_eq!(slot, MediaSlot::Audio);
    }
}
