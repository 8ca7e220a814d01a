use serde::{Deserialize, Serialize};

/// 学生当前年级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLevel {
    Sixieme,
    Cinquieme,
    Quatrieme,
    Troisieme,
    Seconde,
    Premiere,
    Terminale,
    PostBac,
    Autre,
}

impl ClassLevel {
    pub const ALL: [ClassLevel; 9] = [
        ClassLevel::Sixieme,
        ClassLevel::Cinquieme,
        ClassLevel::Quatrieme,
        ClassLevel::Troisieme,
        ClassLevel::Seconde,
        ClassLevel::Premiere,
        ClassLevel::Terminale,
        ClassLevel::PostBac,
        ClassLevel::Autre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassLevel::Sixieme => "6e",
            ClassLevel::Cinquieme => "5e",
            ClassLevel::Quatrieme => "4e",
            ClassLevel::Troisieme => "3e",
            ClassLevel::Seconde => "2nd",
            ClassLevel::Premiere => "1er",
            ClassLevel::Terminale => "terminale",
            ClassLevel::PostBac => "post_bac",
            ClassLevel::Autre => "autre",
        }
    }
}

impl std::fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClassLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("Invalid class level: {s}"))
    }
}

impl Serialize for ClassLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ClassLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 学生资料，与账号一对一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub parent_first_name: Option<String>,
    pub parent_last_name: Option<String>,
    pub current_class: Option<ClassLevel>,
    pub credits: i32,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_level_round_trip() {
        for level in ClassLevel::ALL {
            assert_eq!(level.as_str().parse::<ClassLevel>(), Ok(level));
        }
        assert!("cp".parse::<ClassLevel>().is_err());
    }

    #[test]
    fn test_class_level_serde() {
        let json = serde_json::to_string(&ClassLevel::PostBac).unwrap();
        assert_eq!(json, "\"post_bac\"");
        let level: ClassLevel = serde_json::from_str("\"terminale\"").unwrap();
        assert_eq!(level, ClassLevel::Terminale);
    }
}
