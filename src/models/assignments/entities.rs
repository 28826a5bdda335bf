use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 作业状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Draft, // 草稿
    Published, // 已发布
    Closed,    // 已关闭
}

impl AssignmentStatus {
    pub const DRAFT: &'static str = "draft";
    pub const PUBLISHED: &'static str = "published";
    pub const CLOSED: &'static str = "closed";

    /// 状态流转表：草稿只能发布，发布后只能关闭，关闭为终态
    pub fn can_transition_to(self, next: AssignmentStatus) -> bool {
        use AssignmentStatus::*;
        match (self, next) {
            (Draft, Draft | Published) => true,
            (Published, Published | Closed) => true,
            (Closed, Closed) => true,
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for AssignmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的作业状态: '{s}'. 支持的状态: draft, published, closed"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Draft => write!(f, "{}", AssignmentStatus::DRAFT),
            AssignmentStatus::Published => write!(f, "{}", AssignmentStatus::PUBLISHED),
            AssignmentStatus::Closed => write!(f, "{}", AssignmentStatus::CLOSED),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            AssignmentStatus::DRAFT => Ok(AssignmentStatus::Draft),
            AssignmentStatus::PUBLISHED => Ok(AssignmentStatus::Published),
            AssignmentStatus::CLOSED => Ok(AssignmentStatus::Closed),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

// 作业实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    // 创建者（教师）ID
    pub creator_id: i64,
    // 截止时间，为空表示不限
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    // 满分，为空表示不设上限
    pub max_score: Option<i32>,
    pub status: AssignmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 截止时间已过（截止时刻本身仍可提交）
    pub fn is_past_due(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        matches!(self.due_date, Some(due) if now > due)
    }
}
