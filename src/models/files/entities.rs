use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 文件用途分类
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    #[default]
    Attachment, // 附件
    Template,  // 模板
    Reference, // 参考资料
}

impl FileCategory {
    pub const ATTACHMENT: &'static str = "attachment";
    pub const TEMPLATE: &'static str = "template";
    pub const REFERENCE: &'static str = "reference";
}

impl<'de> Deserialize<'de> for FileCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的文件分类: '{s}'. 支持的分类: attachment, template, reference"
            ))
        })
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileCategory::Attachment => write!(f, "{}", FileCategory::ATTACHMENT),
            FileCategory::Template => write!(f, "{}", FileCategory::TEMPLATE),
            FileCategory::Reference => write!(f, "{}", FileCategory::REFERENCE),
        }
    }
}

impl std::str::FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            FileCategory::ATTACHMENT => Ok(FileCategory::Attachment),
            FileCategory::TEMPLATE => Ok(FileCategory::Template),
            FileCategory::REFERENCE => Ok(FileCategory::Reference),
            _ => Err(format!("Invalid file category: {s}")),
        }
    }
}

// 作业文件元数据，文件内容由外部存储负责
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentFile {
    pub id: Uuid,
    // 所属作业，为空表示尚未关联
    pub assignment_id: Option<Uuid>,
    // 上传者 ID
    pub uploaded_by: i64,
    pub file_name: String,
    pub file_path: String,
    // 文件大小（以字节为单位）
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub file_category: FileCategory,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
