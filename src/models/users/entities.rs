use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// 角色名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    Admin,            // 管理员
    HqTeacher,        // 总部教师
    FranchiseTeacher, // 加盟教师
    Student,          // 学生
}

impl RoleName {
    pub const ADMIN: &'static str = "ADMIN";
    pub const HQ_TEACHER: &'static str = "HQ_TEACHER";
    pub const FRANCHISE_TEACHER: &'static str = "FRANCHISE_TEACHER";
    pub const STUDENT: &'static str = "STUDENT";

    pub fn teacher_roles() -> &'static [&'static RoleName] {
        &[&Self::Admin, &Self::HqTeacher, &Self::FranchiseTeacher]
    }

    /// 身份边界处的角色规范化：忽略大小写，去掉可选的 `ROLE_` 前缀
    pub fn normalize(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match name {
            Self::ADMIN => Some(RoleName::Admin),
            Self::HQ_TEACHER => Some(RoleName::HqTeacher),
            Self::FRANCHISE_TEACHER => Some(RoleName::FranchiseTeacher),
            Self::STUDENT => Some(RoleName::Student),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RoleName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RoleName::normalize(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "无效的角色: '{s}'. 支持的角色: ADMIN, HQ_TEACHER, FRANCHISE_TEACHER, STUDENT"
            ))
        })
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleName::Admin => write!(f, "{}", RoleName::ADMIN),
            RoleName::HqTeacher => write!(f, "{}", RoleName::HQ_TEACHER),
            RoleName::FranchiseTeacher => write!(f, "{}", RoleName::FRANCHISE_TEACHER),
            RoleName::Student => write!(f, "{}", RoleName::STUDENT),
        }
    }
}

impl std::str::FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::normalize(s).ok_or_else(|| format!("Invalid role name: {s}"))
    }
}

/// 当前请求的操作者
///
/// 由 `RequireJWT` 从访问令牌解析，显式传递给每个业务操作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub roles: HashSet<RoleName>,
}

impl Principal {
    pub fn new(id: i64, roles: impl IntoIterator<Item = RoleName>) -> Self {
        Self {
            id,
            roles: roles.into_iter().collect(),
        }
    }

    /// 从原始角色字符串构建，无法识别的角色被丢弃
    pub fn from_raw_roles<S: AsRef<str>>(id: i64, raw: &[S]) -> Self {
        let roles = raw
            .iter()
            .filter_map(|r| {
                let role = RoleName::normalize(r.as_ref());
                if role.is_none() {
                    tracing::debug!("忽略无法识别的角色: {}", r.as_ref());
                }
                role
            })
            .collect();
        Self { id, roles }
    }

    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[&RoleName]) -> bool {
        roles.iter().any(|r| self.roles.contains(*r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_roles() {
        assert_eq!(RoleName::normalize("ROLE_ADMIN"), Some(RoleName::Admin));
        assert_eq!(RoleName::normalize("admin"), Some(RoleName::Admin));
        assert_eq!(
            RoleName::normalize("role_hq_teacher"),
            Some(RoleName::HqTeacher)
        );
        assert_eq!(
            RoleName::normalize(" Franchise_Teacher "),
            Some(RoleName::FranchiseTeacher)
        );
        assert_eq!(RoleName::normalize("STUDENT"), Some(RoleName::Student));
        assert_eq!(RoleName::normalize("teacher"), None);
        assert_eq!(RoleName::normalize(""), None);
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&RoleName::HqTeacher).unwrap();
        assert_eq!(json, "\"HQ_TEACHER\"");
        let role: RoleName = serde_json::from_str("\"ROLE_student\"").unwrap();
        assert_eq!(role, RoleName::Student);
        assert!(serde_json::from_str::<RoleName>("\"guest\"").is_err());
    }

    #[test]
    fn test_principal_from_raw_roles_drops_unknown() {
        let p = Principal::from_raw_roles(7, &["ROLE_STUDENT", "guest", "admin"]);
        assert_eq!(p.id, 7);
        assert_eq!(p.roles.len(), 2);
        assert!(p.has_role(RoleName::Student));
        assert!(p.has_role(RoleName::Admin));
        assert!(p.has_any_role(RoleName::teacher_roles()));
    }

    #[test]
    fn test_teacher_roles_gate() {
        assert!(!Principal::new(4, [RoleName::Student]).has_any_role(RoleName::teacher_roles()));
        assert!(
            Principal::new(3, [RoleName::FranchiseTeacher]).has_any_role(RoleName::teacher_roles())
        );
        assert!(!Principal::new(5, std::iter::empty()).has_any_role(RoleName::teacher_roles()));
    }
}
