//! 访问控制判定
//!
//! 所有函数都是纯函数：输入操作者与预先查询好的快照，输出是否允许。
//! 快照缺失时一律拒绝，不做任何 I/O。

use uuid::Uuid;

use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::files::entities::AssignmentFile;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::{Principal, RoleName};

pub fn is_admin(principal: &Principal) -> bool {
    principal.has_role(RoleName::Admin)
}

/// 管理员、总部教师或加盟教师
pub fn is_teacher(principal: &Principal) -> bool {
    principal.has_any_role(RoleName::teacher_roles())
}

/// 可以以学生身份提交作业（教师也可以）
pub fn is_student_capable(principal: &Principal) -> bool {
    is_teacher(principal) || principal.has_role(RoleName::Student)
}

/// 教师可见全部作业，其他人只能看到已发布的作业
pub fn can_access_assignment(principal: &Principal, assignment: Option<&Assignment>) -> bool {
    let Some(assignment) = assignment else {
        return false;
    };
    if is_admin(principal) || is_teacher(principal) {
        return true;
    }
    assignment.status == AssignmentStatus::Published
}

/// 管理员或作业创建者（需为教师）
pub fn can_modify_assignment(principal: &Principal, assignment: Option<&Assignment>) -> bool {
    let Some(assignment) = assignment else {
        return false;
    };
    if is_admin(principal) {
        return true;
    }
    is_teacher(principal) && assignment.creator_id == principal.id
}

pub fn can_access_submission(principal: &Principal, submission: Option<&Submission>) -> bool {
    let Some(submission) = submission else {
        return false;
    };
    if is_admin(principal) || is_teacher(principal) {
        return true;
    }
    submission.student_id == principal.id
}

/// 管理员可批改任何提交，教师只能批改自己作业下的提交
pub fn can_grade_submission(
    principal: &Principal,
    submission: Option<&Submission>,
    assignment: Option<&Assignment>,
) -> bool {
    if !(is_admin(principal) || is_teacher(principal)) {
        return false;
    }
    if submission.is_none() {
        return false;
    }
    if is_admin(principal) {
        return true;
    }
    assignment.is_some_and(|a| a.creator_id == principal.id)
}

pub fn can_delete_submission(principal: &Principal, submission: Option<&Submission>) -> bool {
    if is_admin(principal) {
        return true;
    }
    let Some(submission) = submission else {
        return false;
    };
    is_student_capable(principal) && submission.student_id == principal.id
}

/// `lookup` 根据文件所属作业 ID 返回作业快照
pub fn can_access_file<'a>(
    principal: &Principal,
    file: Option<&AssignmentFile>,
    lookup: impl FnOnce(Uuid) -> Option<&'a Assignment>,
) -> bool {
    let Some(file) = file else {
        return false;
    };
    if is_admin(principal) || file.uploaded_by == principal.id {
        return true;
    }
    match file.assignment_id {
        Some(assignment_id) => can_access_assignment(principal, lookup(assignment_id)),
        None => false,
    }
}

pub fn can_delete_file<'a>(
    principal: &Principal,
    file: Option<&AssignmentFile>,
    lookup: impl FnOnce(Uuid) -> Option<&'a Assignment>,
) -> bool {
    let Some(file) = file else {
        return false;
    };
    if is_admin(principal) || file.uploaded_by == principal.id {
        return true;
    }
    match file.assignment_id {
        Some(assignment_id) if is_teacher(principal) => {
            can_modify_assignment(principal, lookup(assignment_id))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::files::entities::FileCategory;
    use crate::models::submissions::entities::SubmissionStatus;

    fn principal(id: i64, roles: &[RoleName]) -> Principal {
        Principal::new(id, roles.iter().copied())
    }

    fn assignment(creator_id: i64, status: AssignmentStatus) -> Assignment {
        let now = chrono::Utc::now();
        Assignment {
            id: Uuid::new_v4(),
            title: "Essay".into(),
            description: None,
            creator_id,
            due_date: None,
            max_score: Some(100),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn submission(assignment_id: Uuid, student_id: i64) -> Submission {
        let now = chrono::Utc::now();
        Submission {
            id: Uuid::new_v4(),
            assignment_id,
            student_id,
            content: Some("answer".into()),
            file_path: None,
            score: None,
            feedback: None,
            status: SubmissionStatus::Submitted,
            submitted_at: now,
            graded_at: None,
            graded_by: None,
            updated_at: now,
        }
    }

    fn file(uploaded_by: i64, assignment_id: Option<Uuid>) -> AssignmentFile {
        AssignmentFile {
            id: Uuid::new_v4(),
            assignment_id,
            uploaded_by,
            file_name: "brief.pdf".into(),
            file_path: "/files/brief.pdf".into(),
            file_size: None,
            file_type: None,
            file_category: FileCategory::Attachment,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_role_predicates() {
        let admin = principal(1, &[RoleName::Admin]);
        let hq = principal(2, &[RoleName::HqTeacher]);
        let franchise = principal(3, &[RoleName::FranchiseTeacher]);
        let student = principal(4, &[RoleName::Student]);
        let nobody = principal(5, &[]);

        assert!(is_admin(&admin) && is_teacher(&admin) && is_student_capable(&admin));
        assert!(!is_admin(&hq) && is_teacher(&hq) && is_student_capable(&hq));
        assert!(is_teacher(&franchise));
        assert!(!is_teacher(&student) && is_student_capable(&student));
        assert!(!is_student_capable(&nobody));
    }

    #[test]
    fn test_student_sees_only_published() {
        let student = principal(4, &[RoleName::Student]);
        for status in [AssignmentStatus::Draft, AssignmentStatus::Closed] {
            assert!(!can_access_assignment(&student, Some(&assignment(2, status))));
        }
        assert!(can_access_assignment(
            &student,
            Some(&assignment(2, AssignmentStatus::Published))
        ));
        assert!(!can_access_assignment(&student, None));

        let teacher = principal(9, &[RoleName::FranchiseTeacher]);
        assert!(can_access_assignment(
            &teacher,
            Some(&assignment(2, AssignmentStatus::Draft))
        ));
    }

    #[test]
    fn test_modify_requires_ownership() {
        let owner = principal(2, &[RoleName::HqTeacher]);
        let other = principal(3, &[RoleName::HqTeacher]);
        let admin = principal(1, &[RoleName::Admin]);
        let student_with_same_id = principal(2, &[RoleName::Student]);
        let a = assignment(2, AssignmentStatus::Draft);

        assert!(can_modify_assignment(&owner, Some(&a)));
        assert!(!can_modify_assignment(&other, Some(&a)));
        assert!(can_modify_assignment(&admin, Some(&a)));
        assert!(!can_modify_assignment(&student_with_same_id, Some(&a)));
        assert!(!can_modify_assignment(&admin, None));
    }

    #[test]
    fn test_submission_access_and_grading() {
        let a = assignment(2, AssignmentStatus::Published);
        let s = submission(a.id, 4);
        let owner_teacher = principal(2, &[RoleName::HqTeacher]);
        let other_teacher = principal(3, &[RoleName::FranchiseTeacher]);
        let admin = principal(1, &[RoleName::Admin]);
        let student = principal(4, &[RoleName::Student]);
        let classmate = principal(5, &[RoleName::Student]);

        assert!(can_access_submission(&student, Some(&s)));
        assert!(!can_access_submission(&classmate, Some(&s)));
        assert!(can_access_submission(&other_teacher, Some(&s)));

        assert!(can_grade_submission(&owner_teacher, Some(&s), Some(&a)));
        assert!(!can_grade_submission(&other_teacher, Some(&s), Some(&a)));
        assert!(!can_grade_submission(&owner_teacher, Some(&s), None));
        assert!(can_grade_submission(&admin, Some(&s), None));
        assert!(!can_grade_submission(&admin, None, Some(&a)));
        assert!(!can_grade_submission(&student, Some(&s), Some(&a)));
    }

    #[test]
    fn test_delete_submission() {
        let s = submission(Uuid::new_v4(), 4);
        assert!(can_delete_submission(&principal(1, &[RoleName::Admin]), None));
        assert!(can_delete_submission(
            &principal(4, &[RoleName::Student]),
            Some(&s)
        ));
        assert!(!can_delete_submission(
            &principal(5, &[RoleName::Student]),
            Some(&s)
        ));
        assert!(!can_delete_submission(&principal(4, &[]), Some(&s)));
        assert!(!can_delete_submission(
            &principal(4, &[RoleName::Student]),
            None
        ));
    }

    #[test]
    fn test_file_access_follows_assignment() {
        let published = assignment(2, AssignmentStatus::Published);
        let draft = assignment(2, AssignmentStatus::Draft);
        let student = principal(4, &[RoleName::Student]);

        let f = file(2, Some(published.id));
        assert!(can_access_file(&student, Some(&f), |_| Some(&published)));
        assert!(!can_access_file(&student, Some(&f), |_| Some(&draft)));
        assert!(!can_access_file(&student, Some(&f), |_| None));

        let own = file(4, None);
        assert!(can_access_file(&student, Some(&own), |_| None));
        let orphan = file(2, None);
        assert!(!can_access_file(&student, Some(&orphan), |_| None));
        assert!(!can_access_file(&student, None, |_| None));
    }

    #[test]
    fn test_file_delete_rules() {
        let a = assignment(2, AssignmentStatus::Published);
        let f = file(7, Some(a.id));
        let owner_teacher = principal(2, &[RoleName::HqTeacher]);
        let other_teacher = principal(3, &[RoleName::HqTeacher]);
        let student = principal(4, &[RoleName::Student]);

        assert!(can_delete_file(&owner_teacher, Some(&f), |_| Some(&a)));
        assert!(!can_delete_file(&other_teacher, Some(&f), |_| Some(&a)));
        assert!(!can_delete_file(&student, Some(&f), |_| Some(&a)));
        assert!(can_delete_file(&principal(7, &[]), Some(&f), |_| None));
        assert!(can_delete_file(&principal(1, &[RoleName::Admin]), Some(&f), |_| None));
    }
}
