//! Integration tests for the school-resource repositories: tenant
//! filtering on lists, account linkage, and per-student sub-lists.

use campus_core::error::CampusError;
use campus_core::models::account::{CreateAccount, Role};
use campus_core::models::attendance::CreateAttendance;
use campus_core::models::grade::{CreateGrade, UpdateGrade};
use campus_core::models::license::LicenseType;
use campus_core::models::student::{CreateStudent, Student};
use campus_core::models::subject::CreateSubject;
use campus_core::models::tenant::{CreateTenant, TenantId};
use campus_core::models::topic::CreateTopic;
use campus_core::repository::{
    AccountRepository, AttendanceRepository, GradeRepository, Pagination, StudentRepository,
    SubjectRepository, TenantRepository, TopicRepository,
};
use campus_db::repository::{
    SurrealAccountRepository, SurrealAttendanceRepository, SurrealGradeRepository,
    SurrealStudentRepository, SurrealSubjectRepository, SurrealTenantRepository,
    SurrealTopicRepository,
};
use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> (Surreal<surrealdb::engine::local::Db>, TenantId, TenantId) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();

    let tenants = SurrealTenantRepository::new(db.clone());
    let mut ids = Vec::new();
    for name in ["North Campus", "South Campus"] {
        let created = tenants
            .create(CreateTenant {
                name: name.into(),
                logo_url: None,
                license_type: LicenseType::Pro,
                license_duration_days: 365,
            })
            .await
            .unwrap();
        ids.push(created.tenant.id);
    }
    let second = ids.pop().unwrap();
    let first = ids.pop().unwrap();
    (db, first, second)
}

fn student_input(tenant_id: &TenantId, first_name: &str) -> CreateStudent {
    CreateStudent {
        tenant_id: tenant_id.clone(),
        account_id: None,
        first_name: first_name.into(),
        last_name: "Doe".into(),
        email: None,
        career_id: None,
    }
}

async fn new_student(
    db: &Surreal<surrealdb::engine::local::Db>,
    tenant_id: &TenantId,
    first_name: &str,
) -> Student {
    SurrealStudentRepository::new(db.clone())
        .create(student_input(tenant_id, first_name))
        .await
        .unwrap()
}

#[tokio::test]
async fn student_lists_are_tenant_filtered() {
    let (db, first, second) = setup().await;
    let repo = SurrealStudentRepository::new(db.clone());

    new_student(&db, &first, "Ana").await;
    new_student(&db, &first, "Ben").await;
    new_student(&db, &second, "Cho").await;

    let page = repo.list(&first, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|s| s.tenant_id == first));

    let page = repo.list(&second, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].first_name, "Cho");
}

#[tokio::test]
async fn get_by_account_links_student_to_login() {
    let (db, tenant, _) = setup().await;
    let accounts = SurrealAccountRepository::new(db.clone());
    let students = SurrealStudentRepository::new(db.clone());

    let account = accounts
        .create(CreateAccount {
            tenant_id: tenant.clone(),
            name: "Dana".into(),
            email: "dana@example.com".into(),
            password: "password-123".into(),
            role: Role::Student,
        })
        .await
        .unwrap();

    let mut input = student_input(&tenant, "Dana");
    input.account_id = Some(account.id);
    let student = students.create(input).await.unwrap();

    let linked = students.get_by_account(&tenant, account.id).await.unwrap();
    assert_eq!(linked.id, student.id);

    // An unlinked account has no student record.
    assert!(matches!(
        students
            .get_by_account(&tenant, uuid::Uuid::new_v4())
            .await
            .unwrap_err(),
        CampusError::NotFound { .. }
    ));
}

#[tokio::test]
async fn topics_list_by_subject() {
    let (db, tenant, _) = setup().await;
    let subjects = SurrealSubjectRepository::new(db.clone());
    let topics = SurrealTopicRepository::new(db.clone());

    let algebra = subjects
        .create(CreateSubject {
            tenant_id: tenant.clone(),
            name: "Algebra".into(),
            career_id: None,
            teacher_id: None,
        })
        .await
        .unwrap();
    let history = subjects
        .create(CreateSubject {
            tenant_id: tenant.clone(),
            name: "History".into(),
            career_id: None,
            teacher_id: None,
        })
        .await
        .unwrap();

    for name in ["Linear equations", "Polynomials"] {
        topics
            .create(CreateTopic {
                tenant_id: tenant.clone(),
                subject_id: algebra.id,
                name: name.into(),
                description: String::new(),
            })
            .await
            .unwrap();
    }
    topics
        .create(CreateTopic {
            tenant_id: tenant.clone(),
            subject_id: history.id,
            name: "The Enlightenment".into(),
            description: String::new(),
        })
        .await
        .unwrap();

    let page = topics
        .list_by_subject(&tenant, algebra.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|t| t.subject_id == algebra.id));
}

#[tokio::test]
async fn grades_list_by_student_and_update() {
    let (db, tenant, _) = setup().await;
    let grades = SurrealGradeRepository::new(db.clone());
    let subjects = SurrealSubjectRepository::new(db.clone());

    let ana = new_student(&db, &tenant, "Ana").await;
    let ben = new_student(&db, &tenant, "Ben").await;
    let subject = subjects
        .create(CreateSubject {
            tenant_id: tenant.clone(),
            name: "Physics".into(),
            career_id: None,
            teacher_id: None,
        })
        .await
        .unwrap();

    for (student_id, score) in [(ana.id, 8.5), (ana.id, 9.0), (ben.id, 6.0)] {
        grades
            .create(CreateGrade {
                tenant_id: tenant.clone(),
                student_id,
                subject_id: subject.id,
                score,
                term: "2026-1".into(),
            })
            .await
            .unwrap();
    }

    let page = grades
        .list_by_student(&tenant, ana.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|g| g.student_id == ana.id));

    let grade = &page.items[0];
    let updated = grades
        .update(
            grade.id,
            UpdateGrade {
                score: Some(10.0),
                term: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.score, 10.0);
    assert_eq!(updated.term, grade.term);
}

#[tokio::test]
async fn attendance_round_trips_dates() {
    let (db, tenant, _) = setup().await;
    let attendance = SurrealAttendanceRepository::new(db.clone());
    let subjects = SurrealSubjectRepository::new(db.clone());

    let ana = new_student(&db, &tenant, "Ana").await;
    let subject = subjects
        .create(CreateSubject {
            tenant_id: tenant.clone(),
            name: "Chemistry".into(),
            career_id: None,
            teacher_id: None,
        })
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
    let record = attendance
        .create(CreateAttendance {
            tenant_id: tenant.clone(),
            student_id: ana.id,
            subject_id: subject.id,
            date,
            present: true,
        })
        .await
        .unwrap();
    assert_eq!(record.date, date);

    let fetched = attendance.get_by_id(record.id).await.unwrap();
    assert_eq!(fetched.date, date);
    assert!(fetched.present);

    let page = attendance
        .list_by_student(&tenant, ana.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}
