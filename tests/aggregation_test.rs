//! Aggregation Integration Tests — Progress, Badges, Roll-Ups
//!
//! Drives the usecase layer against a real store in a temp directory,
//! plus mockall-based port tests for write-behavior assertions the
//! real store can't express (how many updates, with which fields).

use std::sync::Arc;

use mockall::mock;
use serde_json::{Map, Value, json};
use tempfile::TempDir;

use learnhub_core::adapters::persistence::JsonStore;
use learnhub_core::domain::course::CourseStatus;
use learnhub_core::domain::quiz::Question;
use learnhub_core::domain::scoring::BadgeTier;
use learnhub_core::domain::user::Role;
use learnhub_core::ports::store::{DocumentStore, StoreResult};
use learnhub_core::usecases::assessment::AssessmentService;
use learnhub_core::usecases::courses::{CourseRepo, NewCourse};
use learnhub_core::usecases::enrollment::{EnrollOutcome, EnrollmentService};
use learnhub_core::usecases::instructor::InstructorReports;
use learnhub_core::usecases::progress_tracker::ProgressTracker;
use learnhub_core::usecases::quizzes::{NewQuiz, QuizRepo};
use learnhub_core::usecases::users::{NewUser, UserRepo};

// ---- Fixture ----

struct Fixture {
    _dir: TempDir,
    store: Arc<JsonStore>,
    instructor_id: String,
    learner_id: String,
    course_id: String,
}

fn question(correct: usize) -> Question {
    Question {
        text: "pick one".to_string(),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_option_index: correct,
    }
}

fn new_user(name: &str, email: &str, role: Role) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "demo-password".to_string(),
        role,
        avatar: None,
    }
}

fn new_course(title: &str, instructor: &str, content_items: usize) -> NewCourse {
    NewCourse {
        title: title.to_string(),
        description: "fixture course".to_string(),
        price: rust_decimal_macros::dec!(19.99),
        thumbnail: None,
        instructor: instructor.to_string(),
        content: (0..content_items)
            .map(|i| json!({"id": format!("item-{i}"), "title": format!("Item {i}")}))
            .collect(),
    }
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::open(dir.path()).await.unwrap());

    let users = UserRepo::new(Arc::clone(&store));
    let instructor = users
        .register(new_user("Dr. Jane Smith", "jane@fixture.io", Role::Instructor))
        .await
        .unwrap();
    let learner = users
        .register(new_user("Alex Johnson", "alex@fixture.io", Role::Learner))
        .await
        .unwrap();

    let courses = CourseRepo::new(Arc::clone(&store));
    let course = courses
        .create(new_course("Intro to Rust", &instructor.id, 2))
        .await
        .unwrap();
    courses
        .set_status(&course.id, CourseStatus::Published)
        .await
        .unwrap();

    Fixture {
        _dir: dir,
        store,
        instructor_id: instructor.id,
        learner_id: learner.id,
        course_id: course.id,
    }
}

async fn add_quiz(fx: &Fixture, correct: &[usize]) -> String {
    QuizRepo::new(Arc::clone(&fx.store))
        .create(NewQuiz {
            title: "Fixture Quiz".to_string(),
            course: fx.course_id.clone(),
            questions: correct.iter().map(|&c| question(c)).collect(),
        })
        .await
        .unwrap()
        .id
}

// ---- Quiz submission scenarios ----

#[tokio::test]
async fn test_perfect_submission_awards_legend_and_completes_quiz() {
    let fx = fixture().await;
    let quiz_id = add_quiz(&fx, &[0, 1, 2, 3]).await;

    let submission = AssessmentService::new(Arc::clone(&fx.store))
        .submit_quiz(&fx.learner_id, &quiz_id, &[0, 1, 2, 3])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(submission.result.score, 4);
    assert_eq!(submission.result.total_questions, 4);
    assert_eq!(submission.percentage, 100.0);
    assert_eq!(submission.badge, BadgeTier::Legend);
    assert!(submission.badge_awarded);

    let user = UserRepo::new(Arc::clone(&fx.store))
        .find_by_id(&fx.learner_id)
        .await
        .unwrap()
        .unwrap();
    assert!(user.badges.contains("Legend"));
    assert!(
        user.progress_for(&fx.course_id)
            .unwrap()
            .completed_quizzes
            .contains(&quiz_id)
    );
}

#[tokio::test]
async fn test_half_score_hits_inclusive_newbie_boundary() {
    let fx = fixture().await;
    let quiz_id = add_quiz(&fx, &[0, 1, 2, 3]).await;

    let submission = AssessmentService::new(Arc::clone(&fx.store))
        .submit_quiz(&fx.learner_id, &quiz_id, &[1, 0, 2, 3])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(submission.result.score, 2);
    assert_eq!(submission.percentage, 50.0);
    assert_eq!(submission.badge, BadgeTier::Newbie);
}

#[tokio::test]
async fn test_badge_is_never_duplicated() {
    let fx = fixture().await;
    let first = add_quiz(&fx, &[0, 0]).await;
    let second = add_quiz(&fx, &[1, 1]).await;
    let assessment = AssessmentService::new(Arc::clone(&fx.store));

    let a = assessment
        .submit_quiz(&fx.learner_id, &first, &[0, 0])
        .await
        .unwrap()
        .unwrap();
    let b = assessment
        .submit_quiz(&fx.learner_id, &second, &[1, 1])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(a.badge, BadgeTier::Legend);
    assert_eq!(b.badge, BadgeTier::Legend);
    assert!(a.badge_awarded);
    assert!(!b.badge_awarded);

    let user = UserRepo::new(Arc::clone(&fx.store))
        .find_by_id(&fx.learner_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.badges.iter().filter(|b| *b == "Legend").count(), 1);

    // Both quizzes are completed even though only one badge was new.
    let entry = user.progress_for(&fx.course_id).unwrap();
    assert!(entry.completed_quizzes.contains(&first));
    assert!(entry.completed_quizzes.contains(&second));
}

#[tokio::test]
async fn test_every_submission_creates_a_result() {
    let fx = fixture().await;
    let quiz_id = add_quiz(&fx, &[0]).await;
    let assessment = AssessmentService::new(Arc::clone(&fx.store));

    for _ in 0..3 {
        assessment
            .submit_quiz(&fx.learner_id, &quiz_id, &[0])
            .await
            .unwrap()
            .unwrap();
    }

    let results = learnhub_core::usecases::results::ResultRepo::new(Arc::clone(&fx.store))
        .find_by_user(&fx.learner_id)
        .await
        .unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_submitting_missing_quiz_is_none() {
    let fx = fixture().await;
    let outcome = AssessmentService::new(Arc::clone(&fx.store))
        .submit_quiz(&fx.learner_id, "no-such-quiz", &[0])
        .await
        .unwrap();
    assert!(outcome.is_none());
}

// ---- Enrollment and progress ----

#[tokio::test]
async fn test_double_enroll_keeps_single_roster_entry() {
    let fx = fixture().await;
    let enrollment = EnrollmentService::new(Arc::clone(&fx.store));

    let first = enrollment.enroll(&fx.course_id, &fx.learner_id).await.unwrap();
    let second = enrollment.enroll(&fx.course_id, &fx.learner_id).await.unwrap();
    assert_eq!(first, EnrollOutcome::Enrolled);
    assert_eq!(second, EnrollOutcome::AlreadyEnrolled);

    let course = CourseRepo::new(Arc::clone(&fx.store))
        .find_by_id(&fx.course_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        course
            .enrolled_students
            .iter()
            .filter(|id| *id == fx.learner_id)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_content_toggle_is_idempotent_and_reversible() {
    let fx = fixture().await;
    let tracker = ProgressTracker::new(Arc::clone(&fx.store));

    for _ in 0..2 {
        tracker
            .set_content_completed(&fx.learner_id, &fx.course_id, "item-0", true)
            .await
            .unwrap()
            .unwrap();
    }
    let entry = tracker
        .set_content_completed(&fx.learner_id, &fx.course_id, "item-0", true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.completed_content.iter().filter(|id| *id == "item-0").count(), 1);

    let entry = tracker
        .set_content_completed(&fx.learner_id, &fx.course_id, "item-0", false)
        .await
        .unwrap()
        .unwrap();
    assert!(!entry.completed_content.contains("item-0"));

    let entry = tracker
        .set_content_completed(&fx.learner_id, &fx.course_id, "item-0", true)
        .await
        .unwrap()
        .unwrap();
    assert!(entry.completed_content.contains("item-0"));
}

#[tokio::test]
async fn test_progress_percentage_over_course_lifecycle() {
    let fx = fixture().await;
    let quiz_id = add_quiz(&fx, &[0]).await;
    let enrollment = EnrollmentService::new(Arc::clone(&fx.store));
    let tracker = ProgressTracker::new(Arc::clone(&fx.store));
    let users = UserRepo::new(Arc::clone(&fx.store));

    enrollment.enroll(&fx.course_id, &fx.learner_id).await.unwrap();

    // 2 content items + 1 quiz = 3 total items, none complete.
    let user = users.find_by_id(&fx.learner_id).await.unwrap().unwrap();
    let listing = &enrollment.my_courses(&user).await.unwrap()[0];
    assert_eq!(listing.total_items, 3);
    assert_eq!(listing.progress, 0);

    // Progress only ever grows as items complete.
    tracker
        .set_content_completed(&fx.learner_id, &fx.course_id, "item-0", true)
        .await
        .unwrap();
    let user = users.find_by_id(&fx.learner_id).await.unwrap().unwrap();
    let one_done = enrollment.my_courses(&user).await.unwrap()[0].progress;
    assert_eq!(one_done, 33);

    tracker
        .set_content_completed(&fx.learner_id, &fx.course_id, "item-1", true)
        .await
        .unwrap();
    AssessmentService::new(Arc::clone(&fx.store))
        .submit_quiz(&fx.learner_id, &quiz_id, &[0])
        .await
        .unwrap();

    let user = users.find_by_id(&fx.learner_id).await.unwrap().unwrap();
    let listing = &enrollment.my_courses(&user).await.unwrap()[0];
    assert_eq!(listing.completed_items, 3);
    assert_eq!(listing.progress, 100);
}

#[tokio::test]
async fn test_course_without_items_reports_zero_progress() {
    let fx = fixture().await;
    let courses = CourseRepo::new(Arc::clone(&fx.store));
    let empty = courses
        .create(new_course("Empty Shell", &fx.instructor_id, 0))
        .await
        .unwrap();

    let enrollment = EnrollmentService::new(Arc::clone(&fx.store));
    enrollment.enroll(&empty.id, &fx.learner_id).await.unwrap();

    let user = UserRepo::new(Arc::clone(&fx.store))
        .find_by_id(&fx.learner_id)
        .await
        .unwrap()
        .unwrap();
    let listings = enrollment.my_courses(&user).await.unwrap();
    let listing = listings.iter().find(|l| l.course.id == empty.id).unwrap();
    assert_eq!(listing.total_items, 0);
    assert_eq!(listing.progress, 0);
}

// ---- Joins and roll-ups ----

#[tokio::test]
async fn test_dangling_instructor_becomes_placeholder() {
    let fx = fixture().await;
    let courses = CourseRepo::new(Arc::clone(&fx.store));
    courses
        .create(new_course("Orphaned", "deleted-user", 0))
        .await
        .unwrap();

    let listings = courses.list_all_with_instructor().await.unwrap();
    let orphaned = listings
        .iter()
        .find(|l| l.course.title == "Orphaned")
        .unwrap();
    assert_eq!(orphaned.instructor.name, "Unknown");
    assert_eq!(orphaned.instructor.email, "");

    // The healthy course still resolves normally.
    let healthy = listings
        .iter()
        .find(|l| l.course.title == "Intro to Rust")
        .unwrap();
    assert_eq!(healthy.instructor.name, "Dr. Jane Smith");
}

#[tokio::test]
async fn test_dangling_student_is_dropped_from_detail() {
    let fx = fixture().await;
    let courses = CourseRepo::new(Arc::clone(&fx.store));
    let enrollment = EnrollmentService::new(Arc::clone(&fx.store));
    enrollment.enroll(&fx.course_id, &fx.learner_id).await.unwrap();

    // Sneak a dangling id onto the roster via a whole-course save.
    let mut course = courses.find_by_id(&fx.course_id).await.unwrap().unwrap();
    course.enrolled_students.insert("ghost-user");
    courses.save(&course).await.unwrap();

    let detail = courses
        .get_with_instructor_and_students(&fx.course_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.course.enrolled_students.len(), 2);
    assert_eq!(detail.students.len(), 1);
    assert_eq!(detail.students[0].id, fx.learner_id);
}

#[tokio::test]
async fn test_learner_roster_dedups_across_courses() {
    let fx = fixture().await;
    let courses = CourseRepo::new(Arc::clone(&fx.store));
    let enrollment = EnrollmentService::new(Arc::clone(&fx.store));
    let users = UserRepo::new(Arc::clone(&fx.store));

    let second = courses
        .create(new_course("Advanced Rust", &fx.instructor_id, 1))
        .await
        .unwrap();
    let priya = users
        .register(new_user("Priya Patel", "priya@fixture.io", Role::Learner))
        .await
        .unwrap();

    enrollment.enroll(&fx.course_id, &fx.learner_id).await.unwrap();
    enrollment.enroll(&second.id, &fx.learner_id).await.unwrap();
    enrollment.enroll(&second.id, &priya.id).await.unwrap();

    let roster = InstructorReports::new(Arc::clone(&fx.store))
        .learner_roster(&fx.instructor_id)
        .await
        .unwrap();

    assert_eq!(roster.len(), 2);
    let alex = roster.iter().find(|l| l.id == fx.learner_id).unwrap();
    assert_eq!(alex.courses, vec!["Intro to Rust", "Advanced Rust"]);
    let priya_row = roster.iter().find(|l| l.id == priya.id).unwrap();
    assert_eq!(priya_row.courses, vec!["Advanced Rust"]);
    // No avatar stored: falls back to the name's first letter.
    assert_eq!(priya_row.avatar, "P");
}

#[tokio::test]
async fn test_learner_roster_drops_dangling_enrollments() {
    let fx = fixture().await;
    let courses = CourseRepo::new(Arc::clone(&fx.store));

    let mut course = courses.find_by_id(&fx.course_id).await.unwrap().unwrap();
    course.enrolled_students.insert("ghost-user");
    courses.save(&course).await.unwrap();

    let roster = InstructorReports::new(Arc::clone(&fx.store))
        .learner_roster(&fx.instructor_id)
        .await
        .unwrap();
    assert!(roster.iter().all(|l| l.id != "ghost-user"));
}

#[tokio::test]
async fn test_results_by_course_retains_only_its_quizzes() {
    let fx = fixture().await;
    let quizzes = QuizRepo::new(Arc::clone(&fx.store));
    let courses = CourseRepo::new(Arc::clone(&fx.store));
    let assessment = AssessmentService::new(Arc::clone(&fx.store));

    // q1 and q3 belong to the fixture course, q2 to another one.
    let other = courses
        .create(new_course("Other Course", &fx.instructor_id, 0))
        .await
        .unwrap();
    let q1 = add_quiz(&fx, &[0]).await;
    let q2 = quizzes
        .create(NewQuiz {
            title: "Other Quiz".to_string(),
            course: other.id.clone(),
            questions: vec![question(0)],
        })
        .await
        .unwrap()
        .id;
    let q3 = add_quiz(&fx, &[1]).await;

    for quiz in [&q1, &q2, &q3] {
        assessment
            .submit_quiz(&fx.learner_id, quiz, &[0])
            .await
            .unwrap()
            .unwrap();
    }

    let rows = InstructorReports::new(Arc::clone(&fx.store))
        .results_by_course(&fx.course_id)
        .await
        .unwrap();

    let kept: Vec<_> = rows.iter().map(|r| r.result.quiz.clone()).collect();
    assert_eq!(kept.len(), 2);
    assert!(kept.contains(&q1));
    assert!(kept.contains(&q3));
    assert!(!kept.contains(&q2));

    // Display joins resolve.
    assert_eq!(rows[0].user.as_ref().unwrap().name, "Alex Johnson");
    assert!(rows.iter().all(|r| r.quiz.is_some()));
}

#[tokio::test]
async fn test_results_by_course_nulls_dangling_user() {
    let fx = fixture().await;
    let quiz_id = add_quiz(&fx, &[0]).await;

    // A result for a user that no longer exists.
    learnhub_core::usecases::results::ResultRepo::new(Arc::clone(&fx.store))
        .create(learnhub_core::usecases::results::NewResult {
            user: "deleted-user".to_string(),
            quiz: quiz_id.clone(),
            score: 1,
            total_questions: 1,
        })
        .await
        .unwrap();

    let rows = InstructorReports::new(Arc::clone(&fx.store))
        .results_by_course(&fx.course_id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].user.is_none());
    assert!(rows[0].quiz.is_some());
}

// ---- Login flow ----

#[tokio::test]
async fn test_register_rejects_duplicate_email_and_login_verifies() {
    let fx = fixture().await;
    let users = UserRepo::new(Arc::clone(&fx.store));

    let dup = users
        .register(new_user("Imposter", "alex@fixture.io", Role::Learner))
        .await;
    assert!(dup.is_err());

    let ok = users
        .verify_login("alex@fixture.io", "demo-password")
        .await
        .unwrap();
    assert!(ok.is_some());

    let bad = users
        .verify_login("alex@fixture.io", "wrong-password")
        .await
        .unwrap();
    assert!(bad.is_none());
}

// ---- Mocked port: write-behavior assertions ----

mock! {
    pub Store {}

    #[async_trait::async_trait]
    impl DocumentStore for Store {
        async fn find_all(&self, collection: &str) -> StoreResult<Vec<Value>>;

        async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

        async fn find_one(
            &self,
            collection: &str,
            filter: &learnhub_core::ports::store::Filter,
        ) -> StoreResult<Option<Value>>;

        async fn find(
            &self,
            collection: &str,
            filter: &learnhub_core::ports::store::Filter,
        ) -> StoreResult<Vec<Value>>;

        async fn create(
            &self,
            collection: &str,
            fields: Map<String, Value>,
        ) -> StoreResult<Value>;

        async fn update(
            &self,
            collection: &str,
            id: &str,
            changes: Map<String, Value>,
        ) -> StoreResult<Option<Value>>;
    }
}

fn stored_quiz() -> Value {
    json!({
        "id": "q1",
        "title": "Mocked Quiz",
        "course": "c1",
        "questions": [
            {"text": "t", "options": ["a", "b"], "correctOptionIndex": 0}
        ],
        "createdAt": "2026-03-01T10:00:00.000Z",
    })
}

fn stored_user(badges: Value, progress: Value) -> Value {
    json!({
        "id": "u1",
        "name": "Mock User",
        "email": "mock@fixture.io",
        "passwordHash": "$argon2id$stub",
        "role": "learner",
        "badges": badges,
        "courseProgress": progress,
        "createdAt": "2026-03-01T10:00:00.000Z",
    })
}

fn echo_create(collection: &str, mut fields: Map<String, Value>) -> StoreResult<Value> {
    let _ = collection;
    fields.insert("id".to_string(), json!("r-mock"));
    fields.insert("createdAt".to_string(), json!("2026-03-01T10:00:00.000Z"));
    Ok(Value::Object(fields))
}

#[tokio::test]
async fn test_resubmission_with_nothing_new_writes_no_user_update() {
    let mut store = MockStore::new();

    store
        .expect_find_by_id()
        .withf(|collection, id| collection == "quizzes" && id == "q1")
        .returning(|_, _| Ok(Some(stored_quiz())));
    store.expect_create().returning(echo_create);
    store
        .expect_find_by_id()
        .withf(|collection, id| collection == "users" && id == "u1")
        .returning(|_, _| {
            Ok(Some(stored_user(
                json!(["Legend"]),
                json!({"c1": {"completedContent": [], "completedQuizzes": ["q1"]}}),
            )))
        });
    // Badge already held and quiz already completed: no write at all.
    store.expect_update().times(0);

    let submission = AssessmentService::new(Arc::new(store))
        .submit_quiz("u1", "q1", &[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(submission.badge, BadgeTier::Legend);
    assert!(!submission.badge_awarded);
}

#[tokio::test]
async fn test_first_submission_writes_badge_and_progress_together() {
    let mut store = MockStore::new();

    store
        .expect_find_by_id()
        .withf(|collection, id| collection == "quizzes" && id == "q1")
        .returning(|_, _| Ok(Some(stored_quiz())));
    store.expect_create().returning(echo_create);
    store
        .expect_find_by_id()
        .withf(|collection, id| collection == "users" && id == "u1")
        .returning(|_, _| Ok(Some(stored_user(json!([]), json!({})))));

    // Both effects changed, so they arrive in one update call.
    store
        .expect_update()
        .times(1)
        .withf(|collection, id, changes| {
            collection == "users"
                && id == "u1"
                && changes.contains_key("badges")
                && changes.contains_key("courseProgress")
        })
        .returning(|_, _, changes| {
            let mut user = stored_user(json!([]), json!({}));
            let obj = user.as_object_mut().unwrap();
            for (k, v) in changes {
                obj.insert(k, v);
            }
            Ok(Some(user))
        });

    let submission = AssessmentService::new(Arc::new(store))
        .submit_quiz("u1", "q1", &[0])
        .await
        .unwrap()
        .unwrap();
    assert!(submission.badge_awarded);
}
