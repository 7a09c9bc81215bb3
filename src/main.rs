//! LearnHub Core — Entry Point
//!
//! Initializes configuration, logging, and the flat-file document
//! store, then brings a fresh installation to a usable state.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate (defaults when the file is absent)
//! 2. Init tracing (JSON structured logging)
//! 3. Open the document store (first boot persists the empty collections)
//! 4. Seed demo accounts, a course, and a quiz when the store is empty
//! 5. Log the course catalog and an instructor roll-up as a smoke report

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal_macros::dec;
use serde_json::json;
use tracing::info;

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::persistence::JsonStore;
use config::SeedConfig;
use domain::course::CourseStatus;
use domain::user::Role;
use ports::store::DocumentStore;
use usecases::assessment::AssessmentService;
use usecases::courses::{CourseRepo, NewCourse};
use usecases::enrollment::EnrollmentService;
use usecases::instructor::InstructorReports;
use usecases::progress_tracker::ProgressTracker;
use usecases::quizzes::{NewQuiz, QuizRepo};
use usecases::users::{NewUser, UserRepo};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.app.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.store.data_dir,
        "Starting LearnHub data core"
    );

    // ── 3. Open the flat-file document store ────────────────
    let store = Arc::new(
        JsonStore::open(&config.store.data_dir)
            .await
            .context("Failed to open document store")?,
    );

    // ── 4. Seed demo data on an empty installation ──────────
    let users = UserRepo::new(Arc::clone(&store));
    if config.seed.enabled && users.find_all().await?.is_empty() {
        seed_demo_data(&store, &config.seed)
            .await
            .context("Failed to seed demo data")?;
    }

    // ── 5. Smoke report: catalog + instructor roll-up ───────
    let catalog = CourseRepo::new(Arc::clone(&store))
        .list_all_with_instructor()
        .await?;
    for listing in &catalog {
        info!(
            course = %listing.course.title,
            status = ?listing.course.status,
            instructor = %listing.instructor.name,
            enrolled = listing.course.enrolled_students.len(),
            "Course"
        );
    }

    if let Some(instructor) = users.find_by_email("jane.smith@learnhub.io").await? {
        let reports = InstructorReports::new(Arc::clone(&store));
        for learner in reports.learner_roster(&instructor.id).await? {
            info!(
                learner = %learner.name,
                courses = learner.courses.len(),
                badges = learner.badges.len(),
                "Roster entry"
            );
        }
    }

    info!("Data core ready");
    Ok(())
}

/// Populate a fresh store with a small, coherent demo data set:
/// one instructor, two learners, a published course with content,
/// a quiz, enrollments, and one graded submission.
async fn seed_demo_data<S: DocumentStore>(store: &Arc<S>, seed: &SeedConfig) -> Result<()> {
    let users = UserRepo::new(Arc::clone(store));
    let courses = CourseRepo::new(Arc::clone(store));
    let quizzes = QuizRepo::new(Arc::clone(store));
    let enrollment = EnrollmentService::new(Arc::clone(store));
    let progress = ProgressTracker::new(Arc::clone(store));
    let assessment = AssessmentService::new(Arc::clone(store));

    let instructor = users
        .register(NewUser {
            name: "Dr. Jane Smith".to_string(),
            email: "jane.smith@learnhub.io".to_string(),
            password: seed.demo_password.clone(),
            role: Role::Instructor,
            avatar: None,
        })
        .await?;

    let alex = users
        .register(NewUser {
            name: "Alex Johnson".to_string(),
            email: "alex@learnhub.io".to_string(),
            password: seed.demo_password.clone(),
            role: Role::Learner,
            avatar: None,
        })
        .await?;

    let priya = users
        .register(NewUser {
            name: "Priya Patel".to_string(),
            email: "priya@learnhub.io".to_string(),
            password: seed.demo_password.clone(),
            role: Role::Learner,
            avatar: None,
        })
        .await?;

    let course = courses
        .create(NewCourse {
            title: "Introduction to Rust".to_string(),
            description: "Ownership, borrowing, and fearless concurrency from scratch."
                .to_string(),
            price: dec!(49.99),
            thumbnail: None,
            instructor: instructor.id.clone(),
            content: vec![
                json!({"id": "getting-started", "title": "Getting Started", "kind": "video"}),
                json!({"id": "ownership", "title": "Ownership and Borrowing", "kind": "video"}),
            ],
        })
        .await?;
    courses.set_status(&course.id, CourseStatus::Published).await?;

    let quiz = quizzes
        .create(NewQuiz {
            title: "Ownership Basics".to_string(),
            course: course.id.clone(),
            questions: vec![
                question("Who owns a value after a move?", &["The new binding", "Both bindings", "Neither", "The allocator"], 0),
                question("How many mutable borrows may coexist?", &["Two", "One", "Unlimited", "Zero"], 1),
                question("When is a value dropped?", &["Never", "At program exit", "When its owner goes out of scope", "On every borrow"], 2),
                question("Which type is heap-allocated?", &["i32", "bool", "[u8; 4]", "String"], 3),
            ],
        })
        .await?;

    enrollment.enroll(&course.id, &alex.id).await?;
    enrollment.enroll(&course.id, &priya.id).await?;

    progress
        .set_content_completed(&alex.id, &course.id, "getting-started", true)
        .await?;
    assessment
        .submit_quiz(&alex.id, &quiz.id, &[0, 1, 2, 3])
        .await?;

    info!(
        course = %course.title,
        quiz = %quiz.title,
        "Demo data seeded"
    );
    Ok(())
}

fn question(text: &str, options: &[&str], correct: usize) -> domain::quiz::Question {
    domain::quiz::Question {
        text: text.to_string(),
        options: options.iter().map(ToString::to_string).collect(),
        correct_option_index: correct,
    }
}
