use std::sync::Arc;

use academy::{
    auth::AuthService,
    config::Settings,
    domain::{BlogInput, CourseInput, NewOperator, NewStudent, Role},
    notifications::{LogMailer, NotificationQueue},
    repository::{
        OperatorRepository, SqliteOperatorRepository,
        SqliteStudentRepository, StudentRepository,
    },
    service::ServiceContext,
};
use chrono::Utc;
use clap::Parser;
use fake::{
    faker::{lorem::en::Sentence, name::en::Name},
    Fake,
};
use rand::{seq::SliceRandom, Rng};
use sqlx::sqlite::SqlitePoolOptions;

const CATEGORIES: &[&str] = &["Development", "Data", "Cloud", "ERP", "Design"];
const LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];

#[derive(Parser, Debug)]
#[command(about = "Populate a development database with sample data")]
struct Args {
    /// Database URL (defaults to the configured one)
    #[arg(long)]
    database_url: Option<String>,

    /// Number of courses to create
    #[arg(long, default_value_t = 12)]
    courses: usize,

    /// Number of blog posts to create
    #[arg(long, default_value_t = 4)]
    posts: usize,

    /// Password given to every seeded account
    #[arg(long, default_value = "password123")]
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let settings = Settings::new().unwrap_or_default();
    let database_url = args
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url.clone());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let password_hash = AuthService::hash_password(&args.password).await?;

    println!("🔑 Creating operators...");
    let operator_repo = SqliteOperatorRepository::new(db_pool.clone());
    for (username, role) in [("admin", Role::Admin), ("developer", Role::Developer)] {
        if operator_repo.find_by_username(username).await?.is_some() {
            println!("   {} already exists, skipping", username);
            continue;
        }
        operator_repo
            .create(NewOperator {
                username: username.to_string(),
                password_hash: password_hash.clone(),
                role: Some(role),
            })
            .await?;
    }

    println!("🎓 Creating a verified student...");
    let student_repo = SqliteStudentRepository::new(db_pool.clone());
    let student_email = "student@academy.local";
    if student_repo.find_by_email(student_email).await?.is_none() {
        let student = student_repo
            .create(NewStudent {
                username: Name().fake(),
                email: student_email.to_string(),
                mobile: Some(format!("98{:08}", rand::thread_rng().gen_range(0..100_000_000))),
                password_hash: password_hash.clone(),
                verification_token_hash: String::new(),
                verification_expires: Utc::now(),
            })
            .await?;
        student_repo.mark_verified(student.id).await?;
    }

    println!("📚 Creating {} courses...", args.courses);
    let (queue, _worker) = NotificationQueue::start(Arc::new(LogMailer), None, 16);
    let context = ServiceContext::new(db_pool.clone(), &settings, Arc::new(queue));
    let mut rng = rand::thread_rng();

    for _ in 0..args.courses {
        let title: String = Sentence(2..5).fake();
        let title = title.trim_end_matches('.').to_string();
        let category = CATEGORIES.choose(&mut rng).map(|c| c.to_string());
        let level = LEVELS.choose(&mut rng).map(|l| l.to_string());

        let course = context
            .course_service
            .create(CourseInput {
                title: Some(title),
                subtitle: Some(Sentence(4..8).fake()),
                category,
                description: Some(Sentence(10..20).fake()),
                duration: Some(format!("{} weeks", rng.gen_range(4..16))),
                instructor: Some(Name().fake()),
                level,
                features: Some(vec![
                    "Live sessions".to_string(),
                    "Project work".to_string(),
                    "Certificate".to_string(),
                ]),
                rating: Some(rng.gen_range(35..50) as f64 / 10.0),
                students_count: Some(rng.gen_range(20..2000)),
                price: Some(rng.gen_range(10..80) as f64 * 500.0),
                discount_percent: Some([0.0, 10.0, 15.0, 25.0][rng.gen_range(0..4)]),
                ..Default::default()
            })
            .await?;

        println!("   {} → {:.2}", course.slug, course.discount_price);
    }

    println!("📝 Creating {} blog posts...", args.posts);
    for i in 0..args.posts {
        let title: String = Sentence(3..7).fake();
        let post = context
            .blog_service
            .create(BlogInput {
                title: Some(title.trim_end_matches('.').to_string()),
                category: CATEGORIES.choose(&mut rng).map(|c| c.to_string()),
                tag: Some("Career".to_string()),
                img_url: Some(format!("https://picsum.photos/seed/academy{}/800/450", i)),
                excerpt: Some(Sentence(12..24).fake()),
                created_by: Some(Name().fake()),
                ..Default::default()
            })
            .await?;

        println!("   {}", post.slug);
    }

    println!("✅ Seeding complete. Accounts use password '{}'.", args.password);

    Ok(())
}
