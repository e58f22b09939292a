mod common;

use academy::{
    domain::{
        CourseRecord, EnrollmentStatus, NewPayment, PaymentMethod, PaymentStatus, PriceInputs,
    },
    error::AppError,
    repository::{
        CourseRepository, EnrollmentRepository, PaymentRepository, SqliteCourseRepository,
        SqliteEnrollmentRepository, SqlitePaymentRepository,
    },
};
use chrono::Utc;

fn record(title: &str, slug: &str, category: Option<&str>) -> CourseRecord {
    let pricing = PriceInputs::for_create(Some(1000.0), Some(10.0), None);
    CourseRecord {
        title: title.to_string(),
        slug: slug.to_string(),
        subtitle: None,
        category: category.map(str::to_string),
        description: None,
        duration: Some("8 weeks".to_string()),
        instructor: None,
        level: None,
        features: vec!["Mentoring".to_string(), "Placement support".to_string()],
        tags: None,
        rating: 4.5,
        students_count: 120,
        next_batch: None,
        discount_price: pricing.discount_price(),
        pricing,
    }
}

#[tokio::test]
async fn test_course_crud() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteCourseRepository::new(pool.clone());

    let course = repo.create(record("Data Engineering", "data-engineering", Some("Data"))).await?;
    assert_eq!(course.discount_price, 1062.0);
    assert_eq!(course.gst_percent, 18.0);
    assert_eq!(course.features.len(), 2);

    let found = repo.find_by_slug("data-engineering").await?;
    assert_eq!(found.map(|c| c.id), Some(course.id));

    assert!(repo.slug_exists("data-engineering", None).await?);
    assert!(!repo.slug_exists("data-engineering", Some(course.id)).await?);
    assert!(!repo.slug_exists("nothing-here", None).await?);

    let mut changed = record("Data Engineering Pro", "data-engineering-pro", Some("Data"));
    changed.features = Vec::new();
    let updated = repo.update(course.id, changed).await?;
    assert_eq!(updated.slug, "data-engineering-pro");
    assert!(updated.features.is_empty());

    let missing = repo.update(9999, record("Ghost", "ghost", None)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    assert_eq!(repo.count().await?, 1);
    assert!(repo.delete(course.id).await?);
    assert!(!repo.delete(course.id).await?);
    assert!(repo.find_by_id(course.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_related_courses() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteCourseRepository::new(pool.clone());

    let base = repo.create(record("Azure", "azure", Some("Cloud"))).await?;
    let aws = repo.create(record("AWS", "aws", Some("Cloud"))).await?;
    let gcp = repo.create(record("GCP", "gcp", Some("Cloud"))).await?;
    repo.create(record("Tally", "tally", Some("ERP"))).await?;

    let related = repo.list_related(base.id, Some("Cloud"), 3).await?;
    let ids: Vec<i64> = related.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![gcp.id, aws.id]);

    let limited = repo.list_related(base.id, Some("Cloud"), 1).await?;
    assert_eq!(limited.len(), 1);

    let by_ids = repo.list_by_ids(&[gcp.id, base.id]).await?;
    assert_eq!(by_ids.len(), 2);
    assert!(repo.list_by_ids(&[]).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_enrollment_upsert_and_payment_states() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("repo@example.com").await?;
    let course = ctx.course("Tableau", "Data", 700.0).await?;

    let payments = SqlitePaymentRepository::new(ctx.pool.clone());
    let enrollments = SqliteEnrollmentRepository::new(ctx.pool.clone());

    let new_payment = || NewPayment {
        student_id: student.id,
        course_id: course.id,
        amount: 826.0,
        currency: "INR".to_string(),
        payment_method: PaymentMethod::Upi,
        upi_id: Some("repo@okbank".to_string()),
    };

    let first = payments.create(new_payment()).await?;
    let second = payments.create(new_payment()).await?;
    assert_eq!(first.status, PaymentStatus::Pending);
    assert_eq!(first.provider, "upi");

    let a = enrollments.upsert(student.id, course.id, EnrollmentStatus::Pending, first.id).await?;
    let b = enrollments.upsert(student.id, course.id, EnrollmentStatus::Pending, second.id).await?;
    assert_eq!(a.id, b.id);
    assert_eq!(b.payment_id, Some(second.id));
    assert_eq!(enrollments.list().await?.len(), 1);

    let completed = payments.mark_completed(second.id, "upi_1", Utc::now()).await?;
    assert_eq!(completed.status, PaymentStatus::Completed);
    assert_eq!(completed.upi_id.as_deref(), Some("repo@okbank"));

    // Terminal states stay put
    let again = payments.mark_completed(second.id, "upi_2", Utc::now()).await;
    assert!(matches!(again, Err(AppError::Validation(_))));
    let still_completed = payments.mark_failed(second.id).await?;
    assert_eq!(still_completed.status, PaymentStatus::Completed);

    let failed = payments.mark_failed(first.id).await?;
    assert_eq!(failed.status, PaymentStatus::Failed);

    assert_eq!(payments.count_by_status(PaymentStatus::Failed).await?, 1);
    assert_eq!(payments.find_by_student(student.id).await?.len(), 2);

    let active = enrollments.update_status(b.id, EnrollmentStatus::Active).await?;
    assert_eq!(active.status, EnrollmentStatus::Active);
    assert_eq!(enrollments.count_by_status(EnrollmentStatus::Active).await?, 1);

    // Courses with payments cannot be removed
    let blocked = SqliteCourseRepository::new(ctx.pool.clone()).delete(course.id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    Ok(())
}
