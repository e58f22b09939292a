mod common;

use academy::{
    domain::{
        ConfirmPaymentRequest, CreatePaymentRequest, EnrollmentStatus, PaymentDetails,
        PaymentStatus,
    },
    error::AppError,
    notifications::Notification,
    repository::{EnrollmentRepository, PaymentRepository, SqliteEnrollmentRepository, SqlitePaymentRepository},
};

fn upi_payment(course_id: i64, upi_id: &str) -> CreatePaymentRequest {
    CreatePaymentRequest {
        course_id: Some(course_id),
        amount: Some(1062.0),
        currency: None,
        payment_method: Some("UPI".to_string()),
        payment_details: PaymentDetails {
            upi_id: Some(upi_id.to_string()),
        },
    }
}

fn confirm(payment_id: i64, provider_payment_id: &str) -> ConfirmPaymentRequest {
    ConfirmPaymentRequest {
        payment_id: Some(payment_id),
        provider_payment_id: Some(provider_payment_id.to_string()),
        payment_details: PaymentDetails::default(),
    }
}

#[tokio::test]
async fn test_repeated_create_keeps_single_pending_enrollment() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("asha@example.com").await?;
    let course = ctx.course("Data Analytics", "Data", 1000.0).await?;
    let service = &ctx.context.enrollment_service;

    let first = service.create_payment(student.id, upi_payment(course.id, "asha@okbank")).await?;
    let second = service.create_payment(student.id, upi_payment(course.id, "asha@okbank")).await?;
    assert_ne!(first.payment_id, second.payment_id);

    let enrollments = SqliteEnrollmentRepository::new(ctx.pool.clone())
        .find_by_student(student.id, None)
        .await?;
    assert_eq!(enrollments.len(), 1);
    assert_eq!(enrollments[0].status, EnrollmentStatus::Pending);
    assert_eq!(enrollments[0].payment_id, Some(second.payment_id));

    assert_eq!(first.payment.status, PaymentStatus::Pending);
    assert!(second.client_secret.ends_with(&second.payment_id.to_string()));

    Ok(())
}

#[tokio::test]
async fn test_prefix_mismatch_fails_payment_only() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("ravi@example.com").await?;
    let course = ctx.course("Cloud Foundations", "Cloud", 1500.0).await?;
    let service = &ctx.context.enrollment_service;

    let intent = service.create_payment(student.id, upi_payment(course.id, "ravi@upi")).await?;

    let result = service.confirm_payment(student.id, confirm(intent.payment_id, "nb_12345")).await;
    match result {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Invalid UPI transaction ID"),
        other => panic!("expected validation error, got {:?}", other.map(|c| c.payment.id)),
    }

    let payment = SqlitePaymentRepository::new(ctx.pool.clone())
        .find_by_id(intent.payment_id)
        .await?
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);

    let enrollment = SqliteEnrollmentRepository::new(ctx.pool.clone())
        .find_by_student_and_course(student.id, course.id)
        .await?
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Pending);

    // A failed payment cannot be retried
    let retry = service.confirm_payment(student.id, confirm(intent.payment_id, "upi_12345")).await;
    assert!(matches!(retry, Err(AppError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn test_confirm_activates_enrollment() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("meera@example.com").await?;
    let course = ctx.course("Full Stack Web Development", "Development", 1000.0).await?;
    let service = &ctx.context.enrollment_service;

    let intent = service.create_payment(student.id, upi_payment(course.id, "meera@okaxis")).await?;
    let confirmed = service
        .confirm_payment(student.id, confirm(intent.payment_id, "upi_998877"))
        .await?;

    assert_eq!(confirmed.payment.status, PaymentStatus::Completed);
    assert_eq!(confirmed.payment.provider_payment_id.as_deref(), Some("upi_998877"));
    assert_eq!(confirmed.payment.upi_id.as_deref(), Some("meera@okaxis"));
    assert!(confirmed.payment.transaction_time.is_some());
    assert_eq!(confirmed.enrollment.status, EnrollmentStatus::Active);
    assert_eq!(confirmed.enrollment.payment_id, Some(intent.payment_id));
    assert_eq!(confirmed.course.id, course.id);

    let courses = service.active_courses(student.id).await?;
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].id, course.id);

    let activated = ctx.notifier.all().into_iter().any(|n| matches!(
        n,
        Notification::EnrollmentActivated { ref email, .. } if email == "meera@example.com"
    ));
    assert!(activated);

    // Active enrollments are never downgraded by a new payment
    let again = service.create_payment(student.id, upi_payment(course.id, "meera@okaxis")).await;
    assert!(matches!(again, Err(AppError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn test_confirm_requires_ownership() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let owner = ctx.student("owner@example.com").await?;
    let other = ctx.student("other@example.com").await?;
    let course = ctx.course("SAP FICO", "ERP", 2000.0).await?;
    let service = &ctx.context.enrollment_service;

    let intent = service.create_payment(owner.id, upi_payment(course.id, "owner@okbank")).await?;

    let result = service.confirm_payment(other.id, confirm(intent.payment_id, "upi_1")).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let missing = service.confirm_payment(owner.id, confirm(9999, "upi_1")).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let payment = SqlitePaymentRepository::new(ctx.pool.clone())
        .find_by_id(intent.payment_id)
        .await?
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn test_mismatched_upi_id_changes_nothing() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("kiran@example.com").await?;
    let course = ctx.course("Power BI", "Data", 800.0).await?;
    let service = &ctx.context.enrollment_service;

    let intent = service.create_payment(student.id, upi_payment(course.id, "kiran@okbank")).await?;

    let mut request = confirm(intent.payment_id, "upi_555");
    request.payment_details.upi_id = Some("someone@else".to_string());
    let result = service.confirm_payment(student.id, request).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let payment = SqlitePaymentRepository::new(ctx.pool.clone())
        .find_by_id(intent.payment_id)
        .await?
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    // Matching id proceeds
    let mut request = confirm(intent.payment_id, "upi_555");
    request.payment_details.upi_id = Some("kiran@okbank".to_string());
    let confirmed = service.confirm_payment(student.id, request).await?;
    assert_eq!(confirmed.payment.status, PaymentStatus::Completed);

    Ok(())
}

#[tokio::test]
async fn test_net_banking_and_cash_prefixes() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("neha@example.com").await?;
    let banking = ctx.course("DevOps Bootcamp", "Cloud", 3000.0).await?;
    let cash = ctx.course("UI Design", "Design", 900.0).await?;
    let service = &ctx.context.enrollment_service;

    let intent = service
        .create_payment(student.id, CreatePaymentRequest {
            course_id: Some(banking.id),
            amount: Some(3540.0),
            currency: Some("inr".to_string()),
            payment_method: Some("Net Banking".to_string()),
            payment_details: PaymentDetails::default(),
        })
        .await?;
    assert_eq!(intent.payment.currency, "INR");
    assert_eq!(intent.payment.provider, "net banking");

    let confirmed = service.confirm_payment(student.id, confirm(intent.payment_id, "nb_20240101")).await?;
    assert_eq!(confirmed.enrollment.status, EnrollmentStatus::Active);

    let intent = service
        .create_payment(student.id, CreatePaymentRequest {
            course_id: Some(cash.id),
            amount: Some(1062.0),
            currency: None,
            payment_method: Some("cash".to_string()),
            payment_details: PaymentDetails::default(),
        })
        .await?;
    let confirmed = service.confirm_payment(student.id, confirm(intent.payment_id, "receipt-17")).await?;
    assert_eq!(confirmed.payment.status, PaymentStatus::Completed);

    assert_eq!(service.active_courses(student.id).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_create_validation() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("val@example.com").await?;
    let course = ctx.course("Python Basics", "Development", 500.0).await?;
    let service = &ctx.context.enrollment_service;

    let bad_upi = service.create_payment(student.id, upi_payment(course.id, "not-an-upi")).await;
    assert!(matches!(bad_upi, Err(AppError::Validation(_))));

    let mut zero = upi_payment(course.id, "val@okbank");
    zero.amount = Some(0.0);
    assert!(matches!(service.create_payment(student.id, zero).await, Err(AppError::Validation(_))));

    let mut nan = upi_payment(course.id, "val@okbank");
    nan.amount = Some(f64::NAN);
    assert!(matches!(service.create_payment(student.id, nan).await, Err(AppError::Validation(_))));

    let missing_course = service.create_payment(student.id, upi_payment(4242, "val@okbank")).await;
    assert!(matches!(missing_course, Err(AppError::NotFound(_))));

    let mut card = upi_payment(course.id, "val@okbank");
    card.payment_method = Some("Card".to_string());
    assert!(matches!(service.create_payment(student.id, card).await, Err(AppError::Validation(_))));

    let missing_method = CreatePaymentRequest {
        course_id: Some(course.id),
        amount: Some(10.0),
        ..Default::default()
    };
    match service.create_payment(student.id, missing_method).await {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "payment_method is required"),
        other => panic!("unexpected {:?}", other.map(|i| i.payment_id)),
    }

    // Nothing was written
    let payments = service.payments_for_student(student.id).await?;
    assert!(payments.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_admin_enrollment_status_transitions() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("admin-flow@example.com").await?;
    let course = ctx.course("Java Masterclass", "Development", 1200.0).await?;
    let service = &ctx.context.enrollment_service;

    let intent = service.create_payment(student.id, upi_payment(course.id, "flow@okbank")).await?;
    let enrollment_id = intent.enrollment.id;

    let invalid = service.update_enrollment_status(enrollment_id, "graduated").await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));

    let cancelled = service.update_enrollment_status(enrollment_id, "cancelled").await?;
    assert_eq!(cancelled.status, EnrollmentStatus::Cancelled);

    let reopen = service.update_enrollment_status(enrollment_id, "active").await;
    assert!(matches!(reopen, Err(AppError::Validation(_))));

    let missing = service.update_enrollment_status(777, "active").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let summaries = service.recent_payments().await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].student_username.as_deref(), Some("admin-flow"));
    assert_eq!(summaries[0].course_title.as_deref(), Some("Java Masterclass"));

    Ok(())
}

#[tokio::test]
async fn test_superseded_payment_cannot_activate() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("dev@example.com").await?;
    let course = ctx.course("Salesforce Admin", "Cloud", 1100.0).await?;
    let service = &ctx.context.enrollment_service;
    let payments = SqlitePaymentRepository::new(ctx.pool.clone());
    let enrollments = SqliteEnrollmentRepository::new(ctx.pool.clone());

    let older = service.create_payment(student.id, upi_payment(course.id, "dev@okbank")).await?;
    let newer = service.create_payment(student.id, upi_payment(course.id, "dev@okbank")).await?;

    let stale = service.confirm_payment(student.id, confirm(older.payment_id, "upi_111")).await;
    assert!(matches!(stale, Err(AppError::Validation(_))));

    // Nothing moved
    let older_payment = payments.find_by_id(older.payment_id).await?.unwrap();
    assert_eq!(older_payment.status, PaymentStatus::Pending);
    let enrollment = enrollments.find_by_student_and_course(student.id, course.id).await?.unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Pending);
    assert_eq!(enrollment.payment_id, Some(newer.payment_id));

    let confirmed = service.confirm_payment(student.id, confirm(newer.payment_id, "upi_222")).await?;
    assert_eq!(confirmed.enrollment.status, EnrollmentStatus::Active);
    assert_eq!(confirmed.enrollment.payment_id, Some(newer.payment_id));

    let completed = payments
        .find_by_student(student.id)
        .await?
        .into_iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .count();
    assert_eq!(completed, 1);

    Ok(())
}

#[tokio::test]
async fn test_cancelled_enrollment_is_not_reactivated() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let student = ctx.student("cancel@example.com").await?;
    let course = ctx.course("Oracle DBA", "Database", 1300.0).await?;
    let service = &ctx.context.enrollment_service;

    let intent = service.create_payment(student.id, upi_payment(course.id, "cancel@okbank")).await?;
    service.update_enrollment_status(intent.enrollment.id, "cancelled").await?;

    let result = service.confirm_payment(student.id, confirm(intent.payment_id, "upi_333")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let enrollment = SqliteEnrollmentRepository::new(ctx.pool.clone())
        .find_by_id(intent.enrollment.id)
        .await?
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Cancelled);

    let payment = SqlitePaymentRepository::new(ctx.pool.clone())
        .find_by_id(intent.payment_id)
        .await?
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(service.active_courses(student.id).await?.is_empty());

    // A fresh payment reopens the enrollment
    let retry = service.create_payment(student.id, upi_payment(course.id, "cancel@okbank")).await?;
    let confirmed = service.confirm_payment(student.id, confirm(retry.payment_id, "upi_444")).await?;
    assert_eq!(confirmed.enrollment.status, EnrollmentStatus::Active);

    Ok(())
}
