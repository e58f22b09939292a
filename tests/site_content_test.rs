mod common;

use academy::{domain::Role, notifications::Notification};
use axum::http::{Method, StatusCode};
use serde_json::json;

fn franchise_form() -> serde_json::Value {
    json!({
        "name": "Suresh Patil",
        "mobile": "9823012345",
        "email": "Suresh@Example.com",
        "city": "Nagpur",
        "interested": "Training centre franchise"
    })
}

#[tokio::test]
async fn test_franchise_enquiry_flow() -> anyhow::Result<()> {
    let mut settings = common::test_settings();
    settings.mail.admin_address = Some("admin@academy.test".to_string());
    let ctx = common::setup_with(settings).await?;
    let app = ctx.app();

    let (status, lead) = common::send_from(
        &app,
        Method::POST,
        "/api/franchise/submit",
        None,
        Some(franchise_form()),
        Some("198.51.100.4"),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lead["status"], "pending");
    assert_eq!(lead["email"], "suresh@example.com");
    assert_eq!(lead["ip"], "198.51.100.4");

    let sent = ctx.notifier.all();
    assert_eq!(sent.len(), 2);
    assert!(matches!(sent[0], Notification::FranchiseReceived { .. }));
    assert!(matches!(sent[1], Notification::FranchiseAlert(_)));

    let mut short_mobile = franchise_form();
    short_mobile["mobile"] = json!("98230");
    let (status, body) = common::send(&app, Method::POST, "/api/franchise/submit", None, Some(short_mobile)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Mobile number must be 10 digits");

    let mut blank_city = franchise_form();
    blank_city["city"] = json!("  ");
    let (status, body) = common::send(&app, Method::POST, "/api/franchise/submit", None, Some(blank_city)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");
    assert_eq!(ctx.notifier.all().len(), 2);

    let (status, _) = common::send(&app, Method::GET, "/api/franchise/all", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let developer = ctx.operator_token("franchise-dev", Some(Role::Developer)).await?;
    let (status, leads) = common::send(&app, Method::GET, "/api/franchise/all", Some(&developer), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(leads.as_array().map(Vec::len), Some(1));

    let id = lead["id"].as_i64().unwrap();
    let status_uri = format!("/api/franchise/{}/status", id);
    let (status, _) = common::send(
        &app,
        Method::PUT,
        &status_uri,
        Some(&developer),
        Some(json!({ "status": "approved" })),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = ctx.operator_token("franchise-admin", Some(Role::Admin)).await?;
    let (status, body) = common::send(
        &app,
        Method::PUT,
        &status_uri,
        Some(&admin),
        Some(json!({ "status": "won" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid status");

    let (status, updated) = common::send(
        &app,
        Method::PUT,
        &status_uri,
        Some(&admin),
        Some(json!({ "status": "approved", "notes": "Site visit done" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "approved");
    assert_eq!(updated["notes"], "Site visit done");

    let (status, stats) = common::send(&app, Method::GET, "/api/franchise/stats", Some(&developer), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["approved"], 1);
    assert_eq!(stats["pending"], 0);

    let lead_uri = format!("/api/franchise/{}", id);
    let (status, _) = common::send(&app, Method::DELETE, &lead_uri, Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = common::send(&app, Method::GET, &lead_uri, Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_blog_crud() -> anyhow::Result<()> {
    let ctx = common::setup().await?;
    let app = ctx.app();
    let developer = ctx.operator_token("writer", Some(Role::Developer)).await?;

    let post = json!({
        "title": "Why Learn Data Engineering",
        "category": "Data",
        "tag": "Career",
        "img_url": "https://cdn.academy.test/de.png",
        "excerpt": "Pipelines are everywhere"
    });

    let (status, _) = common::send(&app, Method::POST, "/api/blogs", None, Some(post.clone())).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut no_image = post.clone();
    no_image["img_url"] = json!("");
    let (status, body) = common::send(&app, Method::POST, "/api/blogs", Some(&developer), Some(no_image)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "img_url is required");

    let (status, created) = common::send(&app, Method::POST, "/api/blogs", Some(&developer), Some(post.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "why-learn-data-engineering");

    let (status, second) = common::send(&app, Method::POST, "/api/blogs", Some(&developer), Some(post)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(second["slug"], created["slug"]);

    let (status, posts) = common::send(&app, Method::GET, "/api/blogs", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().map(Vec::len), Some(2));

    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/blogs/{}", id);
    let (status, updated) = common::send(
        &app,
        Method::PUT,
        &uri,
        Some(&developer),
        Some(json!({ "title": "Data Engineering in 2025", "tag": "" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Data Engineering in 2025");
    // Published links stay stable
    assert_eq!(updated["slug"], "why-learn-data-engineering");
    assert!(updated["tag"].is_null());
    assert_eq!(updated["excerpt"], "Pipelines are everywhere");

    let (status, _) = common::send(
        &app,
        Method::PUT,
        &uri,
        Some(&developer),
        Some(json!({ "category": " " })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, by_slug) = common::send(&app, Method::GET, "/api/blogs/slug/why-learn-data-engineering", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_slug["id"], id);

    let (status, _) = common::send(&app, Method::DELETE, &uri, Some(&developer), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = common::send(&app, Method::DELETE, &uri, Some(&developer), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_job_applications() -> anyhow::Result<()> {
    let mut settings = common::test_settings();
    settings.mail.admin_address = Some("admin@academy.test".to_string());
    settings
        .mail
        .hr_addresses
        .insert("Mumbai".to_string(), "hr.mum@academy.test".to_string());
    let ctx = common::setup_with(settings).await?;
    let app = ctx.app();

    let application = |location: &str| {
        json!({
            "name": "Farah Khan",
            "email": "farah@example.com",
            "phone": "9000011111",
            "position": "Cloud Trainer",
            "experience": 4,
            "expected_ctc_amount": 900000,
            "expected_ctc_currency": "INR",
            "expected_ctc_period": "yearly",
            "location": location
        })
    };

    let (status, first) = common::send(&app, Method::POST, "/api/applications", None, Some(application("mumbai"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["position"], "Cloud Trainer");

    let (status, second) = common::send(&app, Method::POST, "/api/applications", None, Some(application("Pune"))).await?;
    assert_eq!(status, StatusCode::CREATED);

    let routes: Vec<Option<String>> = ctx
        .notifier
        .all()
        .into_iter()
        .filter_map(|n| match n {
            Notification::ApplicationReceived { hr_address, .. } => Some(hr_address),
            _ => None,
        })
        .collect();
    assert_eq!(routes, vec![Some("hr.mum@academy.test".to_string()), None]);

    let mut bad = application("Delhi");
    bad["experience"] = json!(-2);
    let (status, _) = common::send(&app, Method::POST, "/api/applications", None, Some(bad)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let developer = ctx.operator_token("hiring-dev", Some(Role::Developer)).await?;
    let (status, _) = common::send(&app, Method::GET, "/api/applications", Some(&developer), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = ctx.operator_token("hiring-admin", Some(Role::Admin)).await?;
    let (status, all) = common::send(&app, Method::GET, "/api/applications", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();

    let (status, body) = common::send(
        &app,
        Method::DELETE,
        "/api/applications/bulk-delete",
        Some(&admin),
        Some(json!({ "ids": [] })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ids required");

    let (status, body) = common::send(
        &app,
        Method::DELETE,
        "/api/applications/bulk-delete",
        Some(&admin),
        Some(json!({ "ids": [first_id, 9999] })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (status, fetched) = common::send(&app, Method::GET, &format!("/api/applications/{}", second_id), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["location"], "Pune");

    let uri = format!("/api/applications/{}", second_id);
    let (status, _) = common::send(&app, Method::DELETE, &uri, Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = common::send(&app, Method::DELETE, &uri, Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, stats) = common::send(&app, Method::GET, "/admin/dashboard", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["job_applications"], 0);

    Ok(())
}
