mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Create a portal-enabled customer and log into the portal with it,
/// returning (customer_id, portal token)
async fn portal_customer(
    client: &reqwest::Client,
    base_url: &str,
    firm_token: &str,
    email: &str,
) -> Result<(String, String)> {
    let customer_id = common::create_customer(
        client,
        base_url,
        firm_token,
        json!({
            "name": "Portal Customer",
            "phone_number": "555-0123",
            "email": email,
            "password": "secret123",
            "enable_portal_access": true
        }),
    )
    .await?;

    let res = client
        .post(format!("{}/api/customer/login", base_url))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "portal login failed: {}", res.status());
    let body: Value = res.json().await?;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    Ok((customer_id, token))
}

#[tokio::test]
async fn portal_login_and_profile() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (firm_token, _) =
        common::signup_firm(&client, &server.base_url, &common::unique_email("portal-firm")).await?;
    let email = common::unique_email("portal-cust");

    let (customer_id, portal_token) =
        portal_customer(&client, &server.base_url, &firm_token, &email).await?;

    let res = client
        .get(format!("{}/api/customer/profile", server.base_url))
        .bearer_auth(&portal_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["id"], json!(customer_id));
    assert_eq!(body["data"]["email"], json!(email));
    // Login stamped the last_login timestamp
    assert!(body["data"]["last_login"].is_string());
    Ok(())
}

#[tokio::test]
async fn portal_token_sees_exactly_its_own_matters() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (firm_token, _) =
        common::signup_firm(&client, &server.base_url, &common::unique_email("iso-firm")).await?;

    let (jane_id, jane_token) = portal_customer(
        &client,
        &server.base_url,
        &firm_token,
        &common::unique_email("jane"),
    )
    .await?;
    let (robert_id, _) = portal_customer(
        &client,
        &server.base_url,
        &firm_token,
        &common::unique_email("robert"),
    )
    .await?;

    common::create_matter(&client, &server.base_url, &firm_token, &jane_id, "Jane's Matter").await?;
    common::create_matter(&client, &server.base_url, &firm_token, &robert_id, "Robert's Matter")
        .await?;

    let res = client
        .get(format!("{}/api/customer/matters", server.base_url))
        .bearer_auth(&jane_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let matters = body["data"].as_array().unwrap();
    assert_eq!(matters.len(), 1);
    assert_eq!(matters[0]["name"], "Jane's Matter");
    Ok(())
}

#[tokio::test]
async fn portal_login_failures_are_uniform() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (firm_token, _) =
        common::signup_firm(&client, &server.base_url, &common::unique_email("fail-firm")).await?;
    let email = common::unique_email("fail-cust");
    portal_customer(&client, &server.base_url, &firm_token, &email).await?;

    let wrong_password = client
        .post(format!("{}/api/customer/login", server.base_url))
        .json(&json!({ "email": email, "password": "wrong" }))
        .send()
        .await?;
    let unknown_email = client
        .post(format!("{}/api/customer/login", server.base_url))
        .json(&json!({ "email": common::unique_email("ghost"), "password": "secret123" }))
        .send()
        .await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.json::<Value>().await?,
        unknown_email.json::<Value>().await?
    );
    Ok(())
}

#[tokio::test]
async fn token_types_do_not_cross_boundaries() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (firm_token, _) =
        common::signup_firm(&client, &server.base_url, &common::unique_email("cross-firm")).await?;
    let (_, portal_token) = portal_customer(
        &client,
        &server.base_url,
        &firm_token,
        &common::unique_email("cross-cust"),
    )
    .await?;

    // A portal token cannot drive the firm-side CRUD surface
    let res = client
        .get(format!("{}/api/customers", server.base_url))
        .bearer_auth(&portal_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A firm token is not a portal identity
    let res = client
        .get(format!("{}/api/customer/profile", server.base_url))
        .bearer_auth(&firm_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
