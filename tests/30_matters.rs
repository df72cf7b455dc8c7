mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn matter_crud_under_own_customer() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (token, _) = common::signup_firm(&client, &server.base_url, &common::unique_email("matters")).await?;
    let customer_id = common::create_customer(
        &client,
        &server.base_url,
        &token,
        json!({ "name": "Jane Smith", "phone_number": "555-0123" }),
    )
    .await?;

    let matter_id =
        common::create_matter(&client, &server.base_url, &token, &customer_id, "Divorce Proceedings")
            .await?;

    // List carries the read-time customer name
    let res = client
        .get(format!("{}/api/customers/{}/matters", server.base_url, customer_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let matters = body["data"].as_array().unwrap();
    assert_eq!(matters.len(), 1);
    assert_eq!(matters[0]["customer_name"], "Jane Smith");

    let url = format!(
        "{}/api/customers/{}/matters/{}",
        server.base_url, customer_id, matter_id
    );

    let res = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({
            "name": "Divorce Proceedings",
            "description": "Settled out of court",
            "status": "Closed"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "Closed");

    let res = client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn foreign_matters_read_as_not_found_but_mutate_as_forbidden() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (owner_token, _) =
        common::signup_firm(&client, &server.base_url, &common::unique_email("m-owner")).await?;
    let (other_token, _) =
        common::signup_firm(&client, &server.base_url, &common::unique_email("m-other")).await?;

    let customer_id = common::create_customer(
        &client,
        &server.base_url,
        &owner_token,
        json!({ "name": "Jane Smith", "phone_number": "555-0123" }),
    )
    .await?;
    let matter_id =
        common::create_matter(&client, &server.base_url, &owner_token, &customer_id, "Estate Planning")
            .await?;

    // Reads never reveal existence
    let res = client
        .get(format!("{}/api/customers/{}/matters", server.base_url, customer_id))
        .bearer_auth(&other_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let url = format!(
        "{}/api/customers/{}/matters/{}",
        server.base_url, customer_id, matter_id
    );
    let res = client.get(&url).bearer_auth(&other_token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Mutations of a located matter under someone else's customer are 403
    let res = client
        .put(&url)
        .bearer_auth(&other_token)
        .json(&json!({ "name": "X", "description": "Y", "status": "Active" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client.delete(&url).bearer_auth(&other_token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // A matter id that does not exist under that customer stays a 404
    let res = client
        .delete(format!(
            "{}/api/customers/{}/matters/00000000-0000-0000-0000-000000000000",
            server.base_url, customer_id
        ))
        .bearer_auth(&other_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_distinguishes_missing_from_foreign_customer() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (owner_token, _) =
        common::signup_firm(&client, &server.base_url, &common::unique_email("c-owner")).await?;
    let (other_token, _) =
        common::signup_firm(&client, &server.base_url, &common::unique_email("c-other")).await?;

    let customer_id = common::create_customer(
        &client,
        &server.base_url,
        &owner_token,
        json!({ "name": "Jane Smith", "phone_number": "555-0123" }),
    )
    .await?;

    let matter = json!({ "name": "New Matter", "description": "desc", "status": "Active" });

    // Nonexistent customer: 404
    let res = client
        .post(format!(
            "{}/api/customers/00000000-0000-0000-0000-000000000000/matters",
            server.base_url
        ))
        .bearer_auth(&other_token)
        .json(&matter)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Someone else's customer: 403
    let res = client
        .post(format!("{}/api/customers/{}/matters", server.base_url, customer_id))
        .bearer_auth(&other_token)
        .json(&matter)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn deleting_a_customer_cascades_to_its_matters() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (token, _) = common::signup_firm(&client, &server.base_url, &common::unique_email("cascade")).await?;

    let customer_id = common::create_customer(
        &client,
        &server.base_url,
        &token,
        json!({ "name": "Jane Smith", "phone_number": "555-0123" }),
    )
    .await?;
    let matter_id =
        common::create_matter(&client, &server.base_url, &token, &customer_id, "Divorce Proceedings")
            .await?;

    let res = client
        .delete(format!("{}/api/customers/{}", server.base_url, customer_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Customer and matter are both gone
    let res = client
        .get(format!(
            "{}/api/customers/{}/matters/{}",
            server.base_url, customer_id, matter_id
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn status_defaults_to_active_when_omitted() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let (token, _) = common::signup_firm(&client, &server.base_url, &common::unique_email("status")).await?;
    let customer_id = common::create_customer(
        &client,
        &server.base_url,
        &token,
        json!({ "name": "Jane Smith", "phone_number": "555-0123" }),
    )
    .await?;

    let res = client
        .post(format!("{}/api/customers/{}/matters", server.base_url, customer_id))
        .bearer_auth(&token)
        .json(&json!({ "name": "No Status", "description": "defaults" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "Active");
    Ok(())
}
