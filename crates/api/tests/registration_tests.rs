mod common;

use api::gql::build_schema;
use async_graphql::Variables;
use common::*;
use infra::CatalogStore;
use serde_json::json;

const REGISTER: &str = r#"
    mutation Register($input: RegisterForTournamentInput!) {
        registerForTournament(input: $input) {
            status
            tournament {
                usedSpots
                spots
                availableSpots
            }
        }
    }
"#;

#[tokio::test]
async fn test_register_for_tournament() {
    let app_state = setup_test_state();
    let schema = build_schema(app_state.clone());

    let (user_id, claims) = create_test_user(&app_state, "playerreg@test.com", "user").await;
    let tournament_id = create_test_tournament(&app_state, "Registration Cup", 8).await;

    let variables = Variables::from_json(json!({
        "input": { "tournamentId": tournament_id.to_string() }
    }));

    let response = execute_graphql(&schema, REGISTER, Some(variables), Some(claims)).await;

    assert!(
        response.errors.is_empty(),
        "Tournament registration should succeed: {:?}",
        response.errors
    );

    let data = response.data.into_json().unwrap();
    let result = &data["registerForTournament"];
    assert_eq!(result["status"], "REGISTERED");
    assert_eq!(result["tournament"]["usedSpots"], 1);
    assert_eq!(result["tournament"]["availableSpots"], 7);

    let record = app_state
        .store
        .get_tournament(tournament_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.participants, vec![user_id]);
    assert_eq!(record.participants.len() as i32, record.used_spots);
}

#[tokio::test]
async fn test_registering_twice_is_a_noop() {
    let app_state = setup_test_state();
    let schema = build_schema(app_state.clone());

    let (_user_id, claims) = create_test_user(&app_state, "repeat@test.com", "user").await;
    let tournament_id = create_test_tournament(&app_state, "Repeat Cup", 8).await;

    let variables = json!({ "input": { "tournamentId": tournament_id.to_string() } });

    let first = execute_graphql(
        &schema,
        REGISTER,
        Some(Variables::from_json(variables.clone())),
        Some(claims.clone()),
    )
    .await;
    assert!(first.errors.is_empty(), "{:?}", first.errors);

    let second = execute_graphql(
        &schema,
        REGISTER,
        Some(Variables::from_json(variables)),
        Some(claims),
    )
    .await;
    assert!(second.errors.is_empty(), "{:?}", second.errors);

    let data = second.data.into_json().unwrap();
    let result = &data["registerForTournament"];
    assert_eq!(result["status"], "ALREADY_REGISTERED");
    assert_eq!(result["tournament"]["usedSpots"], 1);

    let record = app_state
        .store
        .get_tournament(tournament_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.used_spots, 1);
    assert_eq!(record.participants.len(), 1);
}

#[tokio::test]
async fn test_full_tournament_rejects_with_capacity_message() {
    let app_state = setup_test_state();
    let schema = build_schema(app_state.clone());

    let (_first, first_claims) = create_test_user(&app_state, "first@test.com", "user").await;
    let (_second, second_claims) = create_test_user(&app_state, "second@test.com", "user").await;
    let tournament_id = create_test_tournament(&app_state, "Tiny Cup", 1).await;

    let variables = json!({ "input": { "tournamentId": tournament_id.to_string() } });

    let first = execute_graphql(
        &schema,
        REGISTER,
        Some(Variables::from_json(variables.clone())),
        Some(first_claims),
    )
    .await;
    assert!(first.errors.is_empty(), "{:?}", first.errors);

    let second = execute_graphql(
        &schema,
        REGISTER,
        Some(Variables::from_json(variables)),
        Some(second_claims),
    )
    .await;
    assert!(!second.errors.is_empty());
    assert_eq!(second.errors[0].message, "This tournament is already full.");

    let record = app_state
        .store
        .get_tournament(tournament_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.used_spots, 1);
}

#[tokio::test]
async fn test_register_requires_authentication() {
    let app_state = setup_test_state();
    let schema = build_schema(app_state.clone());

    let tournament_id = create_test_tournament(&app_state, "Locked Cup", 8).await;

    let variables = Variables::from_json(json!({
        "input": { "tournamentId": tournament_id.to_string() }
    }));

    let response = execute_graphql(&schema, REGISTER, Some(variables), None).await;
    assert!(!response.errors.is_empty());
    assert_eq!(response.errors[0].message, "Authentication required");
}

#[tokio::test]
async fn test_register_for_missing_tournament() {
    let app_state = setup_test_state();
    let schema = build_schema(app_state.clone());

    let (_uid, claims) = create_test_user(&app_state, "lost@test.com", "user").await;

    let variables = Variables::from_json(json!({
        "input": { "tournamentId": uuid::Uuid::new_v4().to_string() }
    }));

    let response = execute_graphql(&schema, REGISTER, Some(variables), Some(claims)).await;
    assert!(!response.errors.is_empty());
    assert_eq!(
        response.errors[0].message,
        "The tournament you're looking for doesn't exist."
    );
}

/// The end-to-end capacity scenario: a 2-spot tournament accepts exactly
/// two different users, then turns the third away with the counter intact.
#[tokio::test]
async fn test_two_spot_tournament_fills_and_rejects_the_third() {
    let app_state = setup_test_state();
    let schema = build_schema(app_state.clone());

    let (_admin_id, admin_claims) = create_test_user(&app_state, "admin@test.com", "admin").await;

    let create = r#"
        mutation CreateTournament($input: CreateTournamentInput!) {
            createTournament(input: $input) { id usedSpots prizePool }
        }
    "#;
    let response = execute_graphql(
        &schema,
        create,
        Some(Variables::from_json(json!({
            "input": {
                "gameTitle": "Valorant Cup",
                "date": "2025-06-01",
                "location": "Online",
                "spots": 2
            }
        }))),
        Some(admin_claims),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    assert_eq!(data["createTournament"]["usedSpots"], 0);
    assert_eq!(data["createTournament"]["prizePool"], "0");
    let tournament_id = data["createTournament"]["id"].as_str().unwrap().to_string();

    let variables = json!({ "input": { "tournamentId": tournament_id } });

    for email in ["one@test.com", "two@test.com"] {
        let (_uid, claims) = create_test_user(&app_state, email, "user").await;
        let response = execute_graphql(
            &schema,
            REGISTER,
            Some(Variables::from_json(variables.clone())),
            Some(claims),
        )
        .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
    }

    let (_uid, third_claims) = create_test_user(&app_state, "three@test.com", "user").await;
    let rejected = execute_graphql(
        &schema,
        REGISTER,
        Some(Variables::from_json(variables)),
        Some(third_claims),
    )
    .await;
    assert!(!rejected.errors.is_empty());
    assert_eq!(rejected.errors[0].message, "This tournament is already full.");

    let record = app_state
        .store
        .get_tournament(uuid::Uuid::parse_str(data["createTournament"]["id"].as_str().unwrap()).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.used_spots, 2);
    assert_eq!(record.participants.len(), 2);
}

/// Six users race for two spots through the full GraphQL path; exactly two
/// win, the counter lands on the cap, and nobody is double-counted.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_fill_exactly_to_capacity() {
    let app_state = setup_test_state();
    let schema = build_schema(app_state.clone());

    let tournament_id = create_test_tournament(&app_state, "Contested Cup", 2).await;

    let mut handles = Vec::new();
    for i in 0..6 {
        let schema = schema.clone();
        let app_state = app_state.clone();
        let id = tournament_id.to_string();
        handles.push(tokio::spawn(async move {
            let (_uid, claims) =
                create_test_user(&app_state, &format!("racer{}@test.com", i), "user").await;
            let variables = Variables::from_json(json!({
                "input": { "tournamentId": id }
            }));
            execute_graphql(&schema, REGISTER, Some(variables), Some(claims)).await
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        let response = handle.await.unwrap();
        if response.errors.is_empty() {
            accepted += 1;
        } else {
            let message = &response.errors[0].message;
            assert!(
                message == "This tournament is already full."
                    || message == "Registration is busy, please try again.",
                "unexpected rejection: {}",
                message
            );
            rejected += 1;
        }
    }

    assert_eq!(accepted, 2);
    assert_eq!(rejected, 4);

    let record = app_state
        .store
        .get_tournament(tournament_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.used_spots, record.spots);
    assert_eq!(record.participants.len() as i32, record.used_spots);
}

#[tokio::test]
async fn test_history_reflects_registrations_and_deletions() {
    let app_state = setup_test_state();
    let schema = build_schema(app_state.clone());

    let (user_id, claims) = create_test_user(&app_state, "historian@test.com", "user").await;

    let joined = create_test_tournament(&app_state, "Joined Cup", 8).await;
    create_test_tournament(&app_state, "Skipped Cup", 8).await;
    let doomed = create_test_tournament(&app_state, "Doomed Cup", 8).await;

    app_state
        .store
        .register_participant(joined, user_id)
        .await
        .unwrap();
    app_state
        .store
        .register_participant(doomed, user_id)
        .await
        .unwrap();

    // A deleted tournament leaves no trace in the user's history.
    app_state.store.delete_tournament(doomed).await.unwrap();

    let query = r#"
        query {
            myHistory {
                gameTitle
            }
        }
    "#;
    let response = execute_graphql(&schema, query, None, Some(claims)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let history = data["myHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["gameTitle"], "Joined Cup");
}
