use mockito::Matcher;
use serde_json::json;
use trip_budget_rs::{
    oracles::{GooglePlacesOracle, PlaceOracle},
    PlannerError,
};

fn oracle(server: &mockito::ServerGuard) -> GooglePlacesOracle {
    GooglePlacesOracle::new("test-key").with_base_url(server.url())
}

#[tokio::test]
async fn test_text_search_sends_query_and_parses_results() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/textsearch/json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "museum cultural site Lisbon".into()),
            Matcher::UrlEncoded("type".into(), "museum".into()),
            Matcher::UrlEncoded("key".into(), "test-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "OK",
                "results": [
                    {
                        "name": "Museu Calouste Gulbenkian",
                        "formatted_address": "Av. de Berna 45A, Lisboa",
                        "rating": 4.7,
                        "photos": [{"photo_reference": "gulbenkian"}]
                    },
                    {"name": "MAAT", "rating": 4.4}
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let places = oracle(&server)
        .search("museum cultural site", "museum", "Lisbon")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(places.len(), 2);
    assert_eq!(places[0].name, "Museu Calouste Gulbenkian");
    assert_eq!(places[0].photo_ref.as_deref(), Some("gulbenkian"));
    assert_eq!(places[1].description, "N/A");
}

#[tokio::test]
async fn test_zero_results_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/textsearch/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "ZERO_RESULTS", "results": []}"#)
        .create_async()
        .await;

    let places = oracle(&server)
        .search("hostel budget hotel", "lodging", "Nowhere")
        .await
        .unwrap();
    assert!(places.is_empty());
}

#[tokio::test]
async fn test_denied_status_is_a_lookup_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/textsearch/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#)
        .create_async()
        .await;

    let err = oracle(&server)
        .search("3 star hotel", "lodging", "Paris")
        .await
        .unwrap_err();

    assert!(matches!(err, PlannerError::PlaceLookup(_)));
    assert!(err.to_string().contains("API key is invalid"));
}

#[tokio::test]
async fn test_server_errors_are_retried_then_reported() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/textsearch/json")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error_message": "backend unavailable"}"#)
        .expect(4)
        .create_async()
        .await;

    let err = oracle(&server)
        .search("3 star hotel", "lodging", "Paris")
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("backend unavailable"));
}

#[tokio::test]
async fn test_place_details() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/details/json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("place_id".into(), "ChIJ123".into()),
            Matcher::UrlEncoded("fields".into(), "name,formatted_address,rating,type,photo".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "status": "OK",
                "result": {
                    "name": "Time Out Market",
                    "formatted_address": "Av. 24 de Julho 49, Lisboa",
                    "rating": 4.5
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let place = oracle(&server).place_details("ChIJ123").await.unwrap();
    assert_eq!(place.name, "Time Out Market");
    assert_eq!(place.rating, 4.5);
    assert!(place.photo_ref.is_none());
}

#[tokio::test]
async fn test_details_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/details/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "NOT_FOUND"}"#)
        .create_async()
        .await;

    let err = oracle(&server).place_details("missing").await.unwrap_err();
    assert!(err.to_string().contains("NOT_FOUND"));
}
