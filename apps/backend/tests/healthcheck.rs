use actix_web::{test, web, App};
use backend::{routes, AppState};

#[actix_web::test]
async fn test_health_endpoint() {
    let app_state = web::Data::new(AppState::new());
    let app = test::init_service(
        App::new()
            .app_data(app_state)
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(resp.status().as_u16(), 200);

    let body = test::read_body(resp).await;
    assert_eq!(body, "ok");
}
