/// Builds the full route table over a shared `web::Data<MemoryStore>`.
macro_rules! init_app {
    ($store:expr) => {{
        let config = $crate::config::Config::for_tests();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($store.clone())
                .app_data(actix_web::web::Data::new(config.clone()))
                .configure(move |cfg| {
                    $crate::routes::configure::<$crate::store::MemoryStore>(cfg, &config)
                }),
        )
        .await
    }};
}

/// Sends a request and returns the status with the parsed JSON body.
macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}
