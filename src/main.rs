use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use anyhow::Context;
        use axum::{
            body::Body as AxumBody,
            extract::State,
            http::Request,
            middleware,
            response::IntoResponse,
            routing::{get, post},
            Router,
        };
        use dotenv::dotenv;
        use env_logger::Env;
        use leptos::prelude::*;
        use leptos_axum::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
        use thumbsmith::app::*;
        use thumbsmith::auth::oauth::{google_login, oauth_callback};
        use thumbsmith::config::AppConfig;
        use thumbsmith::generation::{handler::generate_image, GENERATE_IMAGE_PATH};
        use thumbsmith::middleware::trace_requests;
        use thumbsmith::state::AppState;

        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            dotenv().ok();
            env_logger::init_from_env(Env::default().default_filter_or("info"));

            let conf = get_configuration(None).context("failed to read leptos configuration")?;
            let addr = conf.leptos_options.site_addr;
            let leptos_options = conf.leptos_options;

            let config = AppConfig::from_env().context("invalid environment configuration")?;
            log::info!("Using model {} at {}", config.openai_model, config.openai_base_url);

            let routes = generate_route_list(App);
            let app_state = AppState::new(leptos_options.clone(), config);

            async fn server_fn_handler(
                State(app_state): State<AppState>,
                request: Request<AxumBody>,
            ) -> impl IntoResponse {
                handle_server_fns_with_context(
                    move || {
                        provide_context(app_state.clone());
                    },
                    request,
                )
                .await
            }

            let app = Router::new()
                .route(GENERATE_IMAGE_PATH, post(generate_image))
                .route(
                    "/api/{*fn_name}",
                    get(server_fn_handler).post(server_fn_handler),
                )
                .route("/auth/google", get(google_login))
                .route("/auth/callback", get(oauth_callback))
                .leptos_routes_with_handler(routes, get(|State(app_state): State<AppState>, request: Request<AxumBody>| async move {
                    let leptos_options = app_state.leptos_options.clone();
                    let handler = leptos_axum::render_app_to_stream_with_context(
                        move || {
                            provide_context(app_state.clone());
                        },
                        move || shell(leptos_options.clone())
                    );
                    handler(request).await.into_response()
                }))
                .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
                .layer(middleware::from_fn(trace_requests))
                .with_state(app_state);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            log::info!("listening on http://{}", &addr);
            axum::serve(listener, app.into_make_service())
                .await
                .context("server error")?;

            Ok(())
        }
    } else {
        pub fn main() {
            // no client-side main function
            // see lib.rs for hydration function instead
        }
    }
}
