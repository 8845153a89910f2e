#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub frontend_origin: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Waitlist backend selection: "database" (default) or "formspree"
    pub waitlist_backend: String,
    pub formspree_endpoint: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let frontend_origin = std::env::var("FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());
        let waitlist_backend = std::env::var("WAITLIST_BACKEND")
            .unwrap_or_else(|_| "database".to_string());
        let formspree_endpoint = std::env::var("FORMSPREE_ENDPOINT")
            .unwrap_or_else(|_| "".to_string());

        Config {
            database_url,
            app_url,
            frontend_origin,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: 8000,
            waitlist_backend,
            formspree_endpoint,
        }
    }
}
