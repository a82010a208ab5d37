pub mod env {
    pub const ENV_PREFIX: &str = "CREDENTIALS";
    pub const ENV_SEPARATOR: &str = "__";
}

pub const CONFIG_FILE: &str = "credentials";

pub mod defaults {
    pub const PLATFORM_NAME: &str = "Credentials";
    pub const HOME_URL: &str = "http://localhost:3000";
    pub const PAGE_SIZE: usize = 20;
    pub const TEMPORARY_PASSWORD_LENGTH: usize = 16;
    pub const ACTIVATION_CODE_LENGTH: usize = 42;

    pub mod email_client {
        pub const BASE_URL: &str = "https://api.postmarkapp.com/";
        pub const SENDER: &str = "noreply@example.com";
        pub const TIMEOUT_IN_MILLIS: u64 = 10_000;
    }
}
