//! Test fixtures and constants.

/// Secrets of the `app` namespace used across tests.
pub const APP_SECRETS: &[(&str, &str)] = &[
    ("DATABASE_URL", "postgres://localhost/mydb"),
    ("API_KEY", "sk-test-12345"),
];

/// Secret file of the `app` namespace.
pub const APP_FILE: &str = "secrets/app.yaml";

/// Root of the secret tree.
pub const SECRETS_DIR: &str = "secrets";

/// Dotenv template with a comment, an empty entry, a set entry, and a
/// free-form line.
pub const DOTENV_TEMPLATE: &str = "# app\nAPI_KEY=\nDATABASE_URL=sqlite://dev.db\nPORT=8080\nexport-free line\n";
