//! User-facing notice texts.

pub const LOGIN_SUCCESS: &str = "Login successful! You can upload photos now.";

/// Login answered successfully but without a token
pub const LOGIN_NO_TOKEN: &str = "Login failed: no token received.";

pub const LOGIN_USAGE: &str = "Usage: /login <username> <password>";

pub const NOT_AUTHENTICATED: &str = "You need to log in first! Use /login <username> <password>";

pub const UPLOAD_SUCCESS: &str = "Photo uploaded successfully!";

pub const WELCOME: &str = "Hi! I forward your photos to Locket.\n\n\
1. Log in with /login <username> <password>\n\
2. Send me a photo and I will upload it.";

pub fn login_failed(reason: &str) -> String {
    format!("Login failed: {}", reason)
}

pub fn upload_failed(reason: &str) -> String {
    format!("Upload failed: {}", reason)
}
