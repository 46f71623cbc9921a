use clap::{Arg, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_STATUS_PATH: &str = "status-path";
pub const ARG_LOGIN_PATH: &str = "login-path";
pub const ARG_REGISTER_PATH: &str = "register-path";
pub const ARG_LOGOUT_PATH: &str = "logout-path";
pub const ARG_COOKIE_JAR: &str = "cookie-jar";
pub const ARG_COOKIE_MAX_AGE: &str = "cookie-max-age";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_connection_args(command);
    let command = with_route_args(command);
    with_cookie_args(command)
}

fn with_connection_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the authentication API, example: https://api.example.com")
                .env("GATEKEEP_API_URL")
                .default_value("http://localhost:8000")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .env("GATEKEEP_TIMEOUT")
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn with_route_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_STATUS_PATH)
                .long("status-path")
                .help("Path of the session status endpoint")
                .env("GATEKEEP_STATUS_PATH")
                .default_value("/auth/status")
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOGIN_PATH)
                .long("login-path")
                .help("Path of the login endpoint")
                .env("GATEKEEP_LOGIN_PATH")
                .default_value("/auth/login")
                .global(true),
        )
        .arg(
            Arg::new(ARG_REGISTER_PATH)
                .long("register-path")
                .help("Path of the register endpoint")
                .env("GATEKEEP_REGISTER_PATH")
                .default_value("/auth/register")
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOGOUT_PATH)
                .long("logout-path")
                .help("Path of the logout endpoint")
                .env("GATEKEEP_LOGOUT_PATH")
                .default_value("/auth/logout")
                .global(true),
        )
}

fn with_cookie_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_JAR)
                .long("cookie-jar")
                .help("Cookie jar file (default: $HOME/.gatekeep/cookies.json)")
                .env("GATEKEEP_COOKIE_JAR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_COOKIE_MAX_AGE)
                .long("cookie-max-age")
                .help("Lifetime of the session cookies in seconds")
                .env("GATEKEEP_COOKIE_MAX_AGE")
                .default_value("86400")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
