use clap::{Arg, Command};

pub const CMD_STATUS: &str = "status";
pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_OPEN: &str = "open";

pub const ARG_USERNAME: &str = "username";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_PATH: &str = "path";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new(CMD_STATUS).about("Show the signed-in user"))
        .subcommand(login())
        .subcommand(register())
        .subcommand(Command::new(CMD_LOGOUT).about("Sign out and drop the session cookies"))
        .subcommand(
            Command::new(CMD_OPEN)
                .about("Resolve a route and enter its view")
                .arg(
                    Arg::new(ARG_PATH)
                        .help("Route path, example: /register")
                        .default_value("/"),
                ),
        )
}

// Missing credentials are not rejected here; the forms report them the same
// way they report any other invalid input.
fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in and store the session cookies")
        .arg(username_arg())
        .arg(password_arg())
}

fn register() -> Command {
    Command::new(CMD_REGISTER)
        .about("Create a new account")
        .arg(username_arg())
        .arg(
            Arg::new(ARG_EMAIL)
                .long("email")
                .help("Email address")
                .env("GATEKEEP_EMAIL"),
        )
        .arg(password_arg())
        .arg(
            Arg::new(ARG_CONFIRM_PASSWORD)
                .long("confirm-password")
                .help("Password confirmation, must match --password")
                .env("GATEKEEP_CONFIRM_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_FIRST_NAME)
                .long("first-name")
                .help("First name (optional)"),
        )
        .arg(
            Arg::new(ARG_LAST_NAME)
                .long("last-name")
                .help("Last name (optional)"),
        )
}

fn username_arg() -> Arg {
    Arg::new(ARG_USERNAME)
        .short('u')
        .long("username")
        .help("User name")
        .env("GATEKEEP_USERNAME")
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help("Password")
        .env("GATEKEEP_PASSWORD")
        .hide_env_values(true)
}
