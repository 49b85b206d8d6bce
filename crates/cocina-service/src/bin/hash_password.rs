//! Prints an Argon2 hash for seeding a `users.password_hash` column by hand.

use cocina_core::constants::MIN_PASSWORD_LENGTH;
use cocina_service::auth::password::hash_password;

fn main() {
    let Some(password) = std::env::args().nth(1) else {
        eprintln!("usage: hash_password <password>");
        std::process::exit(2);
    };

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        eprintln!("Password must be at least {MIN_PASSWORD_LENGTH} characters long");
        std::process::exit(2);
    }

    match hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(err) => {
            eprintln!("Failed to hash password: {err}");
            std::process::exit(1);
        }
    }
}
