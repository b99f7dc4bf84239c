//! Mint a session token for an existing account id
//!
//! Usage:
//!   cargo run --example generate_token -- --secret "your-secret-key" --account-id "<uuid>"

use clap::Parser;
use rinkside_auth::{SigningKey, TokenIssuer};

#[derive(Parser, Debug)]
#[command(name = "generate_token")]
#[command(about = "Generate a session token for API testing", long_about = None)]
struct Args {
    /// Signing secret (must match the server's secret)
    #[arg(long, env = "RINKSIDE_JWT_SECRET")]
    secret: String,

    /// Account id the token is issued for
    #[arg(long)]
    account_id: String,
}

fn main() {
    let args = Args::parse();

    let key = match SigningKey::new(args.secret) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match TokenIssuer::new(&key).issue(&args.account_id) {
        Ok(issued) => {
            println!("\n✅ Session token generated\n");
            println!("Account:    {}", args.account_id);
            println!("Expires at: {}", issued.expires_at.to_rfc3339());
            println!("\nToken:");
            println!("{}\n", issued.token);
            println!("Usage:");
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://127.0.0.1:8080/api/auth/me\n",
                issued.token
            );
        }
        Err(e) => {
            eprintln!("❌ Failed to generate token: {}", e);
            std::process::exit(1);
        }
    }
}
