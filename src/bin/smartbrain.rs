//! smartbrain - command-line client for the Smart Brain backend
//!
//! Drives the same flow the web client does: sign in or register, submit an
//! image URL for face detection, and print the resulting bounding box as
//! edge insets of the displayed image.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use smartbrain::{
    run_detection, BackendClient, ClientConfig, DisplayDimensions, SessionState, User,
};

#[derive(Parser, Debug)]
#[command(name = "smartbrain", version, about = "Smart Brain face-detection client")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the account record
    Signin {
        #[arg(long, env = "SMARTBRAIN_EMAIL")]
        email: String,
        #[arg(long, env = "SMARTBRAIN_PASSWORD")]
        password: String,
    },

    /// Register a new account and print it
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },

    /// Submit an image URL and print the face box insets
    Detect {
        /// URL of the image to analyze
        image_url: String,
        /// Rendered width of the displayed image in pixels
        #[arg(long, default_value_t = 400.0)]
        width: f64,
        /// Rendered height of the displayed image in pixels
        #[arg(long, default_value_t = 300.0)]
        height: f64,
        /// Sign in first so the detection bumps the account's entry count
        #[arg(long, env = "SMARTBRAIN_EMAIL")]
        email: Option<String>,
        #[arg(long, env = "SMARTBRAIN_PASSWORD")]
        password: Option<String>,
    },

    /// Fetch and print the profile record
    Profile,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = ClientConfig::load()?;
    let client = BackendClient::new(&cfg);

    match args.command {
        Command::Signin { email, password } => {
            let user = client.signin(&email, &password)?;
            print_user(&user);
        }
        Command::Register {
            email,
            password,
            name,
        } => {
            let user = client.register(&email, &password, &name)?;
            print_user(&user);
        }
        Command::Detect {
            image_url,
            width,
            height,
            email,
            password,
        } => {
            let state = match (email, password) {
                (Some(email), Some(password)) => {
                    let user = client.signin(&email, &password)?;
                    SessionState::default().signed_in(user)
                }
                (None, None) => SessionState::default(),
                _ => return Err(anyhow!("--email and --password must be given together")),
            };

            let dims = DisplayDimensions::new(width, height);
            if dims.is_none() {
                log::warn!("display size {width}x{height} is unusable; no box can be computed");
            }

            let state = run_detection(&client, state, &image_url, dims);
            match state.face_box {
                Some(face_box) => {
                    println!("face box (pixel insets from each edge):");
                    println!("  left   {:.1}", face_box.left_col);
                    println!("  top    {:.1}", face_box.top_row);
                    println!("  right  {:.1}", face_box.right_col);
                    println!("  bottom {:.1}", face_box.bottom_row);
                }
                None => println!(
                    "{}",
                    state.status.as_deref().unwrap_or("no result")
                ),
            }
            if let Some(user) = &state.user {
                println!("entry count for {}: {}", user.name, user.entries);
            }
        }
        Command::Profile => {
            let user = client.profile()?;
            print_user(&user);
        }
    }

    Ok(())
}

fn print_user(user: &User) {
    println!(
        "{} <{}> (id {}, {} entries, joined {})",
        user.name, user.email, user.id, user.entries, user.joined
    );
}
