//! Command-line front end.

mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use run::run;

#[derive(Parser, Debug)]
#[command(name = "hobbyapp")]
#[command(about = "Find people and communities by hobby", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show the session after rehydration
    Status,
    SignIn {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    SignUp {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Interest label, repeatable
        #[arg(short, long = "interest")]
        interests: Vec<String>,
    },
    SignOut,
    /// Exchange the stored token for a fresh one
    RefreshToken,
    /// Select interests and complete onboarding
    Onboard {
        /// Interest label from the catalog, repeatable
        #[arg(short, long = "interest", required = true)]
        interests: Vec<String>,
    },
    /// List the interest catalog, marking the session's selection
    Interests,
    /// List communities
    Communities {
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        /// Origin for distances, e.g. `34.05,-118.24`
        #[arg(long, value_parser = parse_point)]
        near: Option<(f64, f64)>,
    },
    Join {
        id: String,
    },
    Leave {
        id: String,
    },
    CreateCommunity {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long)]
        category: String,
        /// Tag, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Show or edit a profile
    Profile {
        /// Another user's id; defaults to the signed-in user
        #[arg(long, conflicts_with_all = ["name", "bio", "avatar"])]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Image file to upload as the new avatar
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
    /// Users near a location
    Nearby {
        /// Defaults to the cached device location, then the profile's
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        location: Option<(f64, f64)>,
        /// Radius in metres
        #[arg(short, long)]
        radius: Option<f64>,
    },
    /// Comments of a community
    Comments {
        community_id: String,
    },
    #[command(subcommand)]
    Comment(CommentCommand),
    /// Show or change device preferences
    Prefs {
        #[arg(long, value_parser = ["light", "dark", "system"])]
        theme: Option<String>,
        /// Search radius in kilometres
        #[arg(long)]
        radius: Option<u32>,
        #[arg(long)]
        auto_location: Option<bool>,
    },
    /// Show or clear the search history
    History {
        #[arg(long)]
        clear: bool,
    },
    #[command(subcommand)]
    Favorite(FavoriteCommand),
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum CommentCommand {
    Add { community_id: String, text: String },
    Like { comment_id: String },
    Delete { comment_id: String },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum FavoriteCommand {
    Add { community_id: String },
    Remove { community_id: String },
    List,
}

fn parse_point(raw: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lon`, got `{raw}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude `{lat}`: {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude `{lon}`: {e}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("`{raw}` is not a valid coordinate"));
    }
    Ok((lat, lon))
}
