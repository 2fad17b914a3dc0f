//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Skillpath: a gamified skill-progress dashboard for the terminal.
#[derive(Parser, Debug)]
#[command(name = "skillpath")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Keep all data in memory for this session instead of calling the backend
    #[arg(long)]
    pub local: bool,

    /// Backend base URL (overrides config and SKILLPATH_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Use ASCII-only glyphs
    #[arg(long)]
    pub ascii: bool,

    /// Disable popup animations
    #[arg(long)]
    pub reduced_motion: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Sign in and store the session token. Reads the password from stdin.
    Signin {
        #[arg(long)]
        email: String,
    },
    /// Create an account and store the session token.
    /// Reads the password, then its confirmation, from stdin.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Seed the account with sample skills, courses and a roadmap
    Init,
    /// Print a progress summary and exit
    Status,
    /// Manage tracked skills
    #[command(subcommand)]
    Skill(SkillCommand),
    /// Manage course enrollment
    #[command(subcommand)]
    Course(CourseCommand),
    /// Manage notifications
    #[command(subcommand)]
    Notifications(NotificationCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SkillCommand {
    /// Start tracking a new skill at level 1
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        /// Display color as #rrggbb
        #[arg(long)]
        color: Option<String>,
    },
    /// Stop tracking a skill
    Rm { id: String },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CourseCommand {
    /// Enroll in a course
    Enroll { id: String },
    /// Record completed lessons for a course
    Progress { id: String, completed_lessons: u32 },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum NotificationCommand {
    /// Mark every notification as read
    ReadAll,
}
