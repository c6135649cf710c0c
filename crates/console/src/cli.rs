//! CLI command definitions

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clubdesk_core::{
    AdherentId, AdherentStatus, AdherentUpdateRequest, ProfileUpdate, SubscriptionId,
    SubscriptionRequest, SubscriptionType,
};

#[derive(Parser)]
#[command(name = "clubdesk")]
#[command(about = "Sports club member management", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the club API
    #[arg(long, env = "CLUBDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// File holding the session credential
    #[arg(long, env = "CLUBDESK_CREDENTIALS", global = true)]
    pub credentials: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and keep the session credential
    Login {
        username: String,

        #[arg(long, env = "CLUBDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in with it
    Register {
        username: String,

        #[arg(long, env = "CLUBDESK_PASSWORD", hide_env_values = true)]
        password: String,

        /// Register an administrator account
        #[arg(long)]
        admin: bool,
    },

    /// Forget the session credential
    Logout,

    /// Show who is logged in and with which role
    Whoami,

    /// The signed-in user's own profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Member records (administrators)
    #[command(subcommand)]
    Members(MemberCommand),

    /// Subscription offers (administrators)
    #[command(subcommand)]
    Subscriptions(SubscriptionCommand),

    /// Statistics (administrators)
    #[command(subcommand)]
    Reports(ReportCommand),

    /// Role administration (administrators)
    #[command(subcommand)]
    Users(UserCommand),
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,

    /// Edit contact details
    Update(ProfileArgs),

    /// Change the password
    Password {
        #[arg(long)]
        old: String,

        #[arg(long)]
        new: String,
    },
}

#[derive(Subcommand)]
pub enum MemberCommand {
    /// List members, optionally filtered
    ///
    /// Examples:
    ///   clubdesk members list --page 1
    ///   clubdesk members list --status suspended
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long, conflicts_with = "subscription_type")]
        status: Option<AdherentStatus>,

        #[arg(long = "subscription-type")]
        subscription_type: Option<SubscriptionType>,
    },

    Show {
        id: AdherentId,
    },

    /// Look a member up by email
    Find {
        email: String,
    },

    /// Search members by name
    Search {
        name: String,
    },

    Create(CreateArgs),

    Update {
        id: AdherentId,

        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Deactivate a member
    Delete {
        id: AdherentId,
    },

    Suspend {
        id: AdherentId,

        #[arg(long)]
        reason: String,
    },

    Reactivate {
        id: AdherentId,
    },

    /// Record a new medical certificate expiry date
    Certificate {
        id: AdherentId,

        #[arg(long)]
        expiry: NaiveDate,
    },

    AssignSubscription {
        id: AdherentId,

        subscription: SubscriptionId,
    },

    RemoveSubscription {
        id: AdherentId,
    },

    /// Subscription status and weekly session allowance
    Eligibility {
        id: AdherentId,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    Show {
        id: SubscriptionId,
    },

    ByType {
        kind: SubscriptionType,
    },

    /// Subscription types currently on offer
    Types,

    Create(SubscriptionArgs),

    Update {
        id: SubscriptionId,

        #[command(flatten)]
        fields: SubscriptionArgs,
    },

    Price {
        id: SubscriptionId,

        price: f64,
    },

    Delete {
        id: SubscriptionId,
    },
}

#[derive(Subcommand)]
pub enum ReportCommand {
    General,

    Subscriptions,

    /// Member counts per status
    Status,

    Monthly {
        year: i32,

        month: u32,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    SetRole {
        username: String,

        role: String,
    },

    /// Give several users the same role
    ///
    /// Examples:
    ///   clubdesk users bulk-role --role ADMIN alice bob
    BulkRole {
        #[arg(long)]
        role: String,

        #[arg(required = true)]
        usernames: Vec<String>,
    },

    BulkDisable {
        #[arg(required = true)]
        usernames: Vec<String>,
    },

    /// Roles and the roles they inherit
    Hierarchy,

    History {
        username: String,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    #[arg(long, default_value_t = 10)]
    pub size: u32,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub birth_date: NaiveDate,

    #[arg(long)]
    pub address: String,

    #[arg(long, default_value = "")]
    pub city: String,

    #[arg(long, default_value = "")]
    pub postal_code: String,

    #[arg(long, default_value = "")]
    pub country: String,

    /// Medical certificate document, uploaded base64-encoded
    #[arg(long)]
    pub certificate: PathBuf,

    #[arg(long)]
    pub certificate_expiry: NaiveDate,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub birth_date: Option<NaiveDate>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub postal_code: Option<String>,

    #[arg(long)]
    pub country: Option<String>,
}

impl From<UpdateArgs> for AdherentUpdateRequest {
    fn from(args: UpdateArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone_number: args.phone,
            date_of_birth: args.birth_date,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub postal_code: Option<String>,

    #[arg(long)]
    pub country: Option<String>,
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        Self {
            email: args.email,
            phone_number: args.phone,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SubscriptionArgs {
    #[arg(long = "type")]
    pub kind: SubscriptionType,

    #[arg(long)]
    pub start: NaiveDate,

    #[arg(long)]
    pub end: NaiveDate,

    #[arg(long)]
    pub price: f64,
}

impl From<SubscriptionArgs> for SubscriptionRequest {
    fn from(args: SubscriptionArgs) -> Self {
        Self {
            kind: args.kind,
            start_date: args.start,
            end_date: args.end,
            price: args.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_member_filters() {
        let cli = Cli::try_parse_from([
            "clubdesk", "members", "list", "--status", "suspended", "--page", "2",
        ])
        .unwrap();

        match cli.command {
            Command::Members(MemberCommand::List { page, status, subscription_type }) => {
                assert_eq!(page.page, 2);
                assert_eq!(page.size, 10);
                assert_eq!(status, Some(AdherentStatus::Suspended));
                assert!(subscription_type.is_none());
            }
            _ => panic!("expected members list"),
        }
    }

    #[test]
    fn rejects_non_positive_ids() {
        assert!(Cli::try_parse_from(["clubdesk", "members", "show", "0"]).is_err());
        assert!(Cli::try_parse_from(["clubdesk", "members", "show", "abc"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "clubdesk", "whoami", "--api-url", "http://club.test", "--credentials", "/tmp/c.json",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://club.test"));
        assert_eq!(cli.credentials, Some(PathBuf::from("/tmp/c.json")));
    }

    #[test]
    fn update_args_map_onto_a_partial_update() {
        let update: AdherentUpdateRequest = UpdateArgs {
            phone: Some("0612345678".to_string()),
            ..UpdateArgs::default()
        }
        .into();
        assert_eq!(update.phone_number.as_deref(), Some("0612345678"));
        assert!(update.first_name.is_none());
    }

    #[test]
    fn profile_update_has_no_identity_flags() {
        assert!(Cli::try_parse_from(["clubdesk", "profile", "update", "--first-name", "Eve"]).is_err());

        let cli = Cli::try_parse_from(["clubdesk", "profile", "update", "--postal-code", "69001"]).unwrap();
        match cli.command {
            Command::Profile(ProfileCommand::Update(args)) => {
                let update: ProfileUpdate = args.into();
                assert_eq!(update.postal_code.as_deref(), Some("69001"));
                assert!(update.email.is_none());
            }
            _ => panic!("expected profile update"),
        }
    }
}
