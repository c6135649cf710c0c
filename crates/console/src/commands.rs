//! Command handlers: each command goes through the session controller and the view gate
//! before it touches the API.

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use clubdesk_auth::View;
use clubdesk_client::{ApiClient, ApiError, ApiResult, ClientConfig, CredentialStore, FileCredentialStore};
use clubdesk_core::{
    Adherent, AdherentCreateRequest, AdherentId, BulkDisable, BulkRoleChange, PageRequest, PasswordChange,
    RoleAssignment,
};
use clubdesk_events::SessionSignals;
use thiserror::Error;

use crate::cli::{
    Command, CreateArgs, MemberCommand, PageArgs, ProfileCommand, ReportCommand,
    SubscriptionCommand, UserCommand,
};
use crate::render;
use crate::session::{RequestTicket, Screen, SessionController, Settled};

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The current screen is not a regular view (login entry, access denied, nothing).
    #[error("{message}")]
    Blocked { screen: Screen, message: String },

    #[error("the result arrived after the session changed and was discarded")]
    Stale,

    #[error("the API returned a credential that cannot be read")]
    UnreadableCredential,

    #[error("no credential location available; pass --credentials")]
    NoCredentialPath,

    #[error("cannot read {path:?}: {source}")]
    Certificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ConsoleError {
    fn blocked(screen: Screen) -> Self {
        ConsoleError::Blocked {
            screen,
            message: render::screen(screen),
        }
    }
}

impl<T> From<Settled<T>> for Result<T, ConsoleError> {
    fn from(settled: Settled<T>) -> Self {
        match settled {
            Settled::Current(value) => Ok(value),
            Settled::Failed(err) => Err(err.into()),
            Settled::Expired => Err(ApiError::SessionExpired.into()),
            Settled::Stale => Err(ConsoleError::Stale),
        }
    }
}

/// The front-end: one API client and the session that owns it.
#[derive(Debug)]
pub struct Console {
    client: ApiClient,
    session: SessionController,
}

impl Console {
    pub fn new(client: ApiClient) -> Self {
        let session = SessionController::new(client.credentials().clone(), client.signals());
        Self { client, session }
    }

    /// Build the console on a file-backed credential store.
    pub fn connect(config: &ClientConfig) -> Result<Self, ConsoleError> {
        let path = config
            .resolved_credentials_path()
            .ok_or(ConsoleError::NoCredentialPath)?;
        tracing::debug!(path = %path.display(), api_url = %config.api_url, "starting console");

        let credentials: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(path));
        let signals = Arc::new(SessionSignals::new());
        let client = ApiClient::new(config, credentials, signals)?;
        Ok(Self::new(client))
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub async fn execute(&mut self, command: Command) -> Result<String, ConsoleError> {
        self.session.pump_signals();

        match command {
            Command::Login { username, password } => {
                self.client.login(&username, &password).await?;
                self.adopt_credential()
            }
            Command::Register { username, password, admin } => {
                if admin {
                    self.client.register_admin(&username, &password).await?;
                } else {
                    self.client.register(&username, &password).await?;
                }
                self.adopt_credential()
            }
            Command::Logout => {
                // Local state goes even if the store cannot be cleared.
                self.session.logout();
                Ok("Logged out.".to_string())
            }
            Command::Whoami => Ok(render::session(self.session.session())),
            Command::Profile(command) => self.profile(command).await,
            Command::Members(command) => self.members(command).await,
            Command::Subscriptions(command) => self.subscriptions(command).await,
            Command::Reports(command) => self.reports(command).await,
            Command::Users(command) => self.users(command).await,
        }
    }

    fn adopt_credential(&mut self) -> Result<String, ConsoleError> {
        if !self.session.login_succeeded() {
            return Err(ConsoleError::UnreadableCredential);
        }
        Ok(format!("Logged in as {}.", render::session(self.session.session())))
    }

    /// Navigate to `view` and require that it renders.
    fn enter(&mut self, view: View) -> Result<(), ConsoleError> {
        self.session.navigate(view);
        self.visible()
    }

    fn visible(&self) -> Result<(), ConsoleError> {
        match self.session.screen() {
            Screen::Show(_) => Ok(()),
            screen => Err(ConsoleError::blocked(screen)),
        }
    }

    /// Run one request under a ticket of the current session.
    async fn request<T>(
        &mut self,
        call: impl Future<Output = ApiResult<T>>,
    ) -> Result<T, ConsoleError> {
        let ticket = self.session.begin_request();
        let result = call.await;
        self.session.settle(ticket, result).into()
    }

    async fn profile(&mut self, command: ProfileCommand) -> Result<String, ConsoleError> {
        self.enter(View::Profile)?;
        let client = self.client.clone();
        let today = Utc::now().date_naive();

        match command {
            ProfileCommand::Show => {
                let profile = self.request(client.profile()).await?;
                Ok(render::adherent(&profile, today))
            }
            ProfileCommand::Update(fields) => {
                let update = fields.into();
                let profile = self.request(client.update_profile(&update)).await?;
                Ok(render::adherent(&profile, today))
            }
            ProfileCommand::Password { old, new } => {
                let change = PasswordChange {
                    old_password: old,
                    new_password: new,
                };
                self.request(client.change_password(&change)).await
            }
        }
    }

    async fn members(&mut self, command: MemberCommand) -> Result<String, ConsoleError> {
        let client = self.client.clone();
        let today = Utc::now().date_naive();

        match command {
            MemberCommand::List { page, status, subscription_type } => {
                self.enter(View::List)?;
                let page = page_request(page);
                let ticket = self.session.begin_request();
                let result = match (status, subscription_type) {
                    (Some(status), _) => client.adherents_by_status(status, page).await,
                    (None, Some(kind)) => client.adherents_by_subscription_type(kind, page).await,
                    (None, None) => client.list_adherents(page).await,
                };
                let page: Result<_, ConsoleError> = self.session.accept_members(ticket, result).into();
                Ok(render::adherent_page(page?))
            }
            MemberCommand::Show { id } => self.show_member(id).await,
            MemberCommand::Find { email } => {
                self.enter(View::List)?;
                let adherent = self.request(client.adherent_by_email(&email)).await?;
                Ok(render::adherent(&adherent, today))
            }
            MemberCommand::Search { name } => {
                self.enter(View::List)?;
                let found = self.request(client.search_adherents(&name)).await?;
                Ok(render::adherent_rows(&found))
            }
            MemberCommand::Create(args) => {
                self.session.create_new();
                self.visible()?;
                let request = create_request(args)?;
                let created = self.request(client.create_adherent(&request)).await?;
                self.session.form_finished();
                Ok(format!("Created member #{} {}.", created.id, created.full_name()))
            }
            MemberCommand::Update { id, fields } => {
                self.session.select(id);
                self.session.edit();
                self.visible()?;
                let update = fields.into();
                match self.request(client.update_adherent(id, &update)).await {
                    Ok(updated) => {
                        self.session.form_finished();
                        Ok(render::adherent(&updated, today))
                    }
                    Err(err) => {
                        self.session.cancel_edit();
                        Err(err)
                    }
                }
            }
            MemberCommand::Delete { id } => {
                self.select(id)?;
                self.request(client.delete_adherent(id)).await?;
                self.session.close_details();
                Ok(format!("Member #{id} deactivated."))
            }
            MemberCommand::Suspend { id, reason } => {
                self.select(id)?;
                let ticket = self.session.begin_request();
                let result = client.suspend_adherent(id, &reason).await;
                self.settle_details(ticket, result)
            }
            MemberCommand::Reactivate { id } => {
                self.select(id)?;
                let ticket = self.session.begin_request();
                let result = client.reactivate_adherent(id).await;
                self.settle_details(ticket, result)
            }
            MemberCommand::Certificate { id, expiry } => {
                self.select(id)?;
                let ticket = self.session.begin_request();
                let result = client.update_medical_certificate(id, expiry).await;
                self.settle_details(ticket, result)
            }
            MemberCommand::AssignSubscription { id, subscription } => {
                self.select(id)?;
                let offer = self.request(client.subscription(subscription)).await?;
                let ticket = self.session.begin_request();
                let result = client.assign_subscription(id, &offer).await;
                self.settle_details(ticket, result)
            }
            MemberCommand::RemoveSubscription { id } => {
                self.select(id)?;
                let ticket = self.session.begin_request();
                let result = client.remove_subscription(id).await;
                self.settle_details(ticket, result)
            }
            MemberCommand::Eligibility { id } => {
                self.select(id)?;
                let active = self.request(client.has_active_subscription(id)).await?;
                let eligible = self.request(client.eligible_for_session(id)).await?;
                let limit = self.request(client.weekly_session_limit(id)).await?;
                Ok(render_eligibility(active, eligible, limit))
            }
        }
    }

    fn select(&mut self, id: AdherentId) -> Result<(), ConsoleError> {
        self.session.select(id);
        self.visible()
    }

    async fn show_member(&mut self, id: AdherentId) -> Result<String, ConsoleError> {
        self.select(id)?;
        let ticket = self.session.begin_request();
        let result = self.client.adherent(id).await;
        self.settle_details(ticket, result)
    }

    /// Keep the record as the details of the selection and render it.
    fn settle_details(
        &mut self,
        ticket: RequestTicket,
        result: ApiResult<Adherent>,
    ) -> Result<String, ConsoleError> {
        let today = Utc::now().date_naive();
        let adherent: Result<_, ConsoleError> = self.session.accept_details(ticket, result).into();
        Ok(render::adherent(adherent?, today))
    }

    async fn subscriptions(&mut self, command: SubscriptionCommand) -> Result<String, ConsoleError> {
        self.enter(View::Subscriptions)?;
        let client = self.client.clone();

        match command {
            SubscriptionCommand::List { page } => {
                let page = self.request(client.list_subscriptions(page_request(page))).await?;
                Ok(render::subscription_page(&page))
            }
            SubscriptionCommand::Show { id } => {
                let subscription = self.request(client.subscription(id)).await?;
                Ok(render::subscription(&subscription))
            }
            SubscriptionCommand::ByType { kind } => {
                let found = self.request(client.subscription_by_type(kind)).await?;
                Ok(render::subscription(&found))
            }
            SubscriptionCommand::Types => {
                let kinds = self.request(client.available_subscription_types()).await?;
                Ok(kinds
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            SubscriptionCommand::Create(fields) => {
                let request = fields.into();
                let created = self.request(client.create_subscription(&request)).await?;
                Ok(format!("Created {}", render::subscription(&created)))
            }
            SubscriptionCommand::Update { id, fields } => {
                let request = fields.into();
                let updated = self.request(client.update_subscription(id, &request)).await?;
                Ok(render::subscription(&updated))
            }
            SubscriptionCommand::Price { id, price } => {
                let updated = self.request(client.update_subscription_price(id, price)).await?;
                Ok(render::subscription(&updated))
            }
            SubscriptionCommand::Delete { id } => {
                self.request(client.delete_subscription(id)).await?;
                Ok(format!("Subscription #{id} deleted."))
            }
        }
    }

    async fn reports(&mut self, command: ReportCommand) -> Result<String, ConsoleError> {
        self.enter(View::Reports)?;
        let client = self.client.clone();

        match command {
            ReportCommand::General => {
                let stats = self.request(client.general_statistics()).await?;
                Ok(render::general_statistics(&stats))
            }
            ReportCommand::Subscriptions => {
                let stats = self.request(client.subscription_statistics()).await?;
                Ok(render::subscription_statistics(&stats))
            }
            ReportCommand::Status => {
                let report = self.request(client.adherents_by_status_report()).await?;
                Ok(render::status_report(&report))
            }
            ReportCommand::Monthly { year, month } => {
                let report = self.request(client.monthly_report(year, month)).await?;
                Ok(render::monthly_report(&report))
            }
        }
    }

    async fn users(&mut self, command: UserCommand) -> Result<String, ConsoleError> {
        self.enter(View::Users)?;
        let client = self.client.clone();

        match command {
            UserCommand::SetRole { username, role } => {
                let assignment = RoleAssignment { role };
                self.request(client.assign_role(&username, &assignment)).await?;
                Ok(format!("{username} is now {}.", assignment.role))
            }
            UserCommand::BulkRole { role, usernames } => {
                let change = BulkRoleChange { usernames, role };
                self.request(client.bulk_assign_role(&change)).await?;
                Ok(format!("{} users are now {}.", change.usernames.len(), change.role))
            }
            UserCommand::BulkDisable { usernames } => {
                let request = BulkDisable { usernames };
                self.request(client.bulk_disable(&request)).await?;
                Ok(format!("{} users disabled.", request.usernames.len()))
            }
            UserCommand::Hierarchy => {
                let hierarchy = self.request(client.role_hierarchy()).await?;
                Ok(render::role_hierarchy(&hierarchy))
            }
            UserCommand::History { username } => {
                let history = self.request(client.role_history(&username)).await?;
                Ok(render::role_history(&history))
            }
        }
    }
}

fn page_request(args: PageArgs) -> PageRequest {
    PageRequest::new(args.page, args.size)
}

fn create_request(args: CreateArgs) -> Result<AdherentCreateRequest, ConsoleError> {
    let document = std::fs::read(&args.certificate).map_err(|source| ConsoleError::Certificate {
        path: args.certificate.clone(),
        source,
    })?;

    Ok(AdherentCreateRequest {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone_number: args.phone,
        date_of_birth: args.birth_date,
        address: args.address,
        city: args.city,
        postal_code: args.postal_code,
        country: args.country,
        medical_certificate: STANDARD.encode(document),
        medical_certificate_expiry_date: args.certificate_expiry,
        status: None,
    })
}

fn render_eligibility(active: bool, eligible: bool, limit: i64) -> String {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    let limit = if limit >= i64::from(i32::MAX) {
        "unlimited".to_string()
    } else {
        limit.to_string()
    };
    format!(
        "active subscription:  {}\n\
         eligible for session: {}\n\
         weekly session limit: {limit}",
        yes_no(active),
        yes_no(eligible)
    )
}
