//! The session use case: one user, one channel, one walk through the screens.
//!
//! A [`Session`] owns the [`Channel`] for its whole lifetime and runs the
//! screen state machine strictly sequentially: each screen handler completes
//! (including at most one request/response exchange) before the next one
//! starts.  There is no pipelining — the client sends one envelope and
//! blocks for the matching response.
//!
//! Network, framing, and codec failures never escape a handler as raw
//! errors: they are converted into a user-visible message and a
//! same-screen transition.  The only unrecoverable event is the user
//! closing the window, which ends the session (and the process).

use async_trait::async_trait;
use ebooking_core::{validate_login, validate_register, Envelope, LoginForm, RegisterForm};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::screens::{transition, Screen, ScreenEvent};
use crate::infrastructure::network::Channel;

// ── User-visible messages ─────────────────────────────────────────────────────

/// Shown when the server declines a login.
pub const MSG_LOGIN_DENIED: &str = "Incorrect username or password";
/// Shown when the server declines a registration (duplicate username).
pub const MSG_REGISTER_DENIED: &str = "Username was taken";
/// Shown when no response envelope arrived at all (send failed, peer
/// closed, or the response did not decode).
pub const MSG_CONNECTION_LOST: &str = "Cannot connect to server";
/// Popup after a successful login.
pub const MSG_LOGIN_OK: &str = "Login successful";
/// Popup after a successful registration.
pub const MSG_REGISTER_OK: &str = "Register Successful";

// ── UI seam ───────────────────────────────────────────────────────────────────

/// User's choice on the Welcome screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeChoice {
    Login,
    Register,
    /// Window closed.
    Close,
}

/// User's action on a form screen (Login or Register).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction<F> {
    /// Submit the (possibly edited) form.
    Submit(F),
    /// Return to the Welcome screen.
    Back,
    /// Window closed.
    Close,
}

/// User's choice on the main menu.
///
/// Search, Book, and Cancel are placeholders — selecting any of them
/// dismisses the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Search,
    Book,
    Cancel,
    Close,
}

/// The presentation seam.
///
/// The session calls these methods to show a screen and obtain the user's
/// next action; it never renders anything itself.  The console adapter in
/// `infrastructure::ui_bridge` is the shipping implementation; tests
/// script their own.
///
/// Form methods receive the retained field values (username, card number —
/// the password is cleared after every failed submit) and the error message
/// to display, if any.
#[async_trait]
pub trait ScreenIo: Send {
    /// Shows the Welcome screen and waits for a choice.
    async fn welcome(&mut self) -> WelcomeChoice;

    /// Shows the Login form and waits for an action.
    async fn login(&mut self, form: &LoginForm, error: Option<&str>) -> FormAction<LoginForm>;

    /// Shows the Register form and waits for an action.
    async fn register(
        &mut self,
        form: &RegisterForm,
        error: Option<&str>,
    ) -> FormAction<RegisterForm>;

    /// Shows the main menu and waits for a choice.
    async fn main_menu(&mut self) -> MenuChoice;

    /// Shows a transient notification (success popups, greeting text).
    async fn notify(&mut self, message: &str);
}

// ── Exchange outcome ──────────────────────────────────────────────────────────

/// Tagged outcome of one submit exchange, consumed uniformly by every
/// form handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthOutcome {
    /// Server answered with the `success` tag.
    Granted,
    /// A response arrived but its tag was not `success`.
    Denied,
    /// No response envelope was received at all.
    ConnectionLost,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One interactive session: the channel, the retained form state, and the
/// screen loop.
///
/// Generic over the underlying stream so tests can run a session over an
/// in-memory pipe; production code uses [`TcpStream`].
pub struct Session<U, S = TcpStream>
where
    U: ScreenIo,
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    id: Uuid,
    channel: Channel<S>,
    ui: U,
    login_form: LoginForm,
    register_form: RegisterForm,
}

impl<U, S> Session<U, S>
where
    U: ScreenIo,
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Creates a session owning `channel`, starting at the Welcome screen.
    pub fn new(channel: Channel<S>, ui: U) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
            ui,
            login_form: LoginForm::default(),
            register_form: RegisterForm::default(),
        }
    }

    /// Runs the screen loop until a terminal transition, then releases the
    /// channel unconditionally.
    pub async fn run(mut self) {
        info!(session = %self.id, "session started");

        let mut screen = Screen::Welcome;
        while screen != Screen::Exit {
            screen = match screen {
                Screen::Welcome => self.welcome_screen().await,
                Screen::Login => self.login_screen().await,
                Screen::Register => self.register_screen().await,
                Screen::MainMenu => self.main_menu_screen().await,
                Screen::Exit => Screen::Exit,
            };
        }

        self.channel.shutdown().await;
        info!(session = %self.id, "session ended; channel released");
    }

    // ── Screen handlers ──────────────────────────────────────────────────────

    async fn welcome_screen(&mut self) -> Screen {
        let event = match self.ui.welcome().await {
            WelcomeChoice::Login => ScreenEvent::ChooseLogin,
            WelcomeChoice::Register => ScreenEvent::ChooseRegister,
            WelcomeChoice::Close => ScreenEvent::CloseRequested,
        };
        transition(Screen::Welcome, event)
    }

    /// Login loop: re-shows the form with the current error until the user
    /// leaves the screen or a submit succeeds.
    async fn login_screen(&mut self) -> Screen {
        let mut error: Option<String> = None;
        loop {
            let action = self.ui.login(&self.login_form, error.as_deref()).await;
            let event = match action {
                FormAction::Back => ScreenEvent::GoBack,
                FormAction::Close => ScreenEvent::CloseRequested,
                FormAction::Submit(form) => {
                    self.login_form = form;
                    match self.submit_login().await {
                        Ok(()) => {
                            self.ui.notify(MSG_LOGIN_OK).await;
                            ScreenEvent::AuthSucceeded
                        }
                        Err(message) => {
                            error = Some(message);
                            self.login_form.password.clear();
                            ScreenEvent::AuthFailed
                        }
                    }
                }
            };

            let next = transition(Screen::Login, event);
            if next != Screen::Login {
                return next;
            }
        }
    }

    async fn register_screen(&mut self) -> Screen {
        let mut error: Option<String> = None;
        loop {
            let action = self.ui.register(&self.register_form, error.as_deref()).await;
            let event = match action {
                FormAction::Back => ScreenEvent::GoBack,
                FormAction::Close => ScreenEvent::CloseRequested,
                FormAction::Submit(form) => {
                    self.register_form = form;
                    match self.submit_register().await {
                        Ok(()) => {
                            self.ui.notify(MSG_REGISTER_OK).await;
                            ScreenEvent::AuthSucceeded
                        }
                        Err(message) => {
                            error = Some(message);
                            self.register_form.password.clear();
                            ScreenEvent::AuthFailed
                        }
                    }
                }
            };

            let next = transition(Screen::Register, event);
            if next != Screen::Register {
                return next;
            }
        }
    }

    async fn main_menu_screen(&mut self) -> Screen {
        let choice = self.ui.main_menu().await;
        let event = match choice {
            MenuChoice::Close => ScreenEvent::CloseRequested,
            other => {
                info!(session = %self.id, choice = ?other, "menu option not implemented yet");
                ScreenEvent::Dismissed
            }
        };
        transition(Screen::MainMenu, event)
    }

    // ── Submits ──────────────────────────────────────────────────────────────

    /// Validates, then exchanges, returning the message to show on failure.
    async fn submit_login(&mut self) -> Result<(), String> {
        validate_login(&self.login_form).map_err(|e| e.to_string())?;

        let request = Envelope::login(&self.login_form.username, &self.login_form.password);
        match self.exchange(request).await {
            AuthOutcome::Granted => Ok(()),
            AuthOutcome::Denied => Err(MSG_LOGIN_DENIED.to_string()),
            AuthOutcome::ConnectionLost => Err(MSG_CONNECTION_LOST.to_string()),
        }
    }

    async fn submit_register(&mut self) -> Result<(), String> {
        validate_register(&self.register_form).map_err(|e| e.to_string())?;

        let request = Envelope::register(
            &self.register_form.username,
            &self.register_form.password,
            &self.register_form.card_number,
        );
        match self.exchange(request).await {
            AuthOutcome::Granted => Ok(()),
            AuthOutcome::Denied => Err(MSG_REGISTER_DENIED.to_string()),
            AuthOutcome::ConnectionLost => Err(MSG_CONNECTION_LOST.to_string()),
        }
    }

    /// Performs one strictly synchronous request/response exchange.
    ///
    /// Every failure mode that means "no usable response" — send error,
    /// peer close, truncated frame, undecodable envelope — collapses into
    /// [`AuthOutcome::ConnectionLost`]; the distinction that matters to the
    /// user is whether a response envelope arrived at all.
    async fn exchange(&mut self, request: Envelope) -> AuthOutcome {
        let tag = request.tag().to_string();
        if let Err(e) = self.channel.send_envelope(&request).await {
            warn!(session = %self.id, request = %tag, error = %e, "send failed");
            return AuthOutcome::ConnectionLost;
        }

        match self.channel.receive_envelope().await {
            Ok(Some(response)) if response.is_success() => AuthOutcome::Granted,
            Ok(Some(response)) => {
                info!(session = %self.id, request = %tag, response = response.tag(), "request declined");
                AuthOutcome::Denied
            }
            Ok(None) => {
                warn!(session = %self.id, request = %tag, "connection closed while awaiting response");
                AuthOutcome::ConnectionLost
            }
            Err(e) => {
                warn!(session = %self.id, request = %tag, error = %e, "receive failed");
                AuthOutcome::ConnectionLost
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
