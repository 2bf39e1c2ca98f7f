//! Console implementation of the application layer's `ScreenIo` trait.
//!
//! Renders each screen as plain text on stdout and reads line-oriented
//! input from stdin.  End-of-input (Ctrl-D, closed pipe) is treated the
//! same as closing a window: every prompt answers `Close`.
//!
//! Generic over the reader/writer pair so tests can drive the screens
//! from in-memory buffers; [`ConsoleScreenIo::new`] wires up the real
//! stdin/stdout.

use async_trait::async_trait;
use ebooking_core::{LoginForm, RegisterForm};
use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin,
    Stdout,
};
use tracing::warn;

use crate::application::session::{FormAction, MenuChoice, ScreenIo, WelcomeChoice};

/// Line-oriented console UI.
pub struct ConsoleScreenIo<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    input: R,
    output: W,
}

impl ConsoleScreenIo<BufReader<Stdin>, Stdout> {
    /// Console UI over the process's stdin/stdout.
    pub fn new() -> Self {
        Self {
            input: BufReader::new(stdin()),
            output: stdout(),
        }
    }
}

impl Default for ConsoleScreenIo<BufReader<Stdin>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> ConsoleScreenIo<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Console UI over arbitrary streams.
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes a line to the output.  Output failures are logged and
    /// swallowed; a dead terminal shows up as EOF on the next read.
    async fn say(&mut self, text: &str) {
        let line = format!("{text}\n");
        if let Err(e) = self.output.write_all(line.as_bytes()).await {
            warn!(error = %e, "failed to write to console");
        }
        let _ = self.output.flush().await;
    }

    /// Prints `prompt` and reads one trimmed line.  Returns `None` on EOF.
    async fn ask(&mut self, prompt: &str) -> Option<String> {
        if let Err(e) = self.output.write_all(prompt.as_bytes()).await {
            warn!(error = %e, "failed to write to console");
        }
        let _ = self.output.flush().await;

        let mut line = String::new();
        match self.input.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!(error = %e, "failed to read from console");
                None
            }
        }
    }

    /// Prompt with a retained value: empty input keeps `current`.
    async fn ask_field(&mut self, label: &str, current: &str) -> Option<String> {
        let prompt = if current.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{current}]: ")
        };
        let answer = self.ask(&prompt).await?;
        if answer.is_empty() {
            Some(current.to_string())
        } else {
            Some(answer)
        }
    }
}

#[async_trait]
impl<R, W> ScreenIo for ConsoleScreenIo<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn welcome(&mut self) -> WelcomeChoice {
        self.say("").await;
        self.say("=== E-Booking ===").await;
        self.say("  1) Login").await;
        self.say("  2) Register").await;
        self.say("  q) Quit").await;

        loop {
            let answer = match self.ask("> ").await {
                Some(a) => a,
                None => return WelcomeChoice::Close,
            };
            match answer.as_str() {
                "1" => return WelcomeChoice::Login,
                "2" => return WelcomeChoice::Register,
                "q" | "Q" => return WelcomeChoice::Close,
                _ => self.say("Please choose 1, 2 or q.").await,
            }
        }
    }

    async fn login(&mut self, form: &LoginForm, error: Option<&str>) -> FormAction<LoginForm> {
        self.say("").await;
        self.say("--- Login (empty username goes back) ---").await;
        if let Some(message) = error {
            self.say(&format!("! {message}")).await;
        }

        let username = match self.ask_field("Username", &form.username).await {
            Some(u) => u,
            None => return FormAction::Close,
        };
        if username.is_empty() {
            return FormAction::Back;
        }
        let password = match self.ask("Password: ").await {
            Some(p) => p,
            None => return FormAction::Close,
        };

        FormAction::Submit(LoginForm { username, password })
    }

    async fn register(
        &mut self,
        form: &RegisterForm,
        error: Option<&str>,
    ) -> FormAction<RegisterForm> {
        self.say("").await;
        self.say("--- Register (empty username goes back) ---").await;
        if let Some(message) = error {
            self.say(&format!("! {message}")).await;
        }

        let username = match self.ask_field("Username", &form.username).await {
            Some(u) => u,
            None => return FormAction::Close,
        };
        if username.is_empty() {
            return FormAction::Back;
        }
        let password = match self.ask("Password: ").await {
            Some(p) => p,
            None => return FormAction::Close,
        };
        let card_number = match self.ask_field("Card number", &form.card_number).await {
            Some(c) => c,
            None => return FormAction::Close,
        };

        FormAction::Submit(RegisterForm {
            username,
            password,
            card_number,
        })
    }

    async fn main_menu(&mut self) -> MenuChoice {
        self.say("").await;
        self.say("=== Main menu ===").await;
        self.say("  1) Search flights").await;
        self.say("  2) Book a flight").await;
        self.say("  3) Cancel a booking").await;
        self.say("  q) Quit").await;

        loop {
            let answer = match self.ask("> ").await {
                Some(a) => a,
                None => return MenuChoice::Close,
            };
            match answer.as_str() {
                "1" => return MenuChoice::Search,
                "2" => return MenuChoice::Book,
                "3" => return MenuChoice::Cancel,
                "q" | "Q" => return MenuChoice::Close,
                _ => self.say("Please choose 1, 2, 3 or q.").await,
            }
        }
    }

    async fn notify(&mut self, message: &str) {
        self.say(&format!("*** {message} ***")).await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(script: &str) -> ConsoleScreenIo<BufReader<Cursor<Vec<u8>>>, Vec<u8>> {
        ConsoleScreenIo::with_io(
            BufReader::new(Cursor::new(script.as_bytes().to_vec())),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_welcome_accepts_login_choice() {
        let mut ui = console("1\n");
        assert_eq!(ui.welcome().await, WelcomeChoice::Login);
    }

    #[tokio::test]
    async fn test_welcome_reprompts_on_garbage_then_quits() {
        let mut ui = console("x\nq\n");
        assert_eq!(ui.welcome().await, WelcomeChoice::Close);
        let transcript = String::from_utf8(ui.output.clone()).unwrap();
        assert!(transcript.contains("Please choose 1, 2 or q."));
    }

    #[tokio::test]
    async fn test_welcome_treats_eof_as_close() {
        let mut ui = console("");
        assert_eq!(ui.welcome().await, WelcomeChoice::Close);
    }

    #[tokio::test]
    async fn test_login_submits_entered_form() {
        let mut ui = console("alice\nhunter2\n");
        let action = ui.login(&LoginForm::default(), None).await;
        assert_eq!(
            action,
            FormAction::Submit(LoginForm {
                username: "alice".to_string(),
                password: "hunter2".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_login_keeps_retained_username_on_empty_input() {
        // Username was retained from the failed attempt; pressing Enter keeps it.
        let retained = LoginForm {
            username: "alice".to_string(),
            password: String::new(),
        };
        let mut ui = console("\nsecret\n");
        let action = ui.login(&retained, Some("Incorrect username or password")).await;
        assert_eq!(
            action,
            FormAction::Submit(LoginForm {
                username: "alice".to_string(),
                password: "secret".to_string(),
            })
        );
        let transcript = String::from_utf8(ui.output.clone()).unwrap();
        assert!(transcript.contains("! Incorrect username or password"));
    }

    #[tokio::test]
    async fn test_login_empty_username_with_no_retained_value_goes_back() {
        let mut ui = console("\n");
        assert_eq!(ui.login(&LoginForm::default(), None).await, FormAction::Back);
    }

    #[tokio::test]
    async fn test_register_submits_all_three_fields() {
        let mut ui = console("alice1\nabc\n1234567890\n");
        let action = ui.register(&RegisterForm::default(), None).await;
        assert_eq!(
            action,
            FormAction::Submit(RegisterForm {
                username: "alice1".to_string(),
                password: "abc".to_string(),
                card_number: "1234567890".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_register_eof_mid_form_is_close() {
        let mut ui = console("alice1\n");
        assert_eq!(
            ui.register(&RegisterForm::default(), None).await,
            FormAction::Close
        );
    }

    #[tokio::test]
    async fn test_main_menu_maps_choices() {
        let mut ui = console("2\n");
        assert_eq!(ui.main_menu().await, MenuChoice::Book);

        let mut ui = console("q\n");
        assert_eq!(ui.main_menu().await, MenuChoice::Close);
    }

    #[tokio::test]
    async fn test_notify_brackets_the_message() {
        let mut ui = console("");
        ui.notify("Login successful").await;
        let transcript = String::from_utf8(ui.output.clone()).unwrap();
        assert!(transcript.contains("*** Login successful ***"));
    }
}
